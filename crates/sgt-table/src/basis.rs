//! Basis-operator canonicalization and interning.

use std::collections::HashMap;

use sgt_core::{BasisAlgebra, ErrorInfo, Op, SgError};
use tracing::trace;

/// Append-only list of distinct operator texts, indexed by first occurrence.
#[derive(Debug, Clone, Default)]
pub struct BasisTable {
    entries: Vec<String>,
    index: HashMap<String, usize>,
}

impl BasisTable {
    /// Returns the index of `text`, appending it when unseen.
    pub fn intern(&mut self, text: &str) -> usize {
        if let Some(&idx) = self.index.get(text) {
            return idx;
        }
        let idx = self.entries.len();
        self.entries.push(text.to_string());
        self.index.insert(text.to_string(), idx);
        idx
    }

    /// Number of distinct operators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operators in index order.
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    /// Consumes the table.
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

/// Outcome of canonicalizing one setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    /// Space-group number reported by the algebra.
    pub number: u32,
    /// Normalized operator text.
    pub text: String,
    /// Position in the [`BasisTable`].
    pub index: usize,
}

/// Computes changes of basis and interns them.
pub struct BasisCanonicalizer<'a> {
    algebra: &'a dyn BasisAlgebra,
    table: BasisTable,
}

impl<'a> BasisCanonicalizer<'a> {
    /// Starts with an empty table.
    pub fn new(algebra: &'a dyn BasisAlgebra) -> Self {
        Self {
            algebra,
            table: BasisTable::default(),
        }
    }

    /// Computes the operator for `hall`, cross-checks it against `declared`
    /// when given, and interns it.
    ///
    /// The declared operator must normalize to exactly the text the algebra
    /// computes; another operator relating the same two settings is still a
    /// mismatch.
    pub fn canonicalize(
        &mut self,
        hall: &str,
        number: Option<u32>,
        declared: Option<&str>,
    ) -> Result<Canonical, SgError> {
        let declared = match declared {
            Some(text) => Some((text, normalized(text, hall)?)),
            None => None,
        };
        let change = self.algebra.basis_from_reference(hall, number)?;
        let text = change.text();
        if let Some((raw, normal)) = declared {
            if normal != text {
                return Err(SgError::BasisMismatch(
                    ErrorInfo::new("basis-differs", "declared basis operator differs from the computed one")
                        .with_context("declared", raw)
                        .with_context("computed", text)
                        .with_context("hall", hall),
                ));
            }
        }
        let index = self.table.intern(&text);
        trace!(hall, basis = %text, index, "basis interned");
        Ok(Canonical {
            number: change.number,
            text,
            index,
        })
    }

    /// Read access to the interned operators.
    pub fn table(&self) -> &BasisTable {
        &self.table
    }

    /// Releases the interned operators.
    pub fn into_table(self) -> BasisTable {
        self.table
    }
}

fn normalized(declared: &str, hall: &str) -> Result<String, SgError> {
    Op::from_triplet(declared)
        .map(|op| op.triplet())
        .map_err(|_| {
            SgError::BasisMismatch(
                ErrorInfo::new("basis-unparseable", "declared basis operator is not a triplet")
                    .with_context("declared", declared)
                    .with_context("hall", hall),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_first_occurrence_order() {
        let mut table = BasisTable::default();
        assert_eq!(table.intern("x,y,z"), 0);
        assert_eq!(table.intern("z,x,y"), 1);
        assert_eq!(table.intern("x,y,z"), 0);
        assert_eq!(table.as_slice(), ["x,y,z", "z,x,y"]);
    }
}
