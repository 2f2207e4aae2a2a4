//! Reference enumerations: the canonical order the table is built on.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use sgt_core::{ErrorInfo, ReferenceEnumeration, ReferenceGroup, SgError};

/// In-memory enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticReference {
    groups: Vec<ReferenceGroup>,
}

impl StaticReference {
    /// Wraps a list that is already in canonical order.
    pub fn new(groups: Vec<ReferenceGroup>) -> Self {
        Self { groups }
    }
}

impl ReferenceEnumeration for StaticReference {
    fn reference_groups(&self) -> Result<Vec<ReferenceGroup>, SgError> {
        Ok(self.groups.clone())
    }
}

/// Enumeration read from a tab-separated file.
///
/// Columns: `number hall hm ext qualifier`, one header row, `#` comments,
/// no quoting (Hall symbols contain `"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsvReference {
    inner: StaticReference,
}

#[derive(Debug, Deserialize)]
struct TsvRow {
    number: u32,
    hall: String,
    hm: String,
    #[serde(default)]
    ext: String,
    #[serde(default)]
    qualifier: String,
}

impl TsvReference {
    /// Loads the file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, SgError> {
        let file = std::fs::File::open(path).map_err(|err| {
            SgError::Io(
                ErrorInfo::new("reference-open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_reader(file)
    }

    /// Parses TSV text from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SgError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .quoting(false)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(reader);
        let mut groups = Vec::new();
        for (idx, row) in reader.deserialize::<TsvRow>().enumerate() {
            let row = row.map_err(|err| wrap_csv("reference-row", err, idx + 1))?;
            let mut ext = row.ext.chars();
            let extension = match (ext.next(), ext.next()) {
                (None, _) => None,
                (Some(c), None) => Some(c),
                _ => {
                    return Err(SgError::Serde(
                        ErrorInfo::new("reference-ext", "extension must be a single character")
                            .with_context("row", (idx + 1).to_string())
                            .with_context("ext", row.ext.clone()),
                    ))
                }
            };
            if !(1..=230).contains(&row.number) {
                return Err(SgError::Serde(
                    ErrorInfo::new("reference-number", "space-group number outside 1-230")
                        .with_context("row", (idx + 1).to_string()),
                ));
            }
            groups.push(ReferenceGroup {
                number: row.number,
                hall: row.hall,
                hm: row.hm,
                ext: extension,
                qualifier: row.qualifier,
            });
        }
        Ok(Self {
            inner: StaticReference::new(groups),
        })
    }
}

impl ReferenceEnumeration for TsvReference {
    fn reference_groups(&self) -> Result<Vec<ReferenceGroup>, SgError> {
        self.inner.reference_groups()
    }
}

fn wrap_csv(code: &str, err: csv::Error, row: usize) -> SgError {
    SgError::Serde(
        ErrorInfo::new(code, "reference enumeration failure")
            .with_context("row", row.to_string())
            .with_hint(err.to_string()),
    )
}
