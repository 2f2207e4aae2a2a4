//! Equivalence of database records and Hall expansions.

use std::collections::BTreeSet;

use sgt_core::{ErrorInfo, GroupOps, Op, OperationAlgebra, SgError};
use sgt_syminfo::SymmetryRecord;

/// Checks records against an [`OperationAlgebra`].
///
/// Pure: nothing is cached and no state changes between calls.
#[derive(Clone, Copy)]
pub struct EquivalenceVerifier<'a> {
    algebra: &'a dyn OperationAlgebra,
}

impl<'a> EquivalenceVerifier<'a> {
    /// Wraps an algebra back end.
    pub fn new(algebra: &'a dyn OperationAlgebra) -> Self {
        Self { algebra }
    }

    /// Verifies that `record`'s explicit lists and the expansion of `hall`
    /// describe the same group.
    ///
    /// Centering vectors must agree exactly; general operations only modulo
    /// centering.
    pub fn verify(&self, record: &SymmetryRecord, hall: &str) -> Result<(), SgError> {
        let expanded = self.algebra.expand(hall)?;
        let context = |info: ErrorInfo| {
            info.with_context("record", record.display_name())
                .with_context("line", record.line.to_string())
                .with_context("hall", hall)
        };

        let cenops = self.parse_all(&record.centering_operations, record)?;
        if cenops.len() != expanded.cen_ops.len() {
            return Err(SgError::CenteringMismatch(context(
                ErrorInfo::new("centering-count", "number of centering operations differs")
                    .with_context("record_count", cenops.len().to_string())
                    .with_context("hall_count", expanded.cen_ops.len().to_string()),
            )));
        }
        let given: BTreeSet<Op> = cenops.iter().map(|op| op.wrap()).collect();
        let derived: BTreeSet<Op> = expanded
            .cen_ops
            .iter()
            .map(|tran| Op::from_tran(*tran).wrap())
            .collect();
        if given != derived {
            return Err(SgError::CenteringMismatch(context(ErrorInfo::new(
                "centering-set",
                "centering operations differ from the Hall expansion",
            ))));
        }

        let symops = self.parse_all(&record.explicit_operations, record)?;
        if symops.len() != expanded.sym_ops.len() {
            return Err(SgError::OperationSetMismatch(context(
                ErrorInfo::new("symop-count", "number of general operations differs")
                    .with_context("record_count", symops.len().to_string())
                    .with_context("hall_count", expanded.sym_ops.len().to_string()),
            )));
        }
        if self.coset_product(&symops, &cenops)? != self.expanded_product(&expanded)? {
            return Err(SgError::OperationSetMismatch(context(ErrorInfo::new(
                "coset-product",
                "operations differ from the Hall expansion modulo centering",
            ))));
        }
        Ok(())
    }

    /// Whether two Hall symbols generate the same operation set.
    pub fn same_group(&self, a: &str, b: &str) -> Result<bool, SgError> {
        let left = self.algebra.expand(a)?;
        let right = self.algebra.expand(b)?;
        Ok(self.expanded_product(&left)? == self.expanded_product(&right)?)
    }

    fn parse_all(&self, triplets: &[String], record: &SymmetryRecord) -> Result<Vec<Op>, SgError> {
        triplets
            .iter()
            .map(|text| {
                self.algebra.parse_triplet(text).map_err(|err| {
                    SgError::Format(
                        err.info()
                            .clone()
                            .with_context("record", record.display_name())
                            .with_context("line", record.line.to_string()),
                    )
                })
            })
            .collect()
    }

    fn coset_product(&self, symops: &[Op], cenops: &[Op]) -> Result<BTreeSet<Op>, SgError> {
        symops
            .iter()
            .flat_map(|s| cenops.iter().map(move |c| self.algebra.compose(s, c)))
            .collect()
    }

    fn expanded_product(&self, ops: &GroupOps) -> Result<BTreeSet<Op>, SgError> {
        let cenops: Vec<Op> = ops.cen_ops.iter().map(|t| Op::from_tran(*t)).collect();
        self.coset_product(&ops.sym_ops, &cenops)
    }
}
