//! Implementations of the collaborator traits on top of the Hall parser and
//! the basis solver.

use std::collections::BTreeMap;

use sgt_core::{
    BasisAlgebra, BasisChange, ErrorInfo, GroupOps, OperationAlgebra, ReferenceEnumeration,
    ReferenceGroup, SgError,
};
use tracing::{debug, trace};

use crate::basis::BasisSolver;
use crate::hall::symops_from_hall;

/// Operation algebra backed by [`symops_from_hall`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HallAlgebra;

impl OperationAlgebra for HallAlgebra {
    fn expand(&self, hall: &str) -> Result<GroupOps, SgError> {
        symops_from_hall(hall)
    }
}

/// Change-of-basis computation against one reference setting per
/// space-group type.
#[derive(Debug, Clone)]
pub struct ReferenceBasis {
    references: BTreeMap<u32, GroupOps>,
    solver: BasisSolver,
}

impl ReferenceBasis {
    /// Uses the first setting listed for each number as its reference.
    pub fn from_enumeration(enumeration: &dyn ReferenceEnumeration) -> Result<Self, SgError> {
        Self::from_groups(&enumeration.reference_groups()?)
    }

    /// Same as [`ReferenceBasis::from_enumeration`] over an explicit list.
    pub fn from_groups(groups: &[ReferenceGroup]) -> Result<Self, SgError> {
        let mut references = BTreeMap::new();
        for group in groups {
            if references.contains_key(&group.number) {
                continue;
            }
            let ops = symops_from_hall(&group.hall)?;
            trace!(number = group.number, hall = %group.hall, "reference setting");
            references.insert(group.number, ops);
        }
        debug!(types = references.len(), "reference settings loaded");
        Ok(Self {
            references,
            solver: BasisSolver::new(),
        })
    }

    /// Number of space-group types with a reference setting.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Whether no reference setting is known.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Identifies the space-group type of `hall` by trying every reference
    /// in ascending number order.
    pub fn identify(&self, hall: &str) -> Result<BasisChange, SgError> {
        let target = symops_from_hall(hall)?;
        self.identify_ops(hall, &target)
    }

    fn identify_ops(&self, hall: &str, target: &GroupOps) -> Result<BasisChange, SgError> {
        for (&number, reference) in &self.references {
            if reference.sym_ops.len() != target.sym_ops.len() {
                continue;
            }
            if let Some(operator) = self.solver.find(reference, target) {
                debug!(hall, number, "identified space-group type");
                return Ok(BasisChange { number, operator });
            }
        }
        Err(SgError::notation(
            "unidentified",
            "no reference setting is equivalent to the operation set",
            hall,
        ))
    }
}

impl BasisAlgebra for ReferenceBasis {
    fn basis_from_reference(
        &self,
        hall: &str,
        number: Option<u32>,
    ) -> Result<BasisChange, SgError> {
        let target = symops_from_hall(hall)?;
        let Some(number) = number else {
            return self.identify_ops(hall, &target);
        };
        let reference = self.references.get(&number).ok_or_else(|| {
            SgError::MissingRecord(
                ErrorInfo::new("reference-missing", "no reference setting for space-group number")
                    .with_context("number", number.to_string()),
            )
        })?;
        match self.solver.find(reference, &target) {
            Some(operator) => {
                trace!(hall, number, operator = %operator, "basis found");
                Ok(BasisChange { number, operator })
            }
            None => Err(SgError::NumberMismatch(
                ErrorInfo::new(
                    "basis-not-found",
                    "setting is not related to the reference of its space-group number",
                )
                .with_context("hall", hall.trim())
                .with_context("number", number.to_string()),
            )),
        }
    }
}
