//! Group closure and change of basis for operation sets.

use std::collections::BTreeSet;

use sgt_core::{ErrorInfo, GroupOps, Op, SgError, Tran, DEN};

/// Largest crystallographic point group order.
pub const MAX_POINT_OPS: usize = 48;

/// Closes `ops.sym_ops` under multiplication, keeping one representative per
/// rotation (centering vectors are assumed complete).
pub fn complete(ops: &mut GroupOps) -> Result<(), SgError> {
    if ops.sym_ops.first() != Some(&Op::identity()) {
        return Err(SgError::InvalidNotation(ErrorInfo::new(
            "closure-identity",
            "generator list must start with the identity",
        )));
    }
    let centering: BTreeSet<Tran> = ops.cen_ops.iter().map(|t| wrap_tran(*t)).collect();
    let generators: Vec<Op> = ops.sym_ops[1..].to_vec();
    let mut elements = vec![Op::identity()];
    let mut cursor = 0;
    while cursor < elements.len() {
        let current = elements[cursor];
        for generator in &generators {
            let product = generator.combine(&current).wrap();
            match elements.iter().find(|e| e.rot == product.rot) {
                Some(existing) => {
                    let diff = sub_tran(product.tran, existing.tran);
                    if !centering.contains(&wrap_tran(diff)) {
                        return Err(SgError::InvalidNotation(
                            ErrorInfo::new(
                                "closure-inconsistent",
                                "generators imply a translation outside the centering lattice",
                            )
                            .with_context("operation", product.triplet()),
                        ));
                    }
                }
                None => {
                    elements.push(product);
                    if elements.len() > MAX_POINT_OPS {
                        return Err(SgError::InvalidNotation(
                            ErrorInfo::new("closure-overflow", "too many elements in the group")
                                .with_hint("generators do not describe a crystallographic group"),
                        ));
                    }
                }
            }
        }
        cursor += 1;
    }
    ops.sym_ops = elements;
    Ok(())
}

/// Expresses `ops` in a new basis: every operation `g` becomes `cob * g * cob^-1`.
///
/// Centering vectors are regenerated from the images of lattice points in a
/// 3x3x3 box, which covers every cell enlargement with entries in {-1,0,1}.
pub fn change_basis_forward(ops: &GroupOps, cob: &Op) -> Result<GroupOps, SgError> {
    let inverse = cob.inverse()?;
    let conjugate = |op: &Op| {
        cob.checked_combine(op)
            .and_then(|moved| moved.checked_combine(&inverse))
            .map(Op::wrap)
            .ok_or_else(|| {
                SgError::InvalidNotation(
                    ErrorInfo::new("inexact-basis-change", "conjugated operation leaves the grid")
                        .with_context("operator", cob.triplet())
                        .with_context("operation", op.triplet()),
                )
            })
    };
    let mut sym_ops = vec![Op::identity()];
    for op in ops.sym_ops.iter().skip(1) {
        sym_ops.push(conjugate(op)?);
    }
    let mut cen_ops = BTreeSet::new();
    for i in -1..=1 {
        for j in -1..=1 {
            for k in -1..=1 {
                for cen in &ops.cen_ops {
                    let point = Op::from_tran([i * DEN + cen[0], j * DEN + cen[1], k * DEN + cen[2]]);
                    cen_ops.insert(conjugate(&point)?.tran);
                }
            }
        }
    }
    Ok(GroupOps {
        sym_ops,
        cen_ops: cen_ops.into_iter().collect(),
    })
}

pub(crate) fn wrap_tran(tran: Tran) -> Tran {
    tran.map(|t| t.rem_euclid(DEN))
}

fn sub_tran(a: Tran, b: Tran) -> Tran {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}
