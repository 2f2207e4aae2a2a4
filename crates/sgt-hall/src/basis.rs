//! Search for the change of basis relating two settings of one space group.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use sgt_core::{GroupOps, Op, Rot, Tran, DEN};

use crate::group::wrap_tran;

/// Deterministic change-of-basis search.
///
/// Linear parts are drawn from integer matrices with entries in {-1,0,1}
/// (and their inverses, for enlarged cells); origin shifts from the `1/DEN`
/// grid. Both lists are sorted by simplicity once, so the first solution
/// found is reproducible across runs.
#[derive(Debug, Clone)]
pub struct BasisSolver {
    by_det: BTreeMap<i32, Vec<Op>>,
    shifts: Vec<Tran>,
}

impl Default for BasisSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BasisSolver {
    /// Largest cell volume ratio considered.
    pub const MAX_VOLUME_RATIO: i32 = 4;

    /// Builds the candidate tables.
    pub fn new() -> Self {
        let den3 = DEN * DEN * DEN;
        let mut by_det: BTreeMap<i32, Vec<(MatrixKey, Op)>> = BTreeMap::new();
        for code in 0..3usize.pow(9) {
            let mut rot: Rot = [[0; 3]; 3];
            let mut rest = code;
            for row in rot.iter_mut() {
                for value in row.iter_mut() {
                    *value = (rest % 3) as i32 - 1;
                    rest /= 3;
                }
            }
            let op = Op {
                rot: rot.map(|row| row.map(|v| v * DEN)),
                tran: [0; 3],
            };
            let det = op.det_rot() / den3;
            if (1..=Self::MAX_VOLUME_RATIO).contains(&det) {
                by_det.entry(det).or_default().push((MatrixKey::of(&rot), op));
            }
        }
        let by_det = by_det
            .into_iter()
            .map(|(det, mut ops)| {
                ops.sort_by(|a, b| a.0.cmp(&b.0));
                (det, ops.into_iter().map(|(_, op)| op).collect())
            })
            .collect();

        let mut shifts: Vec<Tran> = (0..DEN * DEN * DEN)
            .map(|code| [code / (DEN * DEN), (code / DEN) % DEN, code % DEN].map(centre))
            .collect();
        shifts.sort_by_key(|t| shift_key(t));
        Self { by_det, shifts }
    }

    /// Finds `C` with `target = C * reference * C^-1`, translation centred
    /// in `(-1/2, 1/2]`.
    pub fn find(&self, reference: &GroupOps, target: &GroupOps) -> Option<Op> {
        if reference.sym_ops.len() != target.sym_ops.len() {
            return None;
        }
        let n_ref = reference.cen_ops.len() as i32;
        let n_tgt = target.cen_ops.len() as i32;
        let linear: Vec<Op> = if n_ref % n_tgt == 0 {
            self.by_det.get(&(n_ref / n_tgt))?.clone()
        } else if n_tgt % n_ref == 0 {
            self.by_det
                .get(&(n_tgt / n_ref))?
                .iter()
                .filter_map(|m| m.inverse().ok())
                .collect()
        } else {
            return None;
        };

        let target_rots: HashSet<Rot> = target.sym_ops.iter().map(|op| op.rot).collect();
        let target_ops: HashSet<Op> = target.all_ops().into_iter().collect();
        let target_cen: BTreeSet<Tran> = target.cen_ops.iter().map(|t| wrap_tran(*t)).collect();

        for m in &linear {
            let Ok(m_inv) = m.inverse() else {
                continue;
            };
            if lattice_image(m, reference).as_ref() != Some(&target_cen) {
                continue;
            }
            let Some(conjugated) = conjugate_rotations(m, &m_inv, reference, &target_rots) else {
                continue;
            };
            for shift in &self.shifts {
                let matches = conjugated.iter().all(|(rot, moved)| {
                    let mut tran = [0; 3];
                    for i in 0..3 {
                        let turned: i32 = (0..3).map(|k| rot[i][k] * shift[k]).sum::<i32>() / DEN;
                        tran[i] = moved[i] + shift[i] - turned;
                    }
                    target_ops.contains(&Op { rot: *rot, tran }.wrap())
                });
                if matches {
                    return Some(Op { rot: m.rot, tran: *shift }.centred());
                }
            }
        }
        None
    }
}

/// For each non-identity operation `(r|u)` of `reference`, returns
/// `(M r M^-1, M u)` or `None` when a conjugated rotation is not in the target.
fn conjugate_rotations(
    m: &Op,
    m_inv: &Op,
    reference: &GroupOps,
    target_rots: &HashSet<Rot>,
) -> Option<Vec<(Rot, Tran)>> {
    let mut out = Vec::with_capacity(reference.sym_ops.len());
    for op in reference.sym_ops.iter().skip(1) {
        let linear = Op {
            rot: op.rot,
            tran: [0; 3],
        };
        let rot = m.checked_combine(&linear)?.checked_combine(m_inv)?.rot;
        if !target_rots.contains(&rot) {
            return None;
        }
        out.push((rot, apply_exact(m, &op.tran)?));
    }
    Some(out)
}

/// `M u`, or `None` when the product leaves the `1/DEN` grid.
fn apply_exact(m: &Op, u: &Tran) -> Option<Tran> {
    let mut out = [0; 3];
    for (i, row) in m.rot.iter().enumerate() {
        let acc: i32 = row.iter().zip(u).map(|(a, b)| a * b).sum();
        if acc % DEN != 0 {
            return None;
        }
        out[i] = acc / DEN;
    }
    Some(out)
}

/// Images of the reference lattice modulo one, or `None` when a lattice
/// point leaves the `1/DEN` grid.
fn lattice_image(m: &Op, reference: &GroupOps) -> Option<BTreeSet<Tran>> {
    let mut image = BTreeSet::new();
    for i in -1..=1 {
        for j in -1..=1 {
            for k in -1..=1 {
                for cen in &reference.cen_ops {
                    let point = [i * DEN + cen[0], j * DEN + cen[1], k * DEN + cen[2]];
                    image.insert(wrap_tran(apply_exact(m, &point)?));
                }
            }
        }
    }
    Some(image)
}

fn centre(value: i32) -> i32 {
    if value > DEN / 2 {
        value - DEN
    } else {
        value
    }
}

fn denominator(value: i32) -> i32 {
    let mut a = value.abs();
    let mut b = DEN;
    while b != 0 {
        (a, b) = (b, a % b);
    }
    DEN / a
}

fn shift_key(t: &Tran) -> (i32, i32, [(i32, bool); 3]) {
    let den = t.iter().map(|v| denominator(*v)).max().unwrap_or(1);
    let size = t.iter().map(|v| v.abs()).sum();
    (den, size, t.map(|v| (v.abs(), v < 0)))
}

/// Ordering key preferring sparse, diagonal, positive matrices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MatrixKey {
    nonzero: usize,
    off_diagonal: usize,
    negative: usize,
    ranks: [u8; 9],
}

impl MatrixKey {
    fn of(rot: &[[i32; 3]; 3]) -> Self {
        let mut key = MatrixKey {
            nonzero: 0,
            off_diagonal: 0,
            negative: 0,
            ranks: [0; 9],
        };
        for (i, row) in rot.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                if v != 0 {
                    key.nonzero += 1;
                    if i != j {
                        key.off_diagonal += 1;
                    }
                }
                if v < 0 {
                    key.negative += 1;
                }
                key.ranks[3 * i + j] = match v {
                    1 => 0,
                    0 => 1,
                    _ => 2,
                };
            }
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::change_basis_forward;
    use crate::hall::symops_from_hall;

    fn solve(reference: &str, target: &str) -> Option<Op> {
        let solver = BasisSolver::new();
        solver.find(
            &symops_from_hall(reference).unwrap(),
            &symops_from_hall(target).unwrap(),
        )
    }

    #[test]
    fn identical_settings_give_identity() {
        assert_eq!(solve("P 2y", "P 2y"), Some(Op::identity()));
        assert_eq!(solve("-P 2ybc", "-P 2ybc"), Some(Op::identity()));
    }

    #[test]
    fn shift_ordering_prefers_half_steps() {
        let solver = BasisSolver::new();
        assert_eq!(solver.shifts[0], [0, 0, 0]);
        assert_eq!(solver.shifts[1], [0, 0, DEN / 2]);
    }

    #[test]
    fn axis_permutation_is_found() {
        let reference = symops_from_hall("P 2y").unwrap();
        let target = symops_from_hall("P 2").unwrap();
        let cob = BasisSolver::new().find(&reference, &target).unwrap();
        assert_eq!(cob.det_rot(), DEN * DEN * DEN);
        assert!(change_basis_forward(&reference, &cob).unwrap().is_same_as(&target));
    }

    #[test]
    fn origin_choice_is_a_pure_shift() {
        let reference = symops_from_hall("P 2 2 -1n").unwrap();
        let target = symops_from_hall("-P 2ab 2bc").unwrap();
        let cob = BasisSolver::new().find(&reference, &target).unwrap();
        assert!(cob.is_pure_translation());
        assert!(change_basis_forward(&reference, &cob).unwrap().is_same_as(&target));
    }

    #[test]
    fn enlarged_cell_uses_fractional_linear_part() {
        let reference = symops_from_hall("P 4 2").unwrap();
        let target = symops_from_hall("C 4 2").unwrap();
        let cob = BasisSolver::new().find(&reference, &target).unwrap();
        assert_eq!(cob.det_rot() * 2, DEN * DEN * DEN);
        assert!(change_basis_forward(&reference, &cob).unwrap().is_same_as(&target));
    }

    #[test]
    fn different_types_have_no_solution() {
        assert_eq!(solve("P 2y", "P 2yb"), None);
        assert_eq!(solve("P 2y", "C 2y"), None);
        assert_eq!(solve("P 4 2", "P 6 2"), None);
    }
}
