//! Hall-notation parser producing group generators.

use sgt_core::{GroupOps, Op, Rot, SgError, Tran, DEN};

use crate::group::{change_basis_forward, complete};

const H: i32 = DEN / 2;
const Q: i32 = DEN / 4;
const T: i32 = DEN / 3;

/// Expands a Hall symbol into the complete operation set.
pub fn symops_from_hall(hall: &str) -> Result<GroupOps, SgError> {
    let mut ops = generators_from_hall(hall)?;
    complete(&mut ops).map_err(|err| match err {
        SgError::InvalidNotation(info) => {
            SgError::InvalidNotation(info.with_context("hall", hall.trim()))
        }
        other => other,
    })?;
    Ok(ops)
}

/// Parses a Hall symbol into its generators (identity first).
///
/// The returned `sym_ops` are not closed under multiplication; see
/// [`symops_from_hall`].
pub fn generators_from_hall(hall: &str) -> Result<GroupOps, SgError> {
    let trimmed = hall.trim();
    let (body, basis) = split_change_of_basis(trimmed)?;
    let mut tokens = body.split_whitespace();
    let first = tokens
        .next()
        .ok_or_else(|| SgError::notation("hall-empty", "empty Hall symbol", hall))?;
    let (centrosymmetric, lattice) = match first.strip_prefix('-') {
        Some("") => {
            let next = tokens.next().ok_or_else(|| {
                SgError::notation("hall-lattice", "missing lattice symbol", hall)
            })?;
            (true, next)
        }
        Some(rest) => (true, rest),
        None => (false, first),
    };
    let mut chars = lattice.chars();
    let (Some(symbol), None) = (chars.next(), chars.next()) else {
        return Err(SgError::notation(
            "hall-lattice",
            format!("lattice symbol must be a single letter, got '{lattice}'"),
            hall,
        ));
    };

    let mut ops = GroupOps {
        sym_ops: vec![Op::identity()],
        cen_ops: lattice_translations(symbol)
            .ok_or_else(|| SgError::notation("hall-lattice", format!("unknown lattice '{symbol}'"), hall))?,
    };
    if centrosymmetric {
        ops.sym_ops.push(Op::identity().negated_rot());
    }

    let mut previous = Preceding::default();
    for (idx, token) in tokens.enumerate() {
        if token == "1" {
            continue;
        }
        let op = matrix_symbol(token, idx + 1, &mut previous)
            .map_err(|message| SgError::notation("hall-matrix", message, hall))?;
        ops.sym_ops.push(op);
    }

    if let Some(text) = basis {
        let cob = parse_change_of_basis(text)
            .map_err(|err| SgError::notation("hall-basis", err.info().message.clone(), hall))?;
        ops = change_basis_forward(&ops, &cob)?;
    }
    Ok(ops)
}

fn split_change_of_basis(hall: &str) -> Result<(&str, Option<&str>), SgError> {
    let Some(open) = hall.find('(') else {
        return Ok((hall, None));
    };
    let close = hall[open..]
        .find(')')
        .map(|offset| open + offset)
        .ok_or_else(|| SgError::notation("hall-basis", "missing ')'", hall))?;
    if !hall[close + 1..].trim().is_empty() {
        return Err(SgError::notation(
            "hall-basis",
            "unexpected text after the change of basis",
            hall,
        ));
    }
    Ok((&hall[..open], Some(&hall[open + 1..close])))
}

/// Parses `(x,y,z+1/4)` style operators or `(0 0 1)` origin shifts in twelfths.
fn parse_change_of_basis(text: &str) -> Result<Op, SgError> {
    if text.contains(',') {
        return Op::from_triplet(text);
    }
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(SgError::notation(
            "hall-basis",
            "origin shift needs three integers",
            text,
        ));
    }
    let mut tran: Tran = [0; 3];
    for (slot, part) in tran.iter_mut().zip(&parts) {
        let twelfths: i32 = part.parse().map_err(|_| {
            SgError::notation("hall-basis", format!("'{part}' is not an integer"), text)
        })?;
        *slot = twelfths * (DEN / 12);
    }
    Ok(Op::from_tran(tran))
}

/// Centering translations of a lattice symbol, zero vector first.
pub fn lattice_translations(symbol: char) -> Option<Vec<Tran>> {
    let extra: &[Tran] = match symbol.to_ascii_uppercase() {
        'P' => &[],
        'A' => &[[0, H, H]],
        'B' => &[[H, 0, H]],
        'C' => &[[H, H, 0]],
        'I' => &[[H, H, H]],
        'R' => &[[2 * T, T, T], [T, 2 * T, 2 * T]],
        'S' => &[[T, T, 2 * T], [2 * T, 2 * T, T]],
        'T' => &[[T, 2 * T, T], [2 * T, T, 2 * T]],
        'F' => &[[0, H, H], [H, 0, H], [H, H, 0]],
        _ => return None,
    };
    let mut translations = vec![[0, 0, 0]];
    translations.extend_from_slice(extra);
    Some(translations)
}

fn translation_symbol(symbol: char) -> Option<Tran> {
    let tran = match symbol {
        'a' => [H, 0, 0],
        'b' => [0, H, 0],
        'c' => [0, 0, H],
        'n' => [H, H, H],
        'u' => [Q, 0, 0],
        'v' => [0, Q, 0],
        'w' => [0, 0, Q],
        'd' => [Q, Q, Q],
        _ => return None,
    };
    Some(tran)
}

/// Axis and order of the matrix symbol that came before the current one.
#[derive(Debug, Default, Clone, Copy)]
struct Preceding {
    order: u8,
    axis: Option<usize>,
}

fn matrix_symbol(token: &str, position: usize, previous: &mut Preceding) -> Result<Op, String> {
    let mut chars = token.chars().peekable();
    let improper = chars.next_if_eq(&'-').is_some();
    let order = match chars.next() {
        Some(c @ ('1' | '2' | '3' | '4' | '6')) => c as u8 - b'0',
        _ => return Err(format!("wrong n-fold order notation: '{token}'")),
    };

    let mut screw: Option<i32> = None;
    let mut principal: Option<usize> = None;
    let mut diagonal: Option<char> = None;
    let mut tran: Tran = [0; 3];
    for c in chars {
        match c {
            '1'..='5' => {
                if screw.is_some() {
                    return Err(format!("two numeric subscripts in '{token}'"));
                }
                screw = Some(i32::from(c as u8 - b'0'));
            }
            '\'' | '"' | '*' => {
                let expected = if c == '*' { 3 } else { 2 };
                if order != expected {
                    return Err(format!("axis symbol '{c}' needs a {expected}-fold in '{token}'"));
                }
                diagonal = Some(c);
            }
            'x' | 'y' | 'z' => principal = Some(c as usize - 'x' as usize),
            other => match translation_symbol(other) {
                Some(shift) => {
                    for (t, s) in tran.iter_mut().zip(shift) {
                        *t += s;
                    }
                }
                None => return Err(format!("unexpected '{other}' in '{token}'")),
            },
        }
    }

    if principal.is_none() && diagonal.is_none() {
        match (position, order) {
            (1, _) => principal = Some(2),
            (2, 2) if matches!(previous.order, 2 | 4) => principal = Some(0),
            (2, 2) if matches!(previous.order, 3 | 6) => diagonal = Some('\''),
            (3, 3) => diagonal = Some('*'),
            _ => {}
        }
        if principal.is_none() && diagonal.is_none() && order != 1 {
            return Err(format!("missing axis in '{token}'"));
        }
    }

    let rot = match diagonal {
        Some('*') => scaled([[0, 0, 1], [1, 0, 0], [0, 1, 0]]),
        Some(kind) => {
            let reference = principal.or(previous.axis).unwrap_or(2);
            let base = if kind == '\'' {
                [[0, -1, 0], [-1, 0, 0], [0, 0, -1]]
            } else {
                [[0, 1, 0], [1, 0, 0], [0, 0, -1]]
            };
            scaled(onto_axis(base, reference))
        }
        None => {
            let axis = principal.unwrap_or(2);
            scaled(onto_axis(z_rotation(order), axis))
        }
    };
    let mut op = Op { rot, tran };
    if improper {
        op = op.negated_rot();
    }
    if let Some(k) = screw {
        match (principal, diagonal) {
            (Some(axis), None) => op.tran[axis] += DEN / i32::from(order) * k,
            _ => return Err(format!("screw subscript without a principal axis in '{token}'")),
        }
    }

    previous.order = order;
    if principal.is_some() {
        previous.axis = principal;
    }
    Ok(op)
}

fn z_rotation(order: u8) -> [[i32; 3]; 3] {
    match order {
        2 => [[-1, 0, 0], [0, -1, 0], [0, 0, 1]],
        3 => [[0, -1, 0], [1, -1, 0], [0, 0, 1]],
        4 => [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
        6 => [[1, -1, 0], [1, 0, 0], [0, 0, 1]],
        _ => [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    }
}

/// Re-expresses a matrix written for the z axis for the given axis by cyclic
/// permutation of coordinates.
fn onto_axis(matrix: [[i32; 3]; 3], axis: usize) -> [[i32; 3]; 3] {
    let shift = (axis + 1) % 3;
    let mut out = [[0; 3]; 3];
    for (i, row) in matrix.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            out[(i + shift) % 3][(j + shift) % 3] = *value;
        }
    }
    out
}

fn scaled(matrix: [[i32; 3]; 3]) -> Rot {
    matrix.map(|row| row.map(|v| v * DEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triplets(hall: &str) -> Vec<String> {
        generators_from_hall(hall)
            .unwrap()
            .sym_ops
            .iter()
            .map(Op::triplet)
            .collect()
    }

    #[test]
    fn default_axes_follow_position_rules() {
        assert_eq!(triplets("P 2"), ["x,y,z", "-x,-y,z"]);
        assert_eq!(triplets("P 4 2"), ["x,y,z", "-y,x,z", "x,-y,-z"]);
        assert_eq!(triplets("P 3 2"), ["x,y,z", "-y,x-y,z", "-y,-x,-z"]);
        assert_eq!(triplets("P 2 2 3"), ["x,y,z", "-x,-y,z", "x,-y,-z", "z,x,y"]);
    }

    #[test]
    fn axes_are_cyclic_permutations_of_z() {
        assert_eq!(triplets("P 3x"), ["x,y,z", "x,-z,y-z"]);
        assert_eq!(triplets("P 3y"), ["x,y,z", "-x+z,y,-x"]);
        assert_eq!(triplets("P 2x\""), ["x,y,z", "-x,z,y"]);
    }

    #[test]
    fn screws_and_glide_translations() {
        assert_eq!(triplets("P 61"), ["x,y,z", "x-y,x,z+1/6"]);
        assert_eq!(triplets("P 2yb"), ["x,y,z", "-x,y+1/2,-z"]);
        assert_eq!(triplets("-P 2ybc"), ["x,y,z", "-x,-y,-z", "-x,y+1/2,-z+1/2"]);
        assert_eq!(triplets("P 2 2 -1n"), ["x,y,z", "-x,-y,z", "x,-y,-z", "-x+1/2,-y+1/2,-z+1/2"]);
    }

    #[test]
    fn origin_shift_in_twelfths() {
        let ops = generators_from_hall("P 2 (0 0 3)").unwrap();
        assert_eq!(ops.sym_ops[1].triplet(), "-x,-y,z");
        let ops = generators_from_hall("P 2x (0 0 3)").unwrap();
        assert_eq!(ops.sym_ops[1].triplet(), "x,-y,-z+1/2");
    }

    #[test]
    fn rejects_malformed_symbols() {
        for bad in ["", "Q 2", "P 5", "P 2q", "P 2 2 (x,y,z", "P 21 (x,y,z) 2", "P 3'", "PP 2"] {
            assert!(
                matches!(generators_from_hall(bad), Err(SgError::InvalidNotation(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
