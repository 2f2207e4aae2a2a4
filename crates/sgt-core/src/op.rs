//! Exact crystallographic symmetry operations.
//!
//! Rotation and translation parts are stored as integers scaled by [`DEN`],
//! so every fraction that occurs in space-group tables (halves, thirds,
//! quarters, sixths, eighths and twelfths) is represented without rounding.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SgError;

/// Common denominator of all rotation and translation entries.
pub const DEN: i32 = 24;

/// Rotation (or general linear) part, scaled by [`DEN`].
pub type Rot = [[i32; 3]; 3];

/// Translation part, scaled by [`DEN`].
pub type Tran = [i32; 3];

const AXES: [char; 3] = ['x', 'y', 'z'];

const OUT_OF_RANGE: &str = "number out of range";

/// Seitz operation `(R|t)` acting on fractional coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Op {
    /// Linear part scaled by [`DEN`].
    pub rot: Rot,
    /// Translation part scaled by [`DEN`].
    pub tran: Tran,
}

impl Op {
    /// Returns the identity operation `x,y,z`.
    pub const fn identity() -> Self {
        Self {
            rot: [[DEN, 0, 0], [0, DEN, 0], [0, 0, DEN]],
            tran: [0, 0, 0],
        }
    }

    /// Returns the pure translation with the given (scaled) vector.
    pub const fn from_tran(tran: Tran) -> Self {
        let mut op = Self::identity();
        op.tran = tran;
        op
    }

    /// Parses a coordinate triplet such as `-x,y+1/2,-z`.
    pub fn from_triplet(text: &str) -> Result<Self, SgError> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 3 {
            return Err(SgError::notation(
                "triplet-arity",
                "a triplet must have exactly three comma separated parts",
                text,
            ));
        }
        let mut op = Op {
            rot: [[0; 3]; 3],
            tran: [0; 3],
        };
        for (row, part) in parts.iter().enumerate() {
            let (coeffs, shift) = parse_row(part).map_err(|message| {
                SgError::notation("triplet-parse", message, text).with_row(row)
            })?;
            op.rot[row] = coeffs;
            op.tran[row] = shift;
        }
        Ok(op)
    }

    /// Renders the operation as a normalized coordinate triplet.
    pub fn triplet(&self) -> String {
        (0..3)
            .map(|row| format_row(&self.rot[row], self.tran[row]))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Group multiplication: applies `other` first, then `self`.
    ///
    /// The product must stay on the [`DEN`] grid; use
    /// [`Op::checked_combine`] when one factor is an arbitrary change of basis.
    pub fn combine(&self, other: &Op) -> Op {
        let (product, exact) = self.multiply(other);
        debug_assert!(exact, "{} * {} leaves the 1/{} grid", self, other, DEN);
        product
    }

    /// Group multiplication, or `None` when an entry of the product is not
    /// a multiple of `1/DEN`.
    pub fn checked_combine(&self, other: &Op) -> Option<Op> {
        let (product, exact) = self.multiply(other);
        exact.then_some(product)
    }

    fn multiply(&self, other: &Op) -> (Op, bool) {
        let mut out = Op {
            rot: [[0; 3]; 3],
            tran: [0; 3],
        };
        let mut exact = true;
        for i in 0..3 {
            for j in 0..3 {
                let acc: i32 = (0..3).map(|k| self.rot[i][k] * other.rot[k][j]).sum();
                exact &= acc % DEN == 0;
                out.rot[i][j] = acc / DEN;
            }
            let acc: i32 = (0..3).map(|k| self.rot[i][k] * other.tran[k]).sum();
            exact &= acc % DEN == 0;
            out.tran[i] = acc / DEN + self.tran[i];
        }
        (out, exact)
    }

    /// Reduces the translation modulo one lattice vector into `[0, 1)`.
    pub fn wrap(mut self) -> Op {
        for t in &mut self.tran {
            *t = t.rem_euclid(DEN);
        }
        self
    }

    /// Reduces the translation into `(-1/2, 1/2]`.
    pub fn centred(mut self) -> Op {
        for t in &mut self.tran {
            let mut v = t.rem_euclid(DEN);
            if v > DEN / 2 {
                v -= DEN;
            }
            *t = v;
        }
        self
    }

    /// Determinant of the linear part, scaled by `DEN^3`.
    pub fn det_rot(&self) -> i32 {
        let r = |i: usize, j: usize| i64::from(self.rot[i][j]);
        let det = r(0, 0) * (r(1, 1) * r(2, 2) - r(1, 2) * r(2, 1))
            - r(0, 1) * (r(1, 0) * r(2, 2) - r(1, 2) * r(2, 0))
            + r(0, 2) * (r(1, 0) * r(2, 1) - r(1, 1) * r(2, 0));
        det as i32
    }

    /// Returns the inverse operation.
    ///
    /// Fails when the linear part is singular or when the inverse is not
    /// representable on the [`DEN`] grid.
    pub fn inverse(&self) -> Result<Op, SgError> {
        let det = i64::from(self.det_rot());
        if det == 0 {
            return Err(SgError::notation(
                "singular-operation",
                "operation has a singular linear part",
                &self.triplet(),
            ));
        }
        let r = |i: usize, j: usize| i64::from(self.rot[i][j]);
        let adj = [
            [
                r(1, 1) * r(2, 2) - r(1, 2) * r(2, 1),
                r(0, 2) * r(2, 1) - r(0, 1) * r(2, 2),
                r(0, 1) * r(1, 2) - r(0, 2) * r(1, 1),
            ],
            [
                r(1, 2) * r(2, 0) - r(1, 0) * r(2, 2),
                r(0, 0) * r(2, 2) - r(0, 2) * r(2, 0),
                r(0, 2) * r(1, 0) - r(0, 0) * r(1, 2),
            ],
            [
                r(1, 0) * r(2, 1) - r(1, 1) * r(2, 0),
                r(0, 1) * r(2, 0) - r(0, 0) * r(2, 1),
                r(0, 0) * r(1, 1) - r(0, 1) * r(1, 0),
            ],
        ];
        let den2 = i64::from(DEN) * i64::from(DEN);
        let mut inv = Op {
            rot: [[0; 3]; 3],
            tran: [0; 3],
        };
        for i in 0..3 {
            for j in 0..3 {
                let scaled = adj[i][j] * den2;
                if scaled % det != 0 {
                    return Err(self.unrepresentable());
                }
                inv.rot[i][j] = (scaled / det) as i32;
            }
        }
        for i in 0..3 {
            let acc: i64 = (0..3)
                .map(|k| i64::from(inv.rot[i][k]) * i64::from(self.tran[k]))
                .sum();
            if acc % i64::from(DEN) != 0 {
                return Err(self.unrepresentable());
            }
            inv.tran[i] = -(acc / i64::from(DEN)) as i32;
        }
        Ok(inv)
    }

    /// Returns a copy with the translation shifted by `tran`.
    pub fn translated(&self, tran: Tran) -> Op {
        let mut op = *self;
        for (t, shift) in op.tran.iter_mut().zip(tran) {
            *t += shift;
        }
        op
    }

    /// Returns a copy with the linear part negated (composition with `-1`).
    pub fn negated_rot(&self) -> Op {
        let mut op = *self;
        for row in &mut op.rot {
            for v in row {
                *v = -*v;
            }
        }
        op
    }

    /// Whether the linear part is the identity matrix.
    pub fn is_pure_translation(&self) -> bool {
        self.rot == Op::identity().rot
    }

    fn unrepresentable(&self) -> SgError {
        SgError::notation(
            "inexact-inverse",
            format!("inverse is not representable with denominator {DEN}"),
            &self.triplet(),
        )
    }
}

impl Default for Op {
    fn default() -> Self {
        Op::identity()
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.triplet())
    }
}

impl FromStr for Op {
    type Err = SgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::from_triplet(s)
    }
}

impl SgError {
    fn with_row(self, row: usize) -> Self {
        match self {
            SgError::InvalidNotation(info) => {
                SgError::InvalidNotation(info.with_context("row", row.to_string()))
            }
            other => other,
        }
    }
}

/// Explicit operation set of a space group in one setting.
///
/// `sym_ops` holds one representative per coset of the translation lattice
/// (identity first); `cen_ops` holds the centering translations including the
/// zero vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOps {
    /// Coset representatives, identity first.
    pub sym_ops: Vec<Op>,
    /// Centering translations, zero vector first.
    pub cen_ops: Vec<Tran>,
}

impl Default for GroupOps {
    fn default() -> Self {
        Self {
            sym_ops: vec![Op::identity()],
            cen_ops: vec![[0, 0, 0]],
        }
    }
}

impl GroupOps {
    /// Number of operations modulo integer lattice translations.
    pub fn order(&self) -> usize {
        self.sym_ops.len() * self.cen_ops.len()
    }

    /// Every operation of the group modulo integer lattice translations.
    pub fn all_ops(&self) -> BTreeSet<Op> {
        self.sym_ops
            .iter()
            .flat_map(|op| self.cen_ops.iter().map(move |tran| op.translated(*tran).wrap()))
            .collect()
    }

    /// Whether both descriptions generate the same operation set.
    pub fn is_same_as(&self, other: &GroupOps) -> bool {
        self.all_ops() == other.all_ops()
    }
}

fn parse_row(part: &str) -> Result<([i32; 3], i32), String> {
    let chars: Vec<char> = part
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if chars.is_empty() {
        return Err("empty triplet component".to_string());
    }
    let mut coeffs = [0i32; 3];
    let mut shift = 0i32;
    let mut pos = 0usize;
    while pos < chars.len() {
        let sign = match chars[pos] {
            '+' => {
                pos += 1;
                1
            }
            '-' => {
                pos += 1;
                -1
            }
            _ if pos == 0 => 1,
            other => return Err(format!("unexpected character '{other}'")),
        };
        let number = parse_rational(&chars, &mut pos)?;
        if number.is_some() && chars.get(pos) == Some(&'*') {
            pos += 1;
        }
        let axis = match chars.get(pos) {
            Some(c) => AXES.iter().position(|axis| axis == c),
            None => None,
        };
        if axis.is_some() {
            pos += 1;
        }
        let (mut num, mut den) = number.unwrap_or((1, 1));
        if axis.is_some() && chars.get(pos) == Some(&'/') {
            pos += 1;
            let divisor = parse_integer(&chars, &mut pos)?.ok_or("missing divisor")?;
            if divisor == 0 {
                return Err("division by zero".to_string());
            }
            den = den.checked_mul(divisor).ok_or(OUT_OF_RANGE)?;
        }
        if number.is_none() && axis.is_none() {
            return Err(match chars.get(pos) {
                Some(c) => format!("unexpected character '{c}'"),
                None => "dangling sign".to_string(),
            });
        }
        num *= sign;
        let scaled = num.checked_mul(i64::from(DEN)).ok_or(OUT_OF_RANGE)?;
        if scaled % den != 0 {
            return Err(format!("{num}/{den} is not a multiple of 1/{DEN}"));
        }
        let value = i32::try_from(scaled / den).map_err(|_| OUT_OF_RANGE)?;
        let slot = match axis {
            Some(idx) => &mut coeffs[idx],
            None => &mut shift,
        };
        *slot = slot.checked_add(value).ok_or(OUT_OF_RANGE)?;
    }
    Ok((coeffs, shift))
}

fn parse_integer(chars: &[char], pos: &mut usize) -> Result<Option<i64>, String> {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == start {
        return Ok(None);
    }
    let digits: String = chars[start..*pos].iter().collect();
    digits.parse().map(Some).map_err(|_| OUT_OF_RANGE.to_string())
}

fn parse_rational(chars: &[char], pos: &mut usize) -> Result<Option<(i64, i64)>, String> {
    let leading_dot = chars.get(*pos) == Some(&'.');
    let Some(whole) = parse_integer(chars, pos)?.or(if leading_dot { Some(0) } else { None }) else {
        return Ok(None);
    };
    match chars.get(*pos) {
        Some('/') if chars.get(*pos + 1).is_some_and(|c| c.is_ascii_digit()) => {
            *pos += 1;
            let den = parse_integer(chars, pos)?.ok_or("missing denominator")?;
            if den == 0 {
                return Err("division by zero".to_string());
            }
            Ok(Some((whole, den)))
        }
        Some('.') => {
            *pos += 1;
            let start = *pos;
            let frac = parse_integer(chars, pos)?.unwrap_or(0);
            let digits = u32::try_from(*pos - start).map_err(|_| OUT_OF_RANGE)?;
            let den = 10i64.checked_pow(digits).ok_or(OUT_OF_RANGE)?;
            let num = whole
                .checked_mul(den)
                .and_then(|v| v.checked_add(frac))
                .ok_or(OUT_OF_RANGE)?;
            Ok(Some((num, den)))
        }
        _ => Ok(Some((whole, 1))),
    }
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

fn fraction(value: i32) -> (i32, i32) {
    let g = gcd(value, DEN).max(1);
    (value / g, DEN / g)
}

fn format_row(coeffs: &[i32; 3], shift: i32) -> String {
    let mut s = String::new();
    for (idx, &c) in coeffs.iter().enumerate() {
        if c == 0 {
            continue;
        }
        if c < 0 {
            s.push('-');
        } else if !s.is_empty() {
            s.push('+');
        }
        let (num, den) = fraction(c.abs());
        if num != 1 {
            s.push_str(&num.to_string());
        }
        s.push(AXES[idx]);
        if den != 1 {
            s.push('/');
            s.push_str(&den.to_string());
        }
    }
    if shift != 0 {
        if shift < 0 {
            s.push('-');
        } else if !s.is_empty() {
            s.push('+');
        }
        let (num, den) = fraction(shift.abs());
        s.push_str(&num.to_string());
        if den != 1 {
            s.push('/');
            s.push_str(&den.to_string());
        }
    }
    if s.is_empty() {
        s.push('0');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_triplet_spellings() {
        let a = Op::from_triplet("-x,y+1/2,-z").unwrap();
        let b = Op::from_triplet(" -X , 1/2+Y , -Z ").unwrap();
        let c = Op::from_triplet("-x,y+0.5,-z").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.tran, [0, DEN / 2, 0]);
        assert_eq!(a.rot[0], [-DEN, 0, 0]);
    }

    #[test]
    fn renders_fractional_coefficients() {
        let op = Op::from_triplet("x/2+y/2,-x/2+y/2,z").unwrap();
        assert_eq!(op.triplet(), "x/2+y/2,-x/2+y/2,z");
        let op = Op::from_triplet("2x,3y/2,z-1/4").unwrap();
        assert_eq!(op.triplet(), "2x,3y/2,z-1/4");
    }

    #[test]
    fn rejects_malformed_triplets() {
        assert!(Op::from_triplet("x,y").is_err());
        assert!(Op::from_triplet("x,y,q").is_err());
        assert!(Op::from_triplet("x,y,z+1/5").is_err());
        assert!(Op::from_triplet("x,,z").is_err());
    }

    #[test]
    fn oversized_numbers_are_errors() {
        for text in [
            "x+0.0000000000000000001,y,z",
            "x+100000000000,y,z",
            "x+99999999999999999999,y,z",
            "99999999999x,y,z",
        ] {
            assert!(
                matches!(Op::from_triplet(text), Err(SgError::InvalidNotation(_))),
                "{text}"
            );
        }
        assert_eq!(Op::from_triplet("x+0.250,y,z").unwrap().tran, [DEN / 4, 0, 0]);
    }

    #[test]
    fn checked_combine_rejects_products_off_the_grid() {
        let halving = Op::from_triplet("x/2,y,z").unwrap();
        let eighth = Op::from_triplet("x+1/8,y,z").unwrap();
        assert_eq!(halving.checked_combine(&eighth), None);
        let quarter = Op::from_triplet("x+1/4,y,z").unwrap();
        assert_eq!(
            halving.checked_combine(&quarter).map(|op| op.triplet()),
            Some("x/2+1/8,y,z".to_string())
        );
    }

    #[test]
    fn inverse_of_screw_axis() {
        let op = Op::from_triplet("-y,x,z+1/4").unwrap();
        let inv = op.inverse().unwrap();
        assert_eq!(inv.triplet(), "y,-x,z-1/4");
        assert_eq!(op.combine(&inv), Op::identity());
    }

    #[test]
    fn inverse_of_enlarging_basis_change() {
        let op = Op::from_triplet("x-y,x+y,z").unwrap();
        let inv = op.inverse().unwrap();
        assert_eq!(inv.triplet(), "x/2+y/2,-x/2+y/2,z");
        assert_eq!(inv.combine(&op), Op::identity());
    }

    #[test]
    fn wrap_and_centre_translations() {
        let op = Op::from_triplet("x-1/4,y+5/4,z+3/4").unwrap();
        assert_eq!(op.wrap().triplet(), "x+3/4,y+1/4,z+3/4");
        assert_eq!(op.centred().triplet(), "x-1/4,y+1/4,z-1/4");
    }
}
