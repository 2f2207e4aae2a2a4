#![deny(missing_docs)]
#![doc = "Core types for the space-group table compiler: the error taxonomy, exact \
symmetry operations, and the contracts of the algebra collaborators the compiler \
is driven by."]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod op;
pub mod provenance;

pub use errors::{ErrorInfo, SgError};
pub use op::{GroupOps, Op, Rot, Tran, DEN};
pub use provenance::{RunProvenance, SchemaVersion};

/// One standard setting as listed by the reference enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceGroup {
    /// International space-group number (1-230).
    pub number: u32,
    /// Hall symbol of the setting.
    pub hall: String,
    /// Hermann-Mauguin symbol without the extension.
    pub hm: String,
    /// Setting extension (origin choice, cell choice, axes).
    #[serde(default)]
    pub ext: Option<char>,
    /// Free-text qualifier such as `b1` or `-cba`.
    #[serde(default)]
    pub qualifier: String,
}

impl ReferenceGroup {
    /// Long-form name used as the database lookup key, e.g. `P n n n:1`.
    pub fn long_name(&self) -> String {
        match self.ext {
            Some(ext) => format!("{}:{}", self.hm, ext),
            None => self.hm.clone(),
        }
    }
}

/// Change of basis from the reference setting of a space-group type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisChange {
    /// Space-group number of the type the setting belongs to.
    pub number: u32,
    /// Operator `C` with `G = C * G_ref * C^-1`.
    pub operator: Op,
}

impl BasisChange {
    /// Normalized triplet text of the operator.
    pub fn text(&self) -> String {
        self.operator.triplet()
    }
}

/// Operation algebra used to verify database records.
///
/// The compiler treats this capability as optional: when no implementation
/// is supplied, equivalence checks are skipped.
pub trait OperationAlgebra {
    /// Expands a Hall symbol into coset representatives and centering vectors.
    fn expand(&self, hall: &str) -> Result<GroupOps, SgError>;

    /// Group multiplication, translation reduced modulo one.
    ///
    /// Fails when the product leaves the [`DEN`] grid.
    fn compose(&self, a: &Op, b: &Op) -> Result<Op, SgError> {
        match a.checked_combine(b) {
            Some(product) => Ok(product.wrap()),
            None => Err(SgError::InvalidNotation(
                ErrorInfo::new("inexact-product", "product is not representable exactly")
                    .with_context("left", a.triplet())
                    .with_context("right", b.triplet()),
            )),
        }
    }

    /// Parses a coordinate triplet into an operation.
    fn parse_triplet(&self, text: &str) -> Result<Op, SgError> {
        Op::from_triplet(text)
    }
}

/// Ordered source of the standard settings the output table is built on.
pub trait ReferenceEnumeration {
    /// Returns every standard setting in canonical order.
    fn reference_groups(&self) -> Result<Vec<ReferenceGroup>, SgError>;
}

/// Group-theory layer computing changes of basis to reference settings.
pub trait BasisAlgebra {
    /// Computes the change of basis taking the reference setting of the
    /// space-group type to the setting described by `hall`.
    ///
    /// When `number` is `None` the space-group type is identified first.
    fn basis_from_reference(&self, hall: &str, number: Option<u32>)
        -> Result<BasisChange, SgError>;
}

/// Crystal system of a space-group type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrystalSystem {
    /// Numbers 1-2.
    Triclinic,
    /// Numbers 3-15.
    Monoclinic,
    /// Numbers 16-74.
    Orthorhombic,
    /// Numbers 75-142.
    Tetragonal,
    /// Numbers 143-167.
    Trigonal,
    /// Numbers 168-194.
    Hexagonal,
    /// Numbers 195-230.
    Cubic,
}

impl CrystalSystem {
    /// Classifies a space-group number; `None` outside 1-230.
    pub fn from_number(number: u32) -> Option<Self> {
        let system = match number {
            1..=2 => CrystalSystem::Triclinic,
            3..=15 => CrystalSystem::Monoclinic,
            16..=74 => CrystalSystem::Orthorhombic,
            75..=142 => CrystalSystem::Tetragonal,
            143..=167 => CrystalSystem::Trigonal,
            168..=194 => CrystalSystem::Hexagonal,
            195..=230 => CrystalSystem::Cubic,
            _ => return None,
        };
        Some(system)
    }

    /// Lower-case name as used in table comments.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrystalSystem::Triclinic => "triclinic",
            CrystalSystem::Monoclinic => "monoclinic",
            CrystalSystem::Orthorhombic => "orthorhombic",
            CrystalSystem::Tetragonal => "tetragonal",
            CrystalSystem::Trigonal => "trigonal",
            CrystalSystem::Hexagonal => "hexagonal",
            CrystalSystem::Cubic => "cubic",
        }
    }
}

impl fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
