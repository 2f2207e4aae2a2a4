#![deny(missing_docs)]
#![doc = "Hall-notation symmetry algebra: expansion of Hall symbols into operation \
sets, group closure, and the change-of-basis search against reference settings."]

pub mod algebra;
pub mod basis;
pub mod group;
pub mod hall;

pub use algebra::{HallAlgebra, ReferenceBasis};
pub use basis::BasisSolver;
pub use group::{change_basis_forward, complete};
pub use hall::{generators_from_hall, lattice_translations, symops_from_hall};
