#![deny(missing_docs)]
#![doc = "Verification, basis canonicalization, duplicate tracking and assembly of \
the space-group table, plus its source-text and JSON emitters."]

pub mod assemble;
pub mod basis;
pub mod config;
pub mod curated;
pub mod dups;
pub mod emit;
pub mod reference;
pub mod verify;

pub use assemble::{
    compact_name, index_records, AssemblyOptions, CanonicalEntry, Section, Table, TableAssembler,
};
pub use basis::{BasisCanonicalizer, BasisTable, Canonical};
pub use config::{OutputFormat, TableConfig};
pub use curated::{shorter_hall, CuratedGroup, CURATED, SHORTER_HALLS};
pub use dups::DuplicateTracker;
pub use emit::{
    content_hash, parse_json, provenance, render_json, render_source, TableDocument,
};
pub use reference::{StaticReference, TsvReference};
pub use verify::EquivalenceVerifier;
