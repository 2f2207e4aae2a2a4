#![deny(missing_docs)]
#![doc = "Record parser for the CCP4 `syminfo.lib` symmetry database."]

use std::fs;
use std::path::Path;

use sgt_core::{ErrorInfo, SgError};

pub mod parser;
pub mod record;
pub mod words;

pub use parser::parse_syminfo;
pub use record::SymmetryRecord;
pub use words::shell_split;

/// Reads and parses a database file.
pub fn load_syminfo(path: &Path) -> Result<Vec<SymmetryRecord>, SgError> {
    let text = fs::read_to_string(path).map_err(|err| {
        SgError::Io(
            ErrorInfo::new("syminfo-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    parse_syminfo(&text)
}
