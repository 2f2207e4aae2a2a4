//! The record type produced by the parser, one per database block.

use serde::{Deserialize, Serialize};

/// One `begin_spacegroup` ... `end_spacegroup` block of the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetryRecord {
    /// International space-group number.
    pub number: u32,
    /// CCP4 number; `0` when none is assigned.
    pub ccp4_code: u32,
    /// Hall symbol with surrounding quotes removed.
    pub hall_symbol: String,
    /// Extended Hermann-Mauguin name, `:ext` suffix included.
    pub extended_hm_name: String,
    /// Names from the `symbol old` line.
    #[serde(default)]
    pub legacy_aliases: Vec<String>,
    /// Change of basis from the reference setting as written in the file.
    pub basis_operator_text: String,
    /// General positions, in file order.
    pub explicit_operations: Vec<String>,
    /// Centering translations, in file order.
    pub centering_operations: Vec<String>,
    /// 1-based line of the `begin_spacegroup` marker.
    pub line: usize,
}

impl SymmetryRecord {
    /// Name shown in the output table.
    ///
    /// Falls back to the first legacy alias for records without an extended
    /// name.
    pub fn display_name(&self) -> &str {
        if self.extended_hm_name.is_empty() {
            self.legacy_aliases
                .first()
                .map(String::as_str)
                .unwrap_or_default()
        } else {
            &self.extended_hm_name
        }
    }

    /// Splits `name:ext` into the name and the extension letter.
    pub fn split_extension(name: &str) -> (&str, Option<char>) {
        match name.split_once(':') {
            Some((hm, ext)) => (hm.trim_end(), ext.trim().chars().next()),
            None => (name, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_split() {
        assert_eq!(SymmetryRecord::split_extension("P n n n:1"), ("P n n n", Some('1')));
        assert_eq!(SymmetryRecord::split_extension("R 3:H"), ("R 3", Some('H')));
        assert_eq!(SymmetryRecord::split_extension("P 1 2 1"), ("P 1 2 1", None));
    }
}
