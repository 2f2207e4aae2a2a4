//! Provenance and schema descriptors attached to emitted tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Layout of the JSON table document written by this release.
    pub const TABLE: SchemaVersion = SchemaVersion::new(1, 0, 0);

    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether a reader built for `self` can load a document written as
    /// `written`: same major, no newer minor.
    pub fn can_read(&self, written: &SchemaVersion) -> bool {
        self.major == written.major && written.minor <= self.minor
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::TABLE
    }
}

/// Provenance information attached to every serialized table.
///
/// No timestamps are recorded: two runs over the same inputs must produce
/// byte-identical artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// SHA-256 of the symmetry database snapshot.
    pub database_hash: String,
    /// SHA-256 of the reference enumeration source, when it is a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_hash: Option<String>,
    /// Whether the equivalence verifier ran during compilation.
    pub verified: bool,
    /// Version map for all tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::SchemaVersion;

    #[test]
    fn readers_accept_older_minors_only() {
        let reader = SchemaVersion::new(1, 2, 0);
        assert!(reader.can_read(&SchemaVersion::new(1, 0, 7)));
        assert!(reader.can_read(&SchemaVersion::new(1, 2, 3)));
        assert!(!reader.can_read(&SchemaVersion::new(1, 3, 0)));
        assert!(!reader.can_read(&SchemaVersion::new(2, 0, 0)));
    }
}
