//! Serialization of an assembled [`Table`].

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sgt_core::{ErrorInfo, RunProvenance, SchemaVersion, SgError};
use sha2::{Digest, Sha256};

use crate::assemble::{CanonicalEntry, Section, Table};

/// Hex SHA-256 of `bytes`, used for provenance.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Provenance of a run over the given input bytes.
pub fn provenance(database: &[u8], reference: Option<&[u8]>, verified: bool) -> RunProvenance {
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    RunProvenance {
        database_hash: content_hash(database),
        reference_hash: reference.map(content_hash),
        verified,
        tool_versions,
    }
}

/// Renders the table as literal source text: the rows, then the basis
/// operators.
pub fn render_source(table: &Table) -> String {
    let mut out = String::new();
    let reference: Vec<&CanonicalEntry> = section_rows(table, |s| matches!(s, Section::Reference));
    let _ = writeln!(out, "  // This table was generated by sgt.");
    let _ = writeln!(
        out,
        "  // First {} entries in the same order as in the reference enumeration.",
        reference.len()
    );
    for (number, count) in duplicate_counts(&reference) {
        let _ = writeln!(
            out,
            "  // Note: spacegroup {number} has {} with different H-M names.",
            plural(count, "duplicate")
        );
    }
    for entry in &reference {
        out.push_str(&row_line(entry));
    }

    let _ = writeln!(out, "  // And extra entries from syminfo.lib");
    for entry in section_rows(table, |s| matches!(s, Section::Supplementary)) {
        out.push_str(&row_line(entry));
    }

    let _ = writeln!(out, "  // And ...");
    let mut label: Option<&str> = None;
    for entry in section_rows(table, |s| matches!(s, Section::Curated(_))) {
        if let Section::Curated(current) = &entry.section {
            if label != Some(current.as_str()) {
                let _ = writeln!(out, "  // {current}");
                label = Some(current.as_str());
            }
        }
        out.push_str(&row_line(entry));
    }

    out.push_str("\n\n\n");
    for (idx, op) in table.basis_operators.iter().enumerate() {
        let _ = writeln!(out, "    \"{op}\",  // {idx}");
    }
    out
}

/// JSON form of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Layout version of this document.
    pub schema: SchemaVersion,
    /// Inputs and tools of the run.
    pub provenance: RunProvenance,
    /// Rows and basis operators.
    pub table: Table,
}

impl TableDocument {
    /// Bundles a table with its provenance under the current schema.
    pub fn new(table: Table, provenance: RunProvenance) -> Self {
        Self {
            schema: SchemaVersion::TABLE,
            provenance,
            table,
        }
    }
}

/// Parses a document written by [`render_json`], rejecting schema versions
/// this build cannot read.
pub fn parse_json(text: &str) -> Result<TableDocument, SgError> {
    let document: TableDocument = serde_json::from_str(text)
        .map_err(|err| SgError::Serde(ErrorInfo::new("json-parse", err.to_string())))?;
    if !SchemaVersion::TABLE.can_read(&document.schema) {
        return Err(SgError::Serde(
            ErrorInfo::new("schema-version", "unsupported table document schema")
                .with_context(
                    "schema",
                    format!(
                        "{}.{}.{}",
                        document.schema.major, document.schema.minor, document.schema.patch
                    ),
                ),
        ));
    }
    Ok(document)
}

/// Pretty JSON with a trailing newline.
pub fn render_json(document: &TableDocument) -> Result<String, SgError> {
    let mut text = serde_json::to_string_pretty(document)
        .map_err(|err| SgError::Serde(ErrorInfo::new("json-serialize", err.to_string())))?;
    text.push('\n');
    Ok(text)
}

fn section_rows(table: &Table, keep: impl Fn(&Section) -> bool) -> Vec<&CanonicalEntry> {
    table.entries.iter().filter(|e| keep(&e.section)).collect()
}

fn duplicate_counts(entries: &[&CanonicalEntry]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.duplicate_of.is_some()) {
        *counts.entry(entry.number).or_insert(0) += 1;
    }
    counts
}

fn plural(count: usize, word: &str) -> String {
    let numbers = ["zero", "one", "two", "three", "four", "five", "six"];
    let spelled = numbers
        .get(count)
        .map(|s| s.to_string())
        .unwrap_or_else(|| count.to_string());
    if count == 1 {
        format!("{spelled} {word}")
    } else {
        format!("{spelled} {word}s")
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

fn row_line(entry: &CanonicalEntry) -> String {
    let ext = match entry.extension {
        Some(c) => format!("'{c}'"),
        None => "  0".to_string(),
    };
    let dup = entry
        .duplicate_of
        .map(|first| format!("(=={first})"))
        .unwrap_or_default();
    format!(
        "  {{{:3}, {:4}, {:<12}, {}, {:>6}, {:<16}, {:<2}}}, // {:3}{}\n",
        entry.number,
        entry.ccp4_code,
        quote(&entry.hm_name),
        ext,
        quote(&entry.qualifier),
        quote(&entry.hall_symbol),
        entry.basis_index,
        entry.sequence_index,
        dup
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(seq: usize, hall: &str, ext: Option<char>, dup: Option<usize>) -> CanonicalEntry {
        CanonicalEntry {
            number: 48,
            ccp4_code: 48,
            hm_name: "P n n n".into(),
            extension: ext,
            qualifier: String::new(),
            hall_symbol: hall.into(),
            basis_index: 0,
            sequence_index: seq,
            duplicate_of: dup,
            section: Section::Reference,
        }
    }

    #[test]
    fn row_layout_matches_fixed_columns() {
        let line = row_line(&entry(7, "P 2 2 -1n", Some('1'), None));
        assert_eq!(
            line,
            "  { 48,   48, \"P n n n\"   , '1',     \"\", \"P 2 2 -1n\"     , 0 }, //   7\n"
        );
        let line = row_line(&entry(9, "R 3 2\"", None, Some(3)));
        assert!(line.contains("\"R 3 2\\\"\""));
        assert!(line.contains(",   0, "));
        assert!(line.ends_with("//   9(==3)\n"));
    }

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn newer_major_schema_is_rejected() {
        let table = Table {
            entries: vec![entry(0, "P 2 2 -1n", Some('1'), None)],
            basis_operators: vec!["x,y,z".into()],
        };
        let mut document = TableDocument::new(table, provenance(b"db", None, false));
        let text = render_json(&document).unwrap();
        assert_eq!(parse_json(&text).unwrap(), document);

        document.schema = SchemaVersion::new(2, 0, 0);
        let text = render_json(&document).unwrap();
        let err = parse_json(&text).unwrap_err();
        assert_eq!(err.info().code, "schema-version");
    }

    #[test]
    fn plural_spells_small_counts() {
        assert_eq!(plural(3, "duplicate"), "three duplicates");
        assert_eq!(plural(1, "duplicate"), "one duplicate");
        assert_eq!(plural(12, "duplicate"), "12 duplicates");
    }
}
