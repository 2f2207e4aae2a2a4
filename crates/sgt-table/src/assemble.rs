//! The table assembler: drives the reference enumeration over the parsed
//! records and collects the output rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sgt_core::{
    BasisAlgebra, CrystalSystem, ErrorInfo, OperationAlgebra, ReferenceEnumeration,
    ReferenceGroup, SgError,
};
use sgt_syminfo::SymmetryRecord;
use tracing::{debug, info, warn};

use crate::basis::{BasisCanonicalizer, Canonical};
use crate::config::TableConfig;
use crate::curated::{shorter_hall, CuratedGroup, CURATED};
use crate::dups::DuplicateTracker;
use crate::verify::EquivalenceVerifier;

/// Part of the table a row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "lowercase")]
pub enum Section {
    /// Walk of the reference enumeration.
    Reference,
    /// Database records without a reference slot.
    Supplementary,
    /// Hand-curated settings under a free-text label.
    Curated(String),
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    /// Space-group number.
    pub number: u32,
    /// CCP4 number, `0` when none.
    pub ccp4_code: u32,
    /// Display name without extension.
    pub hm_name: String,
    /// Setting extension.
    pub extension: Option<char>,
    /// Free-text qualifier.
    pub qualifier: String,
    /// Hall symbol as emitted.
    pub hall_symbol: String,
    /// Index into the basis-operator table.
    pub basis_index: usize,
    /// Position in the table.
    pub sequence_index: usize,
    /// Earlier row with the same Hall symbol.
    pub duplicate_of: Option<usize>,
    /// Section the row was emitted in.
    pub section: Section,
}

/// Assembled output: rows plus the parallel basis-operator list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows ordered by `sequence_index`.
    pub entries: Vec<CanonicalEntry>,
    /// Operators ordered by `basis_index`.
    pub basis_operators: Vec<String>,
}

/// Knobs of [`TableAssembler`] taken from [`TableConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Cross-check curated labels against derived crystal systems.
    pub check_crystal_system: bool,
    /// Supplementary names longer than this are compacted.
    pub max_hm_len: usize,
    /// Hand-curated settings appended after the database entries.
    pub curated: &'static [CuratedGroup],
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self::from(&TableConfig::default())
    }
}

impl From<&TableConfig> for AssemblyOptions {
    fn from(config: &TableConfig) -> Self {
        Self {
            check_crystal_system: config.check_crystal_system,
            max_hm_len: config.max_hm_len,
            curated: if config.curated { CURATED } else { &[] },
        }
    }
}

/// Owns all mutable state of one run; dropping it discards the state.
pub struct TableAssembler<'a> {
    enumeration: &'a dyn ReferenceEnumeration,
    basis: BasisCanonicalizer<'a>,
    verifier: Option<EquivalenceVerifier<'a>>,
    dups: DuplicateTracker,
    entries: Vec<CanonicalEntry>,
    options: AssemblyOptions,
}

impl<'a> TableAssembler<'a> {
    /// Wires the collaborators. Verification is skipped when `verifier` is
    /// `None`.
    pub fn new(
        enumeration: &'a dyn ReferenceEnumeration,
        basis: &'a dyn BasisAlgebra,
        verifier: Option<&'a dyn OperationAlgebra>,
        options: AssemblyOptions,
    ) -> Self {
        Self {
            enumeration,
            basis: BasisCanonicalizer::new(basis),
            verifier: verifier.map(EquivalenceVerifier::new),
            dups: DuplicateTracker::default(),
            entries: Vec::new(),
            options,
        }
    }

    /// Builds the whole table. Any failure aborts the run.
    ///
    /// With a verifier, every record is checked before indexing, including
    /// those that lose a name collision.
    pub fn assemble(mut self, records: &[SymmetryRecord]) -> Result<Table, SgError> {
        match &self.verifier {
            Some(verifier) => {
                for record in records {
                    verifier.verify(record, &record.hall_symbol)?;
                }
                info!(records = records.len(), "records verified");
            }
            None => warn!("no operation algebra supplied; equivalence checks are skipped"),
        }
        let mut pending = index_records(records);

        let groups = self.enumeration.reference_groups()?;
        info!(settings = groups.len(), records = records.len(), "reference walk");
        for group in &groups {
            let name = group.long_name();
            let idx = pending.remove(name.as_str()).ok_or_else(|| {
                SgError::MissingRecord(
                    ErrorInfo::new("record-missing", "reference setting absent from the database")
                        .with_context("name", name.clone())
                        .with_context("hall", group.hall.trim()),
                )
            })?;
            self.reference_entry(group, &records[idx])?;
        }

        info!(remaining = pending.len(), "supplementary records");
        for (idx, record) in records.iter().enumerate() {
            let still_pending = if record.extended_hm_name.is_empty() {
                true
            } else {
                pending.get(record.extended_hm_name.as_str()) == Some(&idx)
            };
            if still_pending {
                self.supplementary_entry(record)?;
            }
        }

        info!(groups = self.options.curated.len(), "curated settings");
        for group in self.options.curated {
            for (hm, hall) in group.entries {
                self.curated_entry(group, hm, hall)?;
            }
        }

        Ok(Table {
            entries: self.entries,
            basis_operators: self.basis.into_table().into_entries(),
        })
    }

    fn reference_entry(
        &mut self,
        group: &ReferenceGroup,
        record: &SymmetryRecord,
    ) -> Result<(), SgError> {
        if record.number != group.number {
            return Err(SgError::NumberMismatch(
                ErrorInfo::new("number-differs", "record number differs from the reference setting")
                    .with_context("name", group.long_name())
                    .with_context("record_number", record.number.to_string())
                    .with_context("reference_number", group.number.to_string()),
            ));
        }
        let hall = group.hall.trim();
        if let Some(verifier) = &self.verifier {
            if !verifier.same_group(hall, &record.hall_symbol)? {
                return Err(SgError::OperationSetMismatch(
                    ErrorInfo::new("hall-differs", "reference and database Hall symbols differ")
                        .with_context("name", group.long_name())
                        .with_context("reference_hall", hall)
                        .with_context("record_hall", record.hall_symbol.clone()),
                ));
            }
        }
        let canonical = self.basis.canonicalize(
            hall,
            Some(group.number),
            Some(&record.basis_operator_text),
        )?;
        self.push(Row {
            number: group.number,
            ccp4_code: record.ccp4_code,
            hm_name: group.hm.clone(),
            extension: group.ext,
            qualifier: group.qualifier.clone(),
            hall_symbol: hall.to_string(),
            canonical,
            section: Section::Reference,
        });
        Ok(())
    }

    fn supplementary_entry(&mut self, record: &SymmetryRecord) -> Result<(), SgError> {
        let display = if record.extended_hm_name.is_empty() {
            let alias = record.legacy_aliases.first().ok_or_else(|| {
                SgError::Format(
                    ErrorInfo::new("record-unnamed", "record has neither an xHM nor an old name")
                        .with_context("line", record.line.to_string()),
                )
            })?;
            compact_name(alias, self.options.max_hm_len)
        } else {
            record.extended_hm_name.clone()
        };
        let (hm, extension) = SymmetryRecord::split_extension(&display);

        let hall = match shorter_hall(&record.hall_symbol) {
            Some(short) => {
                if let Some(verifier) = &self.verifier {
                    if !verifier.same_group(short, &record.hall_symbol)? {
                        return Err(SgError::OperationSetMismatch(
                            ErrorInfo::new("alias-differs", "shorter Hall symbol is not equivalent")
                                .with_context("record_hall", record.hall_symbol.clone())
                                .with_context("alias", short),
                        ));
                    }
                }
                short.to_string()
            }
            None => record.hall_symbol.trim().to_string(),
        };
        let canonical = self.basis.canonicalize(&hall, Some(record.number), None)?;
        self.push(Row {
            number: record.number,
            ccp4_code: record.ccp4_code,
            hm_name: hm.to_string(),
            extension,
            qualifier: String::new(),
            hall_symbol: hall,
            canonical,
            section: Section::Supplementary,
        });
        Ok(())
    }

    fn curated_entry(&mut self, group: &CuratedGroup, hm: &str, hall: &str) -> Result<(), SgError> {
        let canonical = self.basis.canonicalize(hall, None, None)?;
        if self.options.check_crystal_system {
            let derived = CrystalSystem::from_number(canonical.number);
            if !derived.is_some_and(|system| group.accepts(system)) {
                return Err(SgError::CrystalSystemMismatch(
                    ErrorInfo::new("system-differs", "derived crystal system contradicts the label")
                        .with_context("label", group.label)
                        .with_context("hall", hall)
                        .with_context("number", canonical.number.to_string()),
                ));
            }
        }
        self.push(Row {
            number: canonical.number,
            ccp4_code: 0,
            hm_name: hm.to_string(),
            extension: None,
            qualifier: String::new(),
            hall_symbol: hall.to_string(),
            canonical,
            section: Section::Curated(group.label.to_string()),
        });
        Ok(())
    }

    fn push(&mut self, row: Row) {
        let sequence_index = self.entries.len();
        let duplicate_of = self.dups.check(&row.hall_symbol, sequence_index);
        debug!(
            seq = sequence_index,
            number = row.number,
            hall = %row.hall_symbol,
            basis = %row.canonical.text,
            "row"
        );
        self.entries.push(CanonicalEntry {
            number: row.number,
            ccp4_code: row.ccp4_code,
            hm_name: row.hm_name,
            extension: row.extension,
            qualifier: row.qualifier,
            hall_symbol: row.hall_symbol,
            basis_index: row.canonical.index,
            sequence_index,
            duplicate_of,
            section: row.section,
        });
    }
}

struct Row {
    number: u32,
    ccp4_code: u32,
    hm_name: String,
    extension: Option<char>,
    qualifier: String,
    hall_symbol: String,
    canonical: Canonical,
    section: Section,
}

/// Maps each extended name to the record kept for it.
///
/// On collision a record with a non-zero ccp4 code replaces the earlier one,
/// so among several coded records the last one wins.
pub fn index_records(records: &[SymmetryRecord]) -> HashMap<&str, usize> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        let name = record.extended_hm_name.as_str();
        if !index.contains_key(name) || record.ccp4_code != 0 {
            index.insert(name, idx);
        }
    }
    index
}

/// Drops the spaces after the lattice symbol of names longer than `max_len`.
pub fn compact_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        return name.to_string();
    }
    match name.split_once(' ') {
        Some((lattice, rest)) => {
            let rest: String = rest.split_whitespace().collect();
            format!("{lattice} {rest}")
        }
        None => name.to_string(),
    }
}
