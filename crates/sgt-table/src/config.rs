//! Run configuration loaded from YAML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sgt_core::{ErrorInfo, SgError};

/// Output flavour of the generated table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Literal source text for embedding.
    #[default]
    Source,
    /// JSON document with provenance.
    Json,
}

/// Settings of one table generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Path to `syminfo.lib`.
    #[serde(default)]
    pub syminfo: Option<PathBuf>,
    /// Path to the reference enumeration TSV.
    #[serde(default)]
    pub reference: Option<PathBuf>,
    /// Run the equivalence verifier on every entry.
    #[serde(default = "default_true")]
    pub verify: bool,
    /// Append the hand-curated settings after the database entries.
    #[serde(default = "default_true")]
    pub curated: bool,
    /// Cross-check curated labels against derived crystal systems.
    #[serde(default = "default_true")]
    pub check_crystal_system: bool,
    /// Output flavour.
    #[serde(default)]
    pub format: OutputFormat,
    /// Supplementary names longer than this are compacted.
    #[serde(default = "default_max_hm_len")]
    pub max_hm_len: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_hm_len() -> usize {
    10
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            syminfo: None,
            reference: None,
            verify: default_true(),
            curated: default_true(),
            check_crystal_system: default_true(),
            format: OutputFormat::default(),
            max_hm_len: default_max_hm_len(),
        }
    }
}

impl TableConfig {
    /// Parses YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, SgError> {
        serde_yaml::from_str(text)
            .map_err(|err| SgError::Serde(ErrorInfo::new("config-yaml", err.to_string())))
    }

    /// Reads and parses a YAML file.
    pub fn from_yaml_path(path: &Path) -> Result<Self, SgError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            SgError::Io(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            SgError::Serde(info) => {
                SgError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }
}
