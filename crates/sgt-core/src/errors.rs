//! Structured error types shared across SGT crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SgError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (record names, line numbers, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the space-group table compiler.
///
/// Every failure is fatal for a compiler run; the variants only classify
/// what went wrong so that callers and tests can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SgError {
    /// Malformed database line, unbalanced block or missing field.
    #[error("format error: {0}")]
    Format(ErrorInfo),
    /// Compact notation (Hall symbol or triplet) that cannot be expanded.
    #[error("invalid notation: {0}")]
    InvalidNotation(ErrorInfo),
    /// Declared centering vectors differ from the Hall expansion.
    #[error("centering mismatch: {0}")]
    CenteringMismatch(ErrorInfo),
    /// Declared operations differ from the Hall expansion modulo centering.
    #[error("operation set mismatch: {0}")]
    OperationSetMismatch(ErrorInfo),
    /// Declared change-of-basis operator differs from the computed one.
    #[error("basis mismatch: {0}")]
    BasisMismatch(ErrorInfo),
    /// Reference enumeration names a setting absent from the database.
    #[error("missing record: {0}")]
    MissingRecord(ErrorInfo),
    /// Record number differs from the reference item it was matched with.
    #[error("number mismatch: {0}")]
    NumberMismatch(ErrorInfo),
    /// Hand-curated group label disagrees with the derived crystal system.
    #[error("crystal system mismatch: {0}")]
    CrystalSystemMismatch(ErrorInfo),
    /// Filesystem access errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization, configuration and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl SgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SgError::Format(info)
            | SgError::InvalidNotation(info)
            | SgError::CenteringMismatch(info)
            | SgError::OperationSetMismatch(info)
            | SgError::BasisMismatch(info)
            | SgError::MissingRecord(info)
            | SgError::NumberMismatch(info)
            | SgError::CrystalSystemMismatch(info)
            | SgError::Io(info)
            | SgError::Serde(info) => info,
        }
    }

    /// Convenience constructor for [`SgError::InvalidNotation`].
    pub fn notation(code: &str, message: impl Into<String>, notation: &str) -> Self {
        SgError::InvalidNotation(ErrorInfo::new(code, message).with_context("notation", notation))
    }
}
