//! Error types for catalog loading and dataset maintenance.
//!
//! Lookups never fail: an unknown symptom, effect, name or month is an
//! empty result. Only reading or writing a document can produce a `CatalogError`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or writing a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not well-formed, lacks the record collection, or a
    /// record lacks a required field. Loading is all-or-nothing.
    #[error("malformed catalog data{}: {reason}", .record.map(|i| format!(" (record {})", i)).unwrap_or_default())]
    Malformed {
        /// Zero-based position of the offending record, when known.
        record: Option<usize>,
        reason: String,
    },

    /// Two records share a common name (case-insensitive). Strict loading only.
    #[error("duplicate common name '{name}' (records {first} and {second})")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },

    /// Writing a document back to JSON failed.
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Document-level malformation (no specific record).
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed { record: None, reason: reason.into() }
    }

    /// Malformation attributed to the record at `index`.
    pub fn malformed_record(index: usize, reason: impl Into<String>) -> Self {
        Self::Malformed { record: Some(index), reason: reason.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
