//! Error types for the ClinVar/AncestryDNA cross-referencing library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while indexing annotations or matching genotypes.
#[derive(Error, Debug)]
pub enum ClinvarAncestryError {
    /// Failed to open or read an input file.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data line had fewer columns than its format requires.
    #[error("Malformed {kind} row (expected {expected} columns, got {found}): {line}")]
    MalformedRow {
        kind: &'static str,
        expected: usize,
        found: usize,
        line: String,
    },

    /// The gene-name filter is not a valid regular expression.
    #[error("Invalid gene pattern: {0}")]
    InvalidGenePattern(#[from] regex::Error),

    /// Failed to serialize the accumulated records.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read from or write to an already opened stream.
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),
}

impl ClinvarAncestryError {
    /// Attach a path to an I/O error raised while reading input.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClinvarAncestryError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for cross-referencing operations.
pub type Result<T> = std::result::Result<T, ClinvarAncestryError>;
