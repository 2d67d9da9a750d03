//! Error types for the normalizer.
//!
//! Per-record problems (`MalformedValue`) are reported and skipped by the
//! table decoder; everything else aborts the current operation.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the normalizer library.
#[derive(Debug, Error)]
pub enum NormalizerError {
    /// Value or uncertainty text did not parse as a number.
    #[error("Malformed value '{text}' for '{quantity}' ({year})")]
    MalformedValue {
        year: i32,
        quantity: String,
        text: String,
    },

    /// No known table layout for this year.
    #[error("Unsupported publication year: {0}. No table layout is known before 1998")]
    UnsupportedYear(i32),

    /// The allascii table for a year is missing.
    #[error("No constants table for {year} at {}", .path.display())]
    MissingTable { year: i32, path: PathBuf },

    /// Definitions file is structurally invalid.
    #[error("Invalid definitions: {0}")]
    InvalidDefinitions(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// CSV serialization error.
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

impl NormalizerError {
    /// Build a `MalformedValue` error for a record.
    pub fn malformed(year: i32, quantity: impl Into<String>, text: impl Into<String>) -> Self {
        Self::MalformedValue {
            year,
            quantity: quantity.into(),
            text: text.into(),
        }
    }
}

/// Result type alias for normalizer operations.
pub type Result<T> = std::result::Result<T, NormalizerError>;
