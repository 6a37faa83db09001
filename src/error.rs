//! Error types for the inventory library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while working with the inventory.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A field failed parse-and-validate (empty name, negative quantity, bad date...).
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// No record with this name.
    #[error("item '{0}' not found")]
    NotFound(String),

    /// A record with this name already exists (DuplicatePolicy::Reject).
    #[error("item '{0}' already exists")]
    Duplicate(String),

    /// The data file (or PDF target) could not be opened, read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),

    /// A CSV row could not be turned into a record.
    #[error("malformed row at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// The CSV header lacks a required column.
    #[error("CSV header is missing column '{0}'")]
    MissingColumn(&'static str),

    /// Lower-level CSV reader/writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON rendering failure (the "view all" dump).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF document assembly failure.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl InventoryError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        InventoryError::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InventoryError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors the shell should re-prompt on instead of reporting as failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, InventoryError::Validation { .. })
    }
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
