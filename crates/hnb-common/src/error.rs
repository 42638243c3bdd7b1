//! Error types for HNB

use thiserror::Error;

/// Result type alias for HNB operations
pub type Result<T> = std::result::Result<T, HnbError>;

/// Main error type for HNB
#[derive(Error, Debug)]
pub enum HnbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The remote API kept failing after every allowed attempt.
    #[error("fetch for item {id} failed after {attempts} attempts: {reason}")]
    RetriesExhausted {
        id: i64,
        attempts: u32,
        reason: String,
    },

    /// An insert hit an id that is already present. The resume cursor
    /// guarantees this should not happen, so it signals corrupted state
    /// rather than a condition to paper over.
    #[error("record {0} already exists in the store")]
    DuplicateRecord(i64),

    /// A worker task ended without producing an outcome (panic or
    /// runtime abort). Lost work must not be silent.
    #[error("worker task failed: {0}")]
    TaskFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HnbError {
    /// True when the error indicates a unique-key collision on insert.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, HnbError::DuplicateRecord(_))
    }
}
