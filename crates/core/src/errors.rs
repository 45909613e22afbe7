//! Error types for promptstash
//!
//! One enum covers the whole core. Validation errors are rejected before
//! anything is written; integrity and database errors originate in the
//! storage layer and leave derived views stale until the next full load.

use thiserror::Error;

/// Result type alias for promptstash operations
pub type Result<T> = std::result::Result<T, StashError>;

/// Main error type for promptstash
#[derive(Debug, Error)]
pub enum StashError {
    /// Input rejected before any write (name conflict, bad snapshot shape,
    /// deleting a protected or non-empty folder)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored data violated an invariant (duplicate version id, chain left
    /// in an indeterminate state); reload before issuing further queries
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error (catch-all)
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for StashError {
    fn from(err: anyhow::Error) -> Self {
        StashError::Other(err.to_string())
    }
}

impl From<String> for StashError {
    fn from(err: String) -> Self {
        StashError::Other(err)
    }
}

impl From<&str> for StashError {
    fn from(err: &str) -> Self {
        StashError::Other(err.to_string())
    }
}

impl StashError {
    /// Get user-friendly error message for display
    pub fn user_message(&self) -> String {
        match self {
            StashError::Validation(msg) => msg.clone(),
            StashError::Integrity(msg) => {
                format!("Data integrity problem: {}. Reload and try again.", msg)
            },
            StashError::Database(err) => {
                format!("Storage error: {}", err)
            },
            _ => self.to_string(),
        }
    }

    /// Get error category for logging/telemetry
    pub fn category(&self) -> &'static str {
        match self {
            StashError::Validation(_) => "validation",
            StashError::Integrity(_) => "integrity",
            StashError::Database(_) => "database",
            StashError::Serde(_) => "serialization",
            StashError::Io(_) => "io",
            StashError::Other(_) => "other",
        }
    }

    /// True when retrying with corrected input can succeed; integrity and
    /// storage failures require a fresh load instead
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StashError::Validation(_))
    }
}
