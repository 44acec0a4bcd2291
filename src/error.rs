//! Error types for CloudStore.

use thiserror::Error;

/// Common error type for CloudStore.
#[derive(Error, Debug)]
pub enum CloudStoreError {
    /// Storage engine failure (connection lost, disk full, engine missing).
    ///
    /// This is a generic storage-level error that wraps errors from the
    /// underlying database engine. Errors from sqlx are converted at the
    /// repository boundary.
    #[error("storage unavailable: {0}")]
    Storage(String),

    /// Unique-constraint violation when creating a record.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Resource not found.
    ///
    /// Lookup misses are represented as `Ok(None)`; this variant is only
    /// used where an absence makes the operation itself impossible.
    #[error("{0} not found")]
    NotFound(String),

    /// Login failure. Deliberately carries no detail about whether the
    /// email or the password was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// I/O error (session pointer file, log file, config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for CloudStoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CloudStoreError::DuplicateKey(db.message().to_string())
            }
            _ => CloudStoreError::Storage(e.to_string()),
        }
    }
}

/// Result type alias for CloudStore operations.
pub type Result<T> = std::result::Result<T, CloudStoreError>;
