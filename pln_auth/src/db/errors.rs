//! Storage error types.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database driver error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Operation did not complete within the configured bound
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Unique constraint violated on insert
    #[error("Unique constraint violated")]
    Conflict,
}

impl StorageError {
    /// Whether this error is a unique-constraint conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict)
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StorageError::Conflict
            }
            other => StorageError::Database(other),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
