//! Error types for the store module.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Object not found in any backend. A normal negative result for
    /// lookups, fatal for a get that exhausted failover.
    #[error("object not found: {0}")]
    NotFound(String),

    /// A backend refused or failed the call. Triggers failover where one
    /// exists; fatal once all backends are exhausted.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A backend call exceeded its time bound.
    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(String),

    /// Stored data failed an integrity check.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
