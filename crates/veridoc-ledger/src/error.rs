//! Error types for the ledger.

use thiserror::Error;

/// Ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid pagination: page {page}, page size {page_size} (both must be >= 1)")]
    InvalidPagination { page: u64, page_size: u64 },
}

/// Result alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
