//! Error types for the kernel facade.

use thiserror::Error;
use veridoc_analysis::AnalysisError;
use veridoc_ledger::LedgerError;
use veridoc_store::StoreError;

/// Errors surfaced by kernel operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Analysis or classification error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Input rejected before reaching any component.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
