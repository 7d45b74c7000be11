//! Error types for the analysis module.

use thiserror::Error;

/// Errors that can occur during analysis or classification.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Neither the bytes nor the caller's hint identify a supported format.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The bytes claim a supported format but cannot be parsed as one.
    #[error("malformed {format} document: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },

    /// The named model failed to load. Fatal for that name until the
    /// failure cache expires.
    #[error("model {model} failed to load: {reason}")]
    ModelLoad { model: String, reason: String },
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
