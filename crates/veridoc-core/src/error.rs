//! Error types for the veridoc core.

use thiserror::Error;

/// Core errors for identifier parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid hex identifier: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid identifier length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}
