//! Error types for the Cipherjournal core.

use thiserror::Error;

/// Errors from core type construction and parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("address must be exactly 20 bytes")]
    InvalidAddressLength,
}
