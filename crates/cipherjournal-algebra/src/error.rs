//! Error types for the ciphertext algebra boundary.

use cipherjournal_core::CipherHandle;
use thiserror::Error;

/// Errors surfaced by a ciphertext algebra implementation.
#[derive(Debug, Error)]
pub enum AlgebraError {
    /// The validity proof attached to an external ciphertext did not check out.
    #[error("invalid ciphertext proof")]
    InvalidProof,

    /// The handle does not refer to any imported ciphertext.
    #[error("unknown ciphertext handle: {0}")]
    UnknownHandle(CipherHandle),

    /// An operation required a capability grant that is not held.
    #[error("missing capability grant on handle {0}")]
    NotAllowed(CipherHandle),

    /// The ciphertext envelope could not be decoded.
    #[error("malformed ciphertext envelope: {0}")]
    MalformedEnvelope(String),
}

/// Result type for algebra operations.
pub type Result<T> = std::result::Result<T, AlgebraError>;
