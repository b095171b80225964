//! Error types for access control.

use cipherjournal_algebra::AlgebraError;
use cipherjournal_core::{Address, EntryId};
use thiserror::Error;

/// Errors from authorization checks and grant issuance.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Caller is not the entry's current owner.
    #[error("caller {caller} is not the owner of entry {id}")]
    NotOwner { id: EntryId, caller: Address },

    /// Caller is not the contract admin.
    #[error("caller {caller} is not the admin")]
    NotAdmin { caller: Address },

    /// Caller holds no capability grant on the requested ciphertext.
    #[error("caller {caller} holds no grant on the requested ciphertext of entry {id}")]
    NoGrant { id: EntryId, caller: Address },

    /// The zero address can never receive ownership.
    #[error("the zero address is not a valid transfer recipient")]
    NullRecipient,

    /// Grant issuance failed at the algebra boundary.
    #[error("algebra error: {0}")]
    Algebra(#[from] AlgebraError),
}

/// Result type for access operations.
pub type Result<T> = std::result::Result<T, AccessError>;
