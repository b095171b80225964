//! Error types for the ledger facade.
//!
//! The taxonomy callers see: `NotFound`, `Unauthorized`,
//! `InvalidCiphertextProof`, `EmptyIndex`, `InvalidArgument`, plus transport
//! variants for the store and algebra boundaries. All are terminal for the
//! current call; retry policy belongs to the caller.

use cipherjournal_access::AccessError;
use cipherjournal_algebra::AlgebraError;
use cipherjournal_core::{Address, EntryId};
use cipherjournal_store::StoreError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Entry id never allocated, or tombstoned.
    #[error("entry not found: {0}")]
    NotFound(EntryId),

    /// Caller failed the owner, admin, or grant-holding check.
    #[error("unauthorized: {0}")]
    Unauthorized(AccessError),

    /// An external ciphertext's validity proof did not validate.
    #[error("invalid ciphertext proof")]
    InvalidCiphertextProof,

    /// Aggregate requested over an owner with no entries.
    #[error("owner {0} has no entries to aggregate")]
    EmptyIndex(Address),

    /// Malformed request argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(StoreError),

    /// Ciphertext algebra error other than a proof failure.
    #[error("algebra error: {0}")]
    Algebra(AlgebraError),
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => LedgerError::NotFound(id),
            other => LedgerError::Store(other),
        }
    }
}

impl From<AlgebraError> for LedgerError {
    fn from(e: AlgebraError) -> Self {
        match e {
            AlgebraError::InvalidProof => LedgerError::InvalidCiphertextProof,
            other => LedgerError::Algebra(other),
        }
    }
}

impl From<AccessError> for LedgerError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::NullRecipient => {
                LedgerError::InvalidArgument("transfer to the zero address".into())
            }
            AccessError::Algebra(inner) => inner.into(),
            denied => LedgerError::Unauthorized(denied),
        }
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
