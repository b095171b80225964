//! Capability grant issuance and verification.
//!
//! Grants are issued in lockstep with entry mutations: after any create,
//! update, or transfer that touches a ciphertext field, that field must be
//! reachable by {the ledger itself, the entry's current owner}. Issuance is
//! never optional or best-effort; a fresh handle without its grants is
//! unreadable even by its rightful owner.

use cipherjournal_algebra::{CiphertextAlgebra, Grantee};
use cipherjournal_core::{Address, CipherHandle, Entry, EntryId};

use crate::error::{AccessError, Result};

/// Issue the standard grant pair {ledger, owner} on a single handle.
pub fn allow_handle<A: CiphertextAlgebra>(
    algebra: &A,
    handle: CipherHandle,
    owner: &Address,
) -> Result<()> {
    algebra.grant_to_self(handle)?;
    algebra.grant(handle, Grantee::Address(*owner))?;
    Ok(())
}

/// Issue the standard grant pair on all three ciphertext fields of an entry,
/// addressed to the entry's current owner.
pub fn allow_entry<A: CiphertextAlgebra>(algebra: &A, entry: &Entry) -> Result<()> {
    for handle in entry.cipher_fields() {
        allow_handle(algebra, handle, &entry.owner)?;
    }
    Ok(())
}

/// Re-issue owner grants on all three ciphertext fields for a new owner.
///
/// The previous owner's grants are left dormant: the algebra's grant
/// operation is append-only from the ledger's perspective, and a dormant
/// grant never confers more than the legitimate prior owner already had.
pub fn regrant_entry<A: CiphertextAlgebra>(
    algebra: &A,
    entry: &Entry,
    new_owner: &Address,
) -> Result<()> {
    for handle in entry.cipher_fields() {
        algebra.grant(handle, Grantee::Address(*new_owner))?;
    }
    Ok(())
}

/// Require that `caller` already holds a grant on `handle` before the
/// ledger hands the handle out through a field-scoped read.
pub fn ensure_can_view<A: CiphertextAlgebra>(
    algebra: &A,
    id: EntryId,
    handle: CipherHandle,
    caller: &Address,
) -> Result<()> {
    if algebra.is_allowed(handle, Grantee::Address(*caller))? {
        Ok(())
    } else {
        Err(AccessError::NoGrant {
            id,
            caller: *caller,
        })
    }
}
