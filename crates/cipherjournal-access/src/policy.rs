//! Authorization policy checks.
//!
//! Stateless guards consulted before every sensitive operation. Each guard
//! fails loudly; there is no silent no-op path. The owner check gates the
//! owner path directly: `caller == entry.owner` passes, everyone else is
//! rejected. The inverted form is the defect class this module exists to
//! make impossible to reintroduce quietly.

use cipherjournal_core::{Address, Entry};

use crate::error::{AccessError, Result};

/// Require that `caller` is the entry's current owner.
pub fn ensure_owner(entry: &Entry, caller: &Address) -> Result<()> {
    if entry.is_owned_by(caller) {
        Ok(())
    } else {
        Err(AccessError::NotOwner {
            id: entry.id,
            caller: *caller,
        })
    }
}

/// Require that `caller` is the contract admin.
///
/// The admin identity is fixed at construction of the ledger and immutable
/// thereafter; this guard only compares.
pub fn ensure_admin(admin: &Address, caller: &Address) -> Result<()> {
    if caller == admin {
        Ok(())
    } else {
        Err(AccessError::NotAdmin { caller: *caller })
    }
}

/// Require that `recipient` is a valid ownership recipient.
pub fn ensure_valid_recipient(recipient: &Address) -> Result<()> {
    if recipient.is_zero() {
        Err(AccessError::NullRecipient)
    } else {
        Ok(())
    }
}
