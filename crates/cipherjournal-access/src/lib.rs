//! # Cipherjournal Access
//!
//! The access controller for the Cipherjournal ledger: stateless
//! authorization guards plus capability-grant issuance routed through the
//! ciphertext algebra.
//!
//! Two roles exist:
//!
//! - **Entry owner** - the only identity allowed to mutate an entry
//!   (update / delete / transfer).
//! - **Contract admin** - a single identity fixed at ledger construction,
//!   allowed to run the administrative batch tombstone.
//!
//! Grant issuance lives here rather than in the store so that "mutation
//! implies re-grant" is enforced by one code path.

pub mod error;
pub mod grants;
pub mod policy;

pub use error::{AccessError, Result};
pub use grants::{allow_entry, allow_handle, ensure_can_view, regrant_entry};
pub use policy::{ensure_admin, ensure_owner, ensure_valid_recipient};
