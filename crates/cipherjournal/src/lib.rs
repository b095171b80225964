//! # Cipherjournal
//!
//! The unified API for the Cipherjournal system - a confidential journal
//! ledger over encrypted records and capability-gated access.
//!
//! ## Overview
//!
//! The Cipherjournal ledger provides a portable library for:
//!
//! - **Entries**: Journal records pairing plaintext content with three
//!   encrypted well-being fields (stress, achievement, mindset)
//! - **Access control**: Owner-gated mutation, an admin-only batch
//!   tombstone, and capability grants issued on every ciphertext write
//! - **Aggregation**: Homomorphic folds over encrypted fields without
//!   ever decrypting them
//! - **Events**: One ordered notification per successful state transition
//!
//! ## Key Concepts
//!
//! - **Entry id**: Allocated from 1, strictly monotonic, never reused.
//! - **Tombstone**: A deleted entry's row survives; the id stays burned.
//! - **Cipher handle**: Opaque 32-byte reference to an encrypted value;
//!   only the ciphertext algebra can interpret it.
//! - **Grant**: A capability on a handle. Every mutation that produces a
//!   fresh handle re-issues grants to {ledger, owner}.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cipherjournal::{Ledger, LedgerConfig};
//! use cipherjournal::algebra::ClearAlgebra;
//! use cipherjournal::core::Address;
//! use cipherjournal::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("journal.db").unwrap();
//!     let algebra = ClearAlgebra::new();
//!     let admin = Address::from_bytes([0xad; 20]);
//!
//!     let ledger = Ledger::new(store, algebra, (), LedgerConfig { admin });
//!
//!     let alice = Address::from_bytes([0xa1; 20]);
//!     let id = ledger
//!         .create(
//!             alice,
//!             "slept well, shipped the release",
//!             &ClearAlgebra::seal(30),
//!             &ClearAlgebra::seal(80),
//!             &ClearAlgebra::seal(1),
//!         )
//!         .await
//!         .unwrap();
//!
//!     let entry = ledger.entry(id).await.unwrap();
//!     assert_eq!(entry.owner, alice);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `cipherjournal::core` - Core primitives (Entry, EntryId, Address, ...)
//! - `cipherjournal::algebra` - The ciphertext algebra boundary
//! - `cipherjournal::store` - Storage abstraction, SQLite and memory backends
//! - `cipherjournal::access` - Authorization guards and grant issuance

mod aggregate;

pub mod error;
pub mod event;
pub mod ledger;

// Re-export component crates
pub use cipherjournal_access as access;
pub use cipherjournal_algebra as algebra;
pub use cipherjournal_core as core;
pub use cipherjournal_store as store;

// Re-export main types for convenience
pub use error::{LedgerError, Result};
pub use event::{LedgerEvent, MemoryNotifier, Notifier};
pub use ledger::{Ledger, LedgerConfig};

// Re-export commonly used component types
pub use cipherjournal_algebra::{
    CiphertextAlgebra, ClearAlgebra, ExternalCiphertext, Grantee, ImportProof,
};
pub use cipherjournal_core::{Address, CipherHandle, Entry, EntryDraft, EntryId};
pub use cipherjournal_store::{MemoryStore, SqliteStore, Store};
