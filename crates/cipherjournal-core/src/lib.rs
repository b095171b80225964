//! # Cipherjournal Core
//!
//! Pure types for the Cipherjournal ledger: entry records, identifiers,
//! and caller identities.
//!
//! This crate contains no I/O, no storage, and no ciphertext operations.
//! Ciphertext handles are carried here as opaque values; everything that
//! can actually be done with one lives in `cipherjournal-algebra`.
//!
//! ## Key Types
//!
//! - [`EntryId`] - Monotonic, never-reused identifier of a journal entry
//! - [`Address`] - Caller/owner identity assigned by the execution environment
//! - [`Entry`] - One confidential journal record (content + three ciphertext fields)

pub mod entry;
pub mod error;
pub mod types;

pub use entry::{Entry, EntryDraft};
pub use error::CoreError;
pub use types::{Address, CipherHandle, EntryId};
