//! # Cipherjournal Store
//!
//! Persistence for the Cipherjournal ledger: the entry-by-id table, the
//! per-owner index, and the next-identifier counter.
//!
//! Two backends implement the [`Store`] trait:
//!
//! - [`SqliteStore`] - primary backend, rusqlite with bundled SQLite
//! - [`MemoryStore`] - in-memory backend with identical semantics, for tests
//!
//! The store decides nothing about authorization. It enforces only the
//! structural invariants: identifier monotonicity, tombstone stability, and
//! owner-index consistency (an id appears in exactly one owner's index, and
//! only while the entry is alive).

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::Store;
