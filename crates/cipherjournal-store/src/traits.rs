//! Store trait: the abstract interface for entry persistence.
//!
//! This trait keeps the ledger storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use cipherjournal_core::{Address, Entry, EntryDraft, EntryId};

use crate::error::Result;

/// The Store trait: async interface for entry persistence.
///
/// # Design Notes
///
/// - **Inseparable allocation**: `insert_entry` allocates the next id and
///   writes the record plus the owner-index append in one atomic step.
///   There is no allocate-then-fail-silently path; an id that was consumed
///   has a record behind it.
/// - **Tombstones, not deletes**: `tombstone_entry` flips the alive flag
///   and removes the id from its owner's index. The row itself stays so
///   the identifier is never reassigned.
/// - **Swap-and-truncate**: owner-index removal moves the last id into the
///   vacated slot and shrinks the list. O(1), reorders the tail; callers
///   must not rely on stable positions across mutations.
/// - **Re-checked mutation**: every mutating operation re-checks existence
///   itself rather than trusting checks an earlier call performed, because
///   any two calls against the same entry may be adjacent in the global
///   serial order.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new entry: allocate the next identifier (starting at 1,
    /// strictly monotonic, never reused), write the record with
    /// `alive = true`, and append the id to the owner's index.
    ///
    /// Returns the stored entry with its assigned id.
    async fn insert_entry(&self, draft: EntryDraft) -> Result<Entry>;

    /// Get an entry by id, tombstoned or not. `None` if never allocated.
    async fn entry(&self, id: EntryId) -> Result<Option<Entry>>;

    /// Replace the content, ciphertext handles, and `updated_at` of a live
    /// entry. The owner and timestamps of record creation are untouched.
    ///
    /// Fails with `NotFound` if the entry is absent or tombstoned.
    async fn replace_entry(&self, entry: &Entry) -> Result<()>;

    /// Reassign ownership of a live entry: remove the id from the old
    /// owner's index, append it to `new_owner`'s, and update the record.
    ///
    /// Fails with `NotFound` if the entry is absent or tombstoned.
    async fn transfer_entry(&self, id: EntryId, new_owner: Address, at: i64) -> Result<()>;

    /// Tombstone an entry: set `alive = false` and remove the id from its
    /// owner's index.
    ///
    /// Returns `true` if the entry was live and is now tombstoned, `false`
    /// if it was absent or already tombstoned (the non-fatal skip path for
    /// batch operations).
    async fn tombstone_entry(&self, id: EntryId) -> Result<bool>;

    /// The ids currently owned by `owner`, in index order.
    async fn entries_for(&self, owner: &Address) -> Result<Vec<EntryId>>;

    /// Number of live entries across all owners.
    async fn live_count(&self) -> Result<u64>;
}
