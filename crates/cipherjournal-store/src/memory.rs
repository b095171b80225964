//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use cipherjournal_core::{Address, Entry, EntryDraft, EntryId};

use crate::error::{Result, StoreError};
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Entries indexed by id, tombstoned rows included.
    entries: HashMap<EntryId, Entry>,

    /// Per-owner insertion-ordered index of live entry ids.
    owners: HashMap<Address, Vec<EntryId>>,

    /// Next identifier to allocate.
    next_id: EntryId,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                entries: HashMap::new(),
                owners: HashMap::new(),
                next_id: EntryId::FIRST,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStoreInner {
    /// Swap-with-last-then-truncate removal from an owner's index.
    fn remove_from_index(&mut self, owner: &Address, id: EntryId) -> Result<()> {
        let index = self
            .owners
            .get_mut(owner)
            .ok_or_else(|| StoreError::Corrupt(format!("no index for owner {owner}")))?;

        let pos = index
            .iter()
            .position(|&e| e == id)
            .ok_or_else(|| StoreError::Corrupt(format!("entry {id} missing from owner index")))?;

        // Vec::swap_remove is exactly the documented semantics.
        index.swap_remove(pos);
        if index.is_empty() {
            self.owners.remove(owner);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_entry(&self, draft: EntryDraft) -> Result<Entry> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        let id = inner.next_id;
        inner.next_id = id.next();

        let entry = draft.into_entry(id);
        inner.owners.entry(entry.owner).or_default().push(id);
        inner.entries.insert(id, entry.clone());

        Ok(entry)
    }

    async fn entry(&self, id: EntryId) -> Result<Option<Entry>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.entries.get(&id).cloned())
    }

    async fn replace_entry(&self, entry: &Entry) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        let slot = inner
            .entries
            .get_mut(&entry.id)
            .filter(|e| e.alive)
            .ok_or(StoreError::NotFound(entry.id))?;

        slot.content = entry.content.clone();
        slot.stress = entry.stress;
        slot.achievement = entry.achievement;
        slot.mindset = entry.mindset;
        slot.updated_at = entry.updated_at;
        Ok(())
    }

    async fn transfer_entry(&self, id: EntryId, new_owner: Address, at: i64) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        let old_owner = match inner.entries.get(&id) {
            Some(e) if e.alive => e.owner,
            _ => return Err(StoreError::NotFound(id)),
        };

        inner.remove_from_index(&old_owner, id)?;
        inner.owners.entry(new_owner).or_default().push(id);

        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        entry.owner = new_owner;
        entry.updated_at = at;
        Ok(())
    }

    async fn tombstone_entry(&self, id: EntryId) -> Result<bool> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        let owner = match inner.entries.get(&id) {
            Some(e) if e.alive => e.owner,
            _ => return Ok(false),
        };

        inner.remove_from_index(&owner, id)?;
        if let Some(entry) = inner.entries.get_mut(&id) {
            entry.alive = false;
        }
        Ok(true)
    }

    async fn entries_for(&self, owner: &Address) -> Result<Vec<EntryId>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.owners.get(owner).cloned().unwrap_or_default())
    }

    async fn live_count(&self) -> Result<u64> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.entries.values().filter(|e| e.alive).count() as u64)
    }
}
