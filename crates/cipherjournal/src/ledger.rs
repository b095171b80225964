//! The Ledger: unified API for the confidential journal.
//!
//! The Ledger brings together storage, access control, the ciphertext
//! algebra, and event notification into a cohesive interface. Every
//! operation follows check-then-act ordering: all authorization and
//! existence checks (and all ciphertext imports, which can fail) complete
//! before the first write, so a failed call leaves state exactly as it
//! found it.

use std::sync::Arc;

use tracing::{debug, info};

use cipherjournal_access as access;
use cipherjournal_algebra::{CiphertextAlgebra, ExternalCiphertext};
use cipherjournal_core::{Address, CipherHandle, Entry, EntryDraft, EntryId};
use cipherjournal_store::Store;

use crate::aggregate;
use crate::error::{LedgerError, Result};
use crate::event::{LedgerEvent, Notifier};

/// Configuration for the Ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// The contract admin: the single identity allowed to run the
    /// administrative batch tombstone. Fixed at construction, immutable
    /// thereafter.
    pub admin: Address,
}

/// The main Ledger struct.
///
/// Provides a unified API for:
/// - Creating, reading, updating, and deleting journal entries
/// - Transferring entry ownership
/// - Administrative batch tombstoning
/// - Homomorphic aggregation over encrypted fields
///
/// The caller identity is an explicit argument to every sensitive
/// operation; the surrounding execution environment is responsible for
/// authenticating it.
pub struct Ledger<S: Store, A: CiphertextAlgebra, N: Notifier> {
    /// The storage backend.
    store: Arc<S>,
    /// The ciphertext algebra boundary.
    algebra: A,
    /// Sink for successful state transitions.
    notifier: N,
    /// Configuration.
    config: LedgerConfig,
}

impl<S: Store, A: CiphertextAlgebra, N: Notifier> Ledger<S, A, N> {
    /// Create a new ledger instance.
    pub fn new(store: S, algebra: A, notifier: N, config: LedgerConfig) -> Self {
        Self {
            store: Arc::new(store),
            algebra,
            notifier,
            config,
        }
    }

    /// The admin identity this ledger was constructed with.
    pub fn admin(&self) -> Address {
        self.config.admin
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        self.store.as_ref()
    }

    /// Get the algebra reference.
    pub fn algebra(&self) -> &A {
        &self.algebra
    }

    /// Get the notifier reference.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entry Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new journal entry owned by `caller`.
    ///
    /// All three external ciphertexts are imported before anything is
    /// written; a failed proof therefore consumes no identifier and leaves
    /// no partial record. Identifier allocation and the storage write are
    /// one atomic store operation.
    pub async fn create(
        &self,
        caller: Address,
        content: impl Into<String>,
        stress: &ExternalCiphertext,
        achievement: &ExternalCiphertext,
        mindset: &ExternalCiphertext,
    ) -> Result<EntryId> {
        if caller.is_zero() {
            return Err(LedgerError::InvalidArgument(
                "the zero address cannot own entries".into(),
            ));
        }

        // Imports first: the only fallible inputs.
        let stress = self.algebra.import_external(stress)?;
        let achievement = self.algebra.import_external(achievement)?;
        let mindset = self.algebra.import_external(mindset)?;

        let draft = EntryDraft {
            owner: caller,
            content: content.into(),
            stress,
            achievement,
            mindset,
            created_at: now_millis(),
        };

        let entry = self.store.insert_entry(draft).await?;
        access::allow_entry(&self.algebra, &entry)?;

        info!(id = %entry.id, owner = %caller, "entry created");
        self.notifier.emit(LedgerEvent::EntryAdded {
            id: entry.id,
            owner: caller,
            at: entry.created_at,
        });

        Ok(entry.id)
    }

    /// Replace the content and all three ciphertext fields of an entry.
    ///
    /// Owner only. The old handles are abandoned, not reused; grants are
    /// re-issued for the fresh handles so the new values stay reachable by
    /// {ledger, owner}.
    pub async fn update(
        &self,
        caller: Address,
        id: EntryId,
        content: impl Into<String>,
        stress: &ExternalCiphertext,
        achievement: &ExternalCiphertext,
        mindset: &ExternalCiphertext,
    ) -> Result<()> {
        let mut entry = self.live_entry(id).await?;
        access::ensure_owner(&entry, &caller)?;

        entry.content = content.into();
        entry.stress = self.algebra.import_external(stress)?;
        entry.achievement = self.algebra.import_external(achievement)?;
        entry.mindset = self.algebra.import_external(mindset)?;
        entry.updated_at = now_millis();

        self.store.replace_entry(&entry).await?;
        access::allow_entry(&self.algebra, &entry)?;

        info!(id = %id, owner = %caller, "entry updated");
        self.notifier.emit(LedgerEvent::EntryUpdated {
            id,
            owner: caller,
            at: entry.updated_at,
        });

        Ok(())
    }

    /// Tombstone an entry. Owner only.
    ///
    /// The identifier is never reassigned and the row survives as a
    /// tombstone; re-deleting fails with `NotFound`. Ciphertext grants are
    /// left intact.
    pub async fn delete(&self, caller: Address, id: EntryId) -> Result<()> {
        let entry = self.live_entry(id).await?;
        access::ensure_owner(&entry, &caller)?;

        // Re-checked inside the store; an adjacent call may have won.
        if !self.store.tombstone_entry(id).await? {
            return Err(LedgerError::NotFound(id));
        }

        info!(id = %id, actor = %caller, "entry tombstoned");
        self.notifier.emit(LedgerEvent::EntryTombstoned {
            id,
            actor: caller,
            at: now_millis(),
        });

        Ok(())
    }

    /// Reassign ownership of an entry. Owner only; the zero address is not
    /// a valid recipient.
    ///
    /// Grants for all three ciphertext fields are re-issued to the new
    /// owner. The previous owner's grants are left dormant rather than
    /// revoked; the algebra boundary defines no revoke operation and a
    /// dormant grant confers nothing the prior owner did not already have.
    pub async fn transfer(&self, caller: Address, id: EntryId, new_owner: Address) -> Result<()> {
        access::ensure_valid_recipient(&new_owner)?;

        let entry = self.live_entry(id).await?;
        access::ensure_owner(&entry, &caller)?;

        let at = now_millis();
        self.store.transfer_entry(id, new_owner, at).await?;
        access::regrant_entry(&self.algebra, &entry, &new_owner)?;

        info!(id = %id, from = %caller, to = %new_owner, "ownership transferred");
        self.notifier.emit(LedgerEvent::OwnershipTransferred {
            id,
            from: caller,
            to: new_owner,
            at,
        });

        Ok(())
    }

    /// Tombstone every existing entry in `ids`. Admin only.
    ///
    /// Ids that are absent or already tombstoned are silently skipped;
    /// the batch never partially fails. Returns the number of entries
    /// actually tombstoned.
    pub async fn batch_tombstone(&self, caller: Address, ids: &[EntryId]) -> Result<u64> {
        access::ensure_admin(&self.config.admin, &caller)?;

        let mut tombstoned = 0u64;
        for &id in ids {
            if self.store.tombstone_entry(id).await? {
                tombstoned += 1;
                self.notifier.emit(LedgerEvent::EntryTombstoned {
                    id,
                    actor: caller,
                    at: now_millis(),
                });
            } else {
                debug!(id = %id, "batch tombstone skipped absent entry");
            }
        }

        info!(requested = ids.len(), tombstoned, "batch tombstone complete");
        Ok(tombstoned)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the full record of a live entry.
    ///
    /// The ciphertext handles in the record are opaque: holding one
    /// without a capability grant permits nothing. The grant check applies
    /// to the field-scoped accessors, which are the read paths that
    /// meaningfully expose a handle for decryption.
    pub async fn entry(&self, id: EntryId) -> Result<Entry> {
        self.live_entry(id).await
    }

    /// Get the plaintext content of a live entry.
    pub async fn content_of(&self, id: EntryId) -> Result<String> {
        Ok(self.live_entry(id).await?.content)
    }

    /// Get the stress handle of a live entry. Requires the caller to
    /// already hold a grant on it.
    pub async fn stress_of(&self, caller: Address, id: EntryId) -> Result<CipherHandle> {
        let entry = self.live_entry(id).await?;
        access::ensure_can_view(&self.algebra, id, entry.stress, &caller)?;
        Ok(entry.stress)
    }

    /// Get the achievement handle of a live entry. Requires a grant.
    pub async fn achievement_of(&self, caller: Address, id: EntryId) -> Result<CipherHandle> {
        let entry = self.live_entry(id).await?;
        access::ensure_can_view(&self.algebra, id, entry.achievement, &caller)?;
        Ok(entry.achievement)
    }

    /// Get the mindset handle of a live entry. Requires a grant.
    pub async fn mindset_of(&self, caller: Address, id: EntryId) -> Result<CipherHandle> {
        let entry = self.live_entry(id).await?;
        access::ensure_can_view(&self.algebra, id, entry.mindset, &caller)?;
        Ok(entry.mindset)
    }

    /// The entry ids currently owned by `owner`, in index order.
    ///
    /// Index order is insertion order disturbed only by the documented
    /// swap-and-truncate removals; no positional lookup is offered.
    pub async fn entries_of(&self, owner: Address) -> Result<Vec<EntryId>> {
        Ok(self.store.entries_for(&owner).await?)
    }

    /// Number of live entries across all owners.
    pub async fn total_entries(&self) -> Result<u64> {
        Ok(self.store.live_count().await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Aggregate Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Fold `owner`'s stress values into one encrypted total.
    ///
    /// Returns the encrypted *sum*: homomorphic division is not available,
    /// so the historical "average" name is aspirational and the caller is
    /// expected to divide after decryption. The result handle is granted to
    /// {ledger, owner}.
    ///
    /// Fails with `EmptyIndex` when the owner has no entries.
    pub async fn average_stress(&self, owner: Address) -> Result<CipherHandle> {
        let ids = self.store.entries_for(&owner).await?;
        if ids.is_empty() {
            return Err(LedgerError::EmptyIndex(owner));
        }

        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            handles.push(self.live_entry(id).await?.stress);
        }

        let sum = aggregate::fold_sum(&self.algebra, &handles)?;
        access::allow_handle(&self.algebra, sum, &owner)?;

        debug!(owner = %owner, entries = handles.len(), "aggregated stress");
        Ok(sum)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch an entry, treating tombstones the same as never-allocated ids.
    async fn live_entry(&self, id: EntryId) -> Result<Entry> {
        match self.store.entry(id).await? {
            Some(entry) if entry.alive => Ok(entry),
            _ => Err(LedgerError::NotFound(id)),
        }
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
