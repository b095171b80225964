//! The journal entry record.

use serde::{Deserialize, Serialize};

use crate::types::{Address, CipherHandle, EntryId};

/// One confidential journal record.
///
/// `content` is plaintext by design; confidentiality covers only the three
/// numeric fields, which are opaque ciphertext handles the ledger never
/// decodes. An entry is never physically removed: `alive == false` is the
/// tombstone state, which excludes the entry from owner indices and live
/// counts while keeping its identifier a stable reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique, never-reused identifier.
    pub id: EntryId,

    /// Current owner; the only identity with mutation rights.
    pub owner: Address,

    /// Free-text body. Not encrypted.
    pub content: String,

    /// Encrypted stress level.
    pub stress: CipherHandle,

    /// Encrypted achievement score.
    pub achievement: CipherHandle,

    /// Encrypted mindset indicator.
    pub mindset: CipherHandle,

    /// When the entry was created (Unix ms).
    pub created_at: i64,

    /// When the entry was last mutated (Unix ms).
    pub updated_at: i64,

    /// Tombstone flag. `false` means deleted-but-never-erased.
    pub alive: bool,
}

impl Entry {
    /// Whether `caller` is the current owner.
    pub fn is_owned_by(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// The three ciphertext handles, in field order.
    pub fn cipher_fields(&self) -> [CipherHandle; 3] {
        [self.stress, self.achievement, self.mindset]
    }
}

/// A record ready to be inserted, before the store has assigned its id.
///
/// Identifier allocation belongs to the store so that allocation and the
/// storage write happen in one atomic step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    /// The creating caller, who becomes the owner.
    pub owner: Address,

    /// Free-text body.
    pub content: String,

    /// Encrypted stress level, already imported by the algebra.
    pub stress: CipherHandle,

    /// Encrypted achievement score, already imported by the algebra.
    pub achievement: CipherHandle,

    /// Encrypted mindset indicator, already imported by the algebra.
    pub mindset: CipherHandle,

    /// Creation time (Unix ms); also the initial `updated_at`.
    pub created_at: i64,
}

impl EntryDraft {
    /// Materialize the draft into a live entry with a store-assigned id.
    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            owner: self.owner,
            content: self.content,
            stress: self.stress,
            achievement: self.achievement,
            mindset: self.mindset,
            created_at: self.created_at,
            updated_at: self.created_at,
            alive: true,
        }
    }
}
