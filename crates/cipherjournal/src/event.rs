//! State-transition notifications.
//!
//! Each successful mutation emits exactly one event per affected entry.
//! The notifier is the durable observable record of the ledger: it is
//! append-only, ordered relative to other emissions from the same call,
//! and records successes only; failed operations leave no trace here.

use std::sync::RwLock;

use cipherjournal_core::{Address, EntryId};

/// A record of one state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A new entry was created.
    EntryAdded {
        id: EntryId,
        owner: Address,
        at: i64,
    },

    /// An existing entry's content and ciphertext fields were replaced.
    EntryUpdated {
        id: EntryId,
        owner: Address,
        at: i64,
    },

    /// Ownership moved from one identity to another.
    OwnershipTransferred {
        id: EntryId,
        from: Address,
        to: Address,
        at: i64,
    },

    /// An entry was tombstoned, by its owner or by the admin.
    EntryTombstoned {
        id: EntryId,
        actor: Address,
        at: i64,
    },
}

impl LedgerEvent {
    /// The entry this event concerns.
    pub fn entry_id(&self) -> EntryId {
        match self {
            LedgerEvent::EntryAdded { id, .. }
            | LedgerEvent::EntryUpdated { id, .. }
            | LedgerEvent::OwnershipTransferred { id, .. }
            | LedgerEvent::EntryTombstoned { id, .. } => *id,
        }
    }
}

/// Sink for ledger events.
///
/// Implementations must preserve emission order.
pub trait Notifier: Send + Sync {
    /// Record one event. Must not fail; a notifier that can fail belongs
    /// outside this boundary.
    fn emit(&self, event: LedgerEvent);
}

/// Discards all events.
impl Notifier for () {
    fn emit(&self, _event: LedgerEvent) {}
}

/// In-memory notifier that records every event in order.
///
/// The stand-in for a durable event log; used by tests to assert the
/// transition history.
#[derive(Default)]
pub struct MemoryNotifier {
    events: RwLock<Vec<LedgerEvent>>,
}

impl MemoryNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in emission order.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.read().expect("notifier lock poisoned").clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().expect("notifier lock poisoned").len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for MemoryNotifier {
    fn emit(&self, event: LedgerEvent) {
        self.events
            .write()
            .expect("notifier lock poisoned")
            .push(event);
    }
}
