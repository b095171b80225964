//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use cipherjournal::{Ledger, LedgerConfig, MemoryNotifier};
use cipherjournal_algebra::{ClearAlgebra, ExternalCiphertext, Grantee};
use cipherjournal_core::{Address, CipherHandle, EntryId};
use cipherjournal_store::MemoryStore;

/// A test fixture bundling a ledger over the in-memory backend with a
/// fixed cast of identities.
pub struct TestFixture {
    pub ledger: Ledger<MemoryStore, ClearAlgebra, MemoryNotifier>,
    pub admin: Address,
    pub alice: Address,
    pub bob: Address,
}

impl TestFixture {
    /// Create a fresh fixture with an empty ledger.
    pub fn new() -> Self {
        let admin = named_address(0xad);
        Self {
            ledger: Ledger::new(
                MemoryStore::new(),
                ClearAlgebra::new(),
                MemoryNotifier::new(),
                LedgerConfig { admin },
            ),
            admin,
            alice: named_address(0xa1),
            bob: named_address(0xb2),
        }
    }

    /// Seal a plaintext value into a valid external ciphertext.
    pub fn seal(value: i64) -> ExternalCiphertext {
        ClearAlgebra::seal(value)
    }

    /// Create an entry with the given stress value and fixed
    /// achievement/mindset fields.
    pub async fn create_entry(&self, owner: Address, stress: i64) -> EntryId {
        self.ledger
            .create(
                owner,
                "fixture entry",
                &Self::seal(stress),
                &Self::seal(50),
                &Self::seal(1),
            )
            .await
            .expect("fixture create must succeed")
    }

    /// Decrypt-equivalent read of a handle as `grantee`.
    pub fn reveal(&self, handle: CipherHandle, grantee: Address) -> i64 {
        self.ledger
            .algebra()
            .reveal(handle, Grantee::Address(grantee))
            .expect("fixture reveal must succeed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A deterministic address from a single tag byte.
pub fn named_address(tag: u8) -> Address {
    Address::from_bytes([tag; 20])
}

/// Distinct addresses for multi-party tests. Tag 0 is skipped so the
/// zero address never appears.
pub fn multi_party_addresses(count: usize) -> Vec<Address> {
    (1..=count).map(|i| named_address(i as u8)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_create_and_reveal() {
        let fixture = TestFixture::new();
        let id = fixture.create_entry(fixture.alice, 40).await;

        let stress = fixture.ledger.stress_of(fixture.alice, id).await.unwrap();
        assert_eq!(fixture.reveal(stress, fixture.alice), 40);
    }

    #[tokio::test]
    async fn test_fixture_identities_distinct() {
        let fixture = TestFixture::new();
        assert_ne!(fixture.alice, fixture.bob);
        assert_ne!(fixture.alice, fixture.admin);
        assert!(!fixture.alice.is_zero());
    }

    #[test]
    fn test_multi_party_excludes_zero() {
        let parties = multi_party_addresses(5);
        assert_eq!(parties.len(), 5);
        assert!(parties.iter().all(|a| !a.is_zero()));
    }
}
