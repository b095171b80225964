//! End-to-end tests for the ledger facade over the in-memory backend.

use cipherjournal::{
    Address, CiphertextAlgebra, ClearAlgebra, EntryId, ExternalCiphertext, Grantee, ImportProof,
    Ledger, LedgerConfig, LedgerError, LedgerEvent, MemoryNotifier, MemoryStore,
};

const ADMIN: Address = Address([0xad; 20]);

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

fn test_ledger() -> Ledger<MemoryStore, ClearAlgebra, MemoryNotifier> {
    // First caller wins; later calls are no-ops.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Ledger::new(
        MemoryStore::new(),
        ClearAlgebra::new(),
        MemoryNotifier::new(),
        LedgerConfig { admin: ADMIN },
    )
}

async fn create_with_stress(
    ledger: &Ledger<MemoryStore, ClearAlgebra, MemoryNotifier>,
    owner: Address,
    stress: i64,
) -> EntryId {
    ledger
        .create(
            owner,
            "journal entry",
            &ClearAlgebra::seal(stress),
            &ClearAlgebra::seal(50),
            &ClearAlgebra::seal(1),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_then_read_back() {
    let ledger = test_ledger();
    let alice = addr(0xa1);

    let id = ledger
        .create(
            alice,
            "first entry",
            &ClearAlgebra::seal(40),
            &ClearAlgebra::seal(70),
            &ClearAlgebra::seal(2),
        )
        .await
        .unwrap();
    assert_eq!(id, EntryId::FIRST);

    let entry = ledger.entry(id).await.unwrap();
    assert_eq!(entry.owner, alice);
    assert_eq!(entry.content, "first entry");
    assert!(entry.alive);
    assert_eq!(entry.created_at, entry.updated_at);

    assert_eq!(ledger.content_of(id).await.unwrap(), "first entry");
    assert_eq!(ledger.entries_of(alice).await.unwrap(), vec![id]);
    assert_eq!(ledger.total_entries().await.unwrap(), 1);
}

#[tokio::test]
async fn test_zero_address_cannot_create() {
    let ledger = test_ledger();
    let err = create_err(&ledger, Address::ZERO).await;
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
    assert_eq!(ledger.total_entries().await.unwrap(), 0);
}

async fn create_err(
    ledger: &Ledger<MemoryStore, ClearAlgebra, MemoryNotifier>,
    owner: Address,
) -> LedgerError {
    ledger
        .create(
            owner,
            "x",
            &ClearAlgebra::seal(1),
            &ClearAlgebra::seal(1),
            &ClearAlgebra::seal(1),
        )
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_ids_monotonic_and_never_reused() {
    let ledger = test_ledger();
    let alice = addr(0xa1);

    let id1 = create_with_stress(&ledger, alice, 1).await;
    let id2 = create_with_stress(&ledger, alice, 2).await;
    let id3 = create_with_stress(&ledger, alice, 3).await;
    assert_eq!((id1, id2, id3), (EntryId(1), EntryId(2), EntryId(3)));

    ledger.delete(alice, id2).await.unwrap();

    // The freed id stays burned.
    let id4 = create_with_stress(&ledger, alice, 4).await;
    assert_eq!(id4, EntryId(4));
}

#[tokio::test]
async fn test_failed_proof_consumes_no_id() {
    let ledger = test_ledger();
    let alice = addr(0xa1);

    let sealed = ClearAlgebra::seal(40);
    let bad = ExternalCiphertext::with_proof(sealed.bytes, ImportProof([0xff; 32]));

    let err = ledger
        .create(alice, "x", &bad, &ClearAlgebra::seal(1), &ClearAlgebra::seal(1))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidCiphertextProof));

    assert_eq!(ledger.total_entries().await.unwrap(), 0);
    assert!(ledger.notifier().is_empty());

    // The next successful create still gets the first id.
    let id = create_with_stress(&ledger, alice, 40).await;
    assert_eq!(id, EntryId::FIRST);
}

#[tokio::test]
async fn test_update_owner_only() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    let mallory = addr(0xee);
    let id = create_with_stress(&ledger, alice, 40).await;

    let err = ledger
        .update(
            mallory,
            id,
            "hijacked",
            &ClearAlgebra::seal(0),
            &ClearAlgebra::seal(0),
            &ClearAlgebra::seal(0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized(_)));
    assert_eq!(ledger.content_of(id).await.unwrap(), "journal entry");

    ledger
        .update(
            alice,
            id,
            "revised",
            &ClearAlgebra::seal(25),
            &ClearAlgebra::seal(60),
            &ClearAlgebra::seal(3),
        )
        .await
        .unwrap();

    assert_eq!(ledger.content_of(id).await.unwrap(), "revised");

    // The fresh handle carries fresh grants for {ledger, owner}.
    let stress = ledger.stress_of(alice, id).await.unwrap();
    assert!(ledger.algebra().is_allowed(stress, Grantee::Ledger).unwrap());
    assert_eq!(
        ledger.algebra().reveal(stress, Grantee::Address(alice)).unwrap(),
        25
    );
}

#[tokio::test]
async fn test_delete_owner_only_and_terminal() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    let mallory = addr(0xee);
    let id = create_with_stress(&ledger, alice, 40).await;

    let err = ledger.delete(mallory, id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized(_)));

    ledger.delete(alice, id).await.unwrap();

    assert!(matches!(
        ledger.entry(id).await.unwrap_err(),
        LedgerError::NotFound(_)
    ));
    assert!(matches!(
        ledger.delete(alice, id).await.unwrap_err(),
        LedgerError::NotFound(_)
    ));
    assert_eq!(ledger.total_entries().await.unwrap(), 0);
    assert!(ledger.entries_of(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_owner_index_swap_removal_order() {
    let ledger = test_ledger();
    let alice = addr(0xa1);

    let e1 = create_with_stress(&ledger, alice, 1).await;
    let e2 = create_with_stress(&ledger, alice, 2).await;
    let e3 = create_with_stress(&ledger, alice, 3).await;

    ledger.delete(alice, e1).await.unwrap();

    // The last index slot backfills the vacated one.
    assert_eq!(ledger.entries_of(alice).await.unwrap(), vec![e3, e2]);
}

#[tokio::test]
async fn test_transfer_moves_index_and_regrants() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    let bob = addr(0xb2);
    let id = create_with_stress(&ledger, alice, 40).await;

    // Zero recipient is rejected up front.
    assert!(matches!(
        ledger.transfer(alice, id, Address::ZERO).await.unwrap_err(),
        LedgerError::InvalidArgument(_)
    ));

    // Only the owner may transfer.
    assert!(matches!(
        ledger.transfer(bob, id, bob).await.unwrap_err(),
        LedgerError::Unauthorized(_)
    ));

    ledger.transfer(alice, id, bob).await.unwrap();

    let entry = ledger.entry(id).await.unwrap();
    assert_eq!(entry.owner, bob);
    assert!(ledger.entries_of(alice).await.unwrap().is_empty());
    assert_eq!(ledger.entries_of(bob).await.unwrap(), vec![id]);

    // The new owner holds grants on every ciphertext field.
    let stress = ledger.stress_of(bob, id).await.unwrap();
    assert_eq!(
        ledger.algebra().reveal(stress, Grantee::Address(bob)).unwrap(),
        40
    );
    ledger.achievement_of(bob, id).await.unwrap();
    ledger.mindset_of(bob, id).await.unwrap();

    // The prior owner's grants stay dormant, but ownership is gone.
    assert!(ledger.stress_of(alice, id).await.is_ok());
    assert!(matches!(
        ledger.delete(alice, id).await.unwrap_err(),
        LedgerError::Unauthorized(_)
    ));
}

#[tokio::test]
async fn test_transfer_then_delete_scenario() {
    let ledger = test_ledger();
    let u1 = addr(0x01);
    let u2 = addr(0x02);

    let id = create_with_stress(&ledger, u1, 40).await;
    ledger.transfer(u1, id, u2).await.unwrap();

    assert!(matches!(
        ledger.delete(u1, id).await.unwrap_err(),
        LedgerError::Unauthorized(_)
    ));

    ledger.delete(u2, id).await.unwrap();
    assert!(matches!(
        ledger.entry(id).await.unwrap_err(),
        LedgerError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_field_reads_require_grant() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    let stranger = addr(0xcc);
    let id = create_with_stress(&ledger, alice, 40).await;

    assert!(ledger.stress_of(alice, id).await.is_ok());
    assert!(matches!(
        ledger.stress_of(stranger, id).await.unwrap_err(),
        LedgerError::Unauthorized(_)
    ));
    assert!(matches!(
        ledger.achievement_of(stranger, id).await.unwrap_err(),
        LedgerError::Unauthorized(_)
    ));

    // The full record remains readable; the handles inside are opaque.
    assert!(ledger.entry(id).await.is_ok());
}

#[tokio::test]
async fn test_batch_tombstone_admin_only_skips_absent() {
    let ledger = test_ledger();
    let alice = addr(0xa1);

    let id1 = create_with_stress(&ledger, alice, 1).await;
    let id2 = create_with_stress(&ledger, alice, 2).await;

    assert!(matches!(
        ledger.batch_tombstone(alice, &[id1]).await.unwrap_err(),
        LedgerError::Unauthorized(_)
    ));
    assert!(ledger.entry(id1).await.is_ok());

    // Never-allocated and already-tombstoned ids are skipped, not errors.
    ledger.delete(alice, id2).await.unwrap();
    let count = ledger
        .batch_tombstone(ADMIN, &[id1, id2, EntryId(999)])
        .await
        .unwrap();
    assert_eq!(count, 1);

    assert!(matches!(
        ledger.entry(id1).await.unwrap_err(),
        LedgerError::NotFound(_)
    ));
    assert_eq!(ledger.total_entries().await.unwrap(), 0);
}

#[tokio::test]
async fn test_aggregate_single_entry_is_its_value() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    create_with_stress(&ledger, alice, 40).await;

    let sum = ledger.average_stress(alice).await.unwrap();
    assert_eq!(
        ledger.algebra().reveal(sum, Grantee::Address(alice)).unwrap(),
        40
    );
}

#[tokio::test]
async fn test_aggregate_sums_without_dividing() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    create_with_stress(&ledger, alice, 10).await;
    create_with_stress(&ledger, alice, 20).await;

    let sum = ledger.average_stress(alice).await.unwrap();

    // The result is the encrypted sum; the caller divides after decryption.
    assert_eq!(
        ledger.algebra().reveal(sum, Grantee::Address(alice)).unwrap(),
        30
    );
    assert!(ledger.algebra().is_allowed(sum, Grantee::Ledger).unwrap());
}

#[tokio::test]
async fn test_aggregate_empty_index_fails() {
    let ledger = test_ledger();
    let nobody = addr(0x77);

    assert!(matches!(
        ledger.average_stress(nobody).await.unwrap_err(),
        LedgerError::EmptyIndex(a) if a == nobody
    ));
}

#[tokio::test]
async fn test_aggregate_ignores_tombstoned_entries() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    create_with_stress(&ledger, alice, 10).await;
    let id2 = create_with_stress(&ledger, alice, 99).await;
    ledger.delete(alice, id2).await.unwrap();

    let sum = ledger.average_stress(alice).await.unwrap();
    assert_eq!(
        ledger.algebra().reveal(sum, Grantee::Address(alice)).unwrap(),
        10
    );
}

#[tokio::test]
async fn test_events_emitted_in_order() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    let bob = addr(0xb2);

    let id = create_with_stress(&ledger, alice, 40).await;
    ledger
        .update(
            alice,
            id,
            "revised",
            &ClearAlgebra::seal(20),
            &ClearAlgebra::seal(20),
            &ClearAlgebra::seal(20),
        )
        .await
        .unwrap();
    ledger.transfer(alice, id, bob).await.unwrap();
    ledger.delete(bob, id).await.unwrap();

    let events = ledger.notifier().events();
    assert_eq!(events.len(), 4);
    assert!(matches!(
        events[0],
        LedgerEvent::EntryAdded { id: i, owner, .. } if i == id && owner == alice
    ));
    assert!(matches!(
        events[1],
        LedgerEvent::EntryUpdated { id: i, owner, .. } if i == id && owner == alice
    ));
    assert!(matches!(
        events[2],
        LedgerEvent::OwnershipTransferred { id: i, from, to, .. }
            if i == id && from == alice && to == bob
    ));
    assert!(matches!(
        events[3],
        LedgerEvent::EntryTombstoned { id: i, actor, .. } if i == id && actor == bob
    ));
}

#[tokio::test]
async fn test_failed_operations_emit_nothing() {
    let ledger = test_ledger();
    let alice = addr(0xa1);
    let mallory = addr(0xee);
    let id = create_with_stress(&ledger, alice, 40).await;
    let baseline = ledger.notifier().len();

    let _ = ledger.delete(mallory, id).await;
    let _ = ledger.transfer(mallory, id, mallory).await;
    let _ = ledger.average_stress(mallory).await;

    assert_eq!(ledger.notifier().len(), baseline);
}
