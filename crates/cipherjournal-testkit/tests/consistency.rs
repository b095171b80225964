//! Structural invariants of the ledger under random operation sequences.
//!
//! Drives the ledger through arbitrary create/delete/transfer interleavings
//! and asserts the owner-index invariants that must hold regardless of
//! order: no id appears twice, every indexed id is a live entry of that
//! owner, and allocation stays strictly monotonic.

use std::collections::HashSet;

use proptest::prelude::*;

use cipherjournal::{EntryId, LedgerError};
use cipherjournal_testkit::fixtures::{multi_party_addresses, TestFixture};

#[derive(Debug, Clone)]
enum Op {
    Create { owner: usize, stress: i64 },
    Delete { actor: usize, target: usize },
    Transfer { actor: usize, target: usize, to: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0i64..=100).prop_map(|(owner, stress)| Op::Create { owner, stress }),
        (0usize..4, 0usize..16).prop_map(|(actor, target)| Op::Delete { actor, target }),
        (0usize..4, 0usize..16, 0usize..4)
            .prop_map(|(actor, target, to)| Op::Transfer { actor, target, to }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_owner_indices_stay_consistent(ops in prop::collection::vec(op(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let fixture = TestFixture::new();
            let parties = multi_party_addresses(4);
            let mut created: Vec<EntryId> = Vec::new();

            for op in ops {
                match op {
                    Op::Create { owner, stress } => {
                        let id = fixture.create_entry(parties[owner], stress).await;
                        // Allocation is strictly monotonic.
                        if let Some(&last) = created.last() {
                            assert!(id > last);
                        }
                        created.push(id);
                    }
                    Op::Delete { actor, target } => {
                        if created.is_empty() {
                            continue;
                        }
                        let id = created[target % created.len()];
                        match fixture.ledger.delete(parties[actor], id).await {
                            Ok(())
                            | Err(LedgerError::NotFound(_))
                            | Err(LedgerError::Unauthorized(_)) => {}
                            Err(other) => panic!("unexpected delete failure: {other}"),
                        }
                    }
                    Op::Transfer { actor, target, to } => {
                        if created.is_empty() {
                            continue;
                        }
                        let id = created[target % created.len()];
                        match fixture.ledger.transfer(parties[actor], id, parties[to]).await {
                            Ok(())
                            | Err(LedgerError::NotFound(_))
                            | Err(LedgerError::Unauthorized(_)) => {}
                            Err(other) => panic!("unexpected transfer failure: {other}"),
                        }
                    }
                }
            }

            // Invariants over the final state.
            let mut indexed: HashSet<EntryId> = HashSet::new();
            let mut index_total = 0u64;
            for &party in &parties {
                for id in fixture.ledger.entries_of(party).await.unwrap() {
                    assert!(indexed.insert(id), "id {id} indexed twice");
                    index_total += 1;

                    let entry = fixture.ledger.entry(id).await.unwrap();
                    assert!(entry.alive);
                    assert_eq!(entry.owner, party);
                }
            }
            assert_eq!(fixture.ledger.total_entries().await.unwrap(), index_total);

            // Every created id that is not indexed must be a tombstone.
            for id in created {
                if !indexed.contains(&id) {
                    assert!(matches!(
                        fixture.ledger.entry(id).await.unwrap_err(),
                        LedgerError::NotFound(_)
                    ));
                }
            }
        });
    }
}
