//! Integration test: Audit log replay, restore, and the live feed.
//!
//! Checks that the audit log alone is sufficient to reconstruct the full
//! registry state, and that live subscribers and late joiners converge on
//! the same history.

use attesta_core::{AuditEntry, Commitment, Principal, RegistryError};
use attesta_registry::{verifier_set_from_entries, IdentityRegistry};

fn principal(id: &str) -> Principal {
    Principal::new(id).expect("valid principal")
}

fn commitment(byte: u8) -> Commitment {
    Commitment::from_bytes([byte; 32])
}

/// Drives a representative mixed workload and returns the registry.
fn populated_registry() -> IdentityRegistry {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());

    reg.add_verifier(&owner, &principal("v1")).unwrap();
    reg.add_verifier(&owner, &principal("v2")).unwrap();
    reg.register(&principal("alice"), commitment(1)).unwrap();
    reg.register(&principal("bob"), commitment(2)).unwrap();
    reg.register(&principal("carol"), commitment(3)).unwrap();
    reg.verify(&principal("v1"), commitment(1)).unwrap();
    reg.verify(&principal("v2"), commitment(2)).unwrap();
    reg.revoke(&principal("v1"), commitment(2), "fraud").unwrap();
    reg.remove_verifier(&owner, &principal("v2")).unwrap();
    reg
}

// =========================================================================
// Restore from the log reproduces the registry exactly
// =========================================================================

#[test]
fn test_restore_equals_original() {
    let reg = populated_registry();
    let restored = IdentityRegistry::restore(principal("owner"), reg.replay())
        .expect("restore should succeed");

    for byte in 1..=3u8 {
        assert_eq!(
            restored.record(commitment(byte)),
            reg.record(commitment(byte)),
            "record {byte} should survive restore byte-for-byte"
        );
        assert_eq!(
            restored.check_status(commitment(byte)),
            reg.check_status(commitment(byte))
        );
    }
    assert_eq!(restored.verifiers(), reg.verifiers());
    assert_eq!(restored.replay(), reg.replay());
    assert_eq!(restored.len(), reg.len());
}

#[test]
fn test_restore_continues_the_sequence() {
    let reg = populated_registry();
    let next_seq = reg.log_len() as u64;

    let restored = IdentityRegistry::restore(principal("owner"), reg.replay()).unwrap();
    let entry = restored
        .register(&principal("dave"), commitment(4))
        .unwrap();
    assert_eq!(entry.seq, next_seq);
}

#[test]
fn test_restore_rejects_tampered_history() {
    let reg = populated_registry();

    // Reordering breaks the sequence invariant.
    let mut entries = reg.replay();
    entries.swap(2, 3);
    let err = IdentityRegistry::restore(principal("owner"), entries).unwrap_err();
    assert!(matches!(err, RegistryError::CorruptAuditLog(_)));

    // Dropping the tail is fine; the log is a prefix of history.
    let mut entries = reg.replay();
    entries.truncate(4);
    assert!(IdentityRegistry::restore(principal("owner"), entries).is_ok());
}

// =========================================================================
// External observers reconstruct derived views from the events alone
// =========================================================================

#[test]
fn test_verifier_set_reconstructed_from_events() {
    let reg = populated_registry();

    let from_events = verifier_set_from_entries(&reg.replay());
    let flagged: std::collections::HashSet<Principal> =
        reg.verifiers().into_iter().collect();
    assert_eq!(from_events, flagged);
    assert!(from_events.contains(&principal("v1")));
    assert!(!from_events.contains(&principal("v2")), "v2 was removed");
}

#[test]
fn test_json_exported_log_restores_elsewhere() {
    let reg = populated_registry();

    // Ship the log as JSON, the way the node persists and serves it.
    let exported = serde_json::to_string(&reg.replay()).unwrap();
    let entries: Vec<AuditEntry> = serde_json::from_str(&exported).unwrap();

    let restored = IdentityRegistry::restore(principal("owner"), entries).unwrap();
    assert_eq!(restored.replay(), reg.replay());
    assert!(restored.check_status(commitment(2)).revoked);
}

// =========================================================================
// Live feed and late-joiner resume
// =========================================================================

#[tokio::test]
async fn test_live_feed_matches_log_order() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let mut rx = reg.subscribe();

    reg.register(&principal("alice"), commitment(1)).unwrap();
    reg.verify(&owner, commitment(1)).unwrap();
    reg.revoke(&owner, commitment(1), "expired").unwrap();

    let mut received = Vec::new();
    for _ in 0..3 {
        received.push(rx.recv().await.unwrap());
    }
    assert_eq!(received, reg.replay());
}

#[tokio::test]
async fn test_late_joiner_resumes_without_gaps() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());

    reg.register(&principal("alice"), commitment(1)).unwrap();
    reg.register(&principal("bob"), commitment(2)).unwrap();

    // A subscriber arriving now missed seq 0 and 1. It backfills the gap
    // with entries_after and then follows the feed.
    let mut rx = reg.subscribe();
    let mut all = vec![reg.replay()[0].clone()];
    all.extend(reg.entries_after(0));

    reg.verify(&owner, commitment(1)).unwrap();
    all.push(rx.recv().await.unwrap());

    let seqs: Vec<u64> = all.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
    assert_eq!(all, reg.replay());
}
