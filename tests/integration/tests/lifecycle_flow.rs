//! Integration test: Full identity lifecycle across crates.
//!
//! Drives register → verify → revoke flows through the registry the way a
//! node would, checking the record, status view, and audit log together.

use attesta_core::{
    AuditEvent, Commitment, IdentityStatus, Principal, RegistryError, StatusView,
};
use attesta_registry::IdentityRegistry;

fn principal(id: &str) -> Principal {
    Principal::new(id).expect("valid principal")
}

fn commitment(byte: u8) -> Commitment {
    Commitment::from_bytes([byte; 32])
}

// =========================================================================
// Happy path: register → verify → revoke
// =========================================================================

#[test]
fn test_full_lifecycle_flow() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let alice = principal("alice");
    let c = commitment(1);

    // Step 1: any principal may register.
    let e0 = reg.register(&alice, c).expect("registration should succeed");
    assert_eq!(e0.seq, 0);
    assert_eq!(
        reg.check_status(c),
        StatusView {
            registered: true,
            verified: false,
            revoked: false,
            revoked_at: None,
            revocation_reason: None,
        }
    );

    // Step 2: the owner verifies it.
    let e1 = reg.verify(&owner, c).expect("verification should succeed");
    assert_eq!(e1.seq, 1);
    let view = reg.check_status(c);
    assert!(view.registered && view.verified && !view.revoked);

    // Step 3: the owner revokes it for cause.
    let e2 = reg.revoke(&owner, c, "fraud").expect("revocation should succeed");
    assert_eq!(e2.seq, 2);
    let view = reg.check_status(c);
    assert!(view.revoked);
    assert_eq!(view.revocation_reason.as_deref(), Some("fraud"));
    assert!(view.revoked_at.is_some());
    // The verified flag reflects history, not the current state.
    assert!(view.verified);

    // Step 4: a revoked commitment can never be verified again.
    let err = reg.verify(&owner, c).unwrap_err();
    assert!(matches!(err, RegistryError::NotRegistered(_)));

    // The full record keeps the whole history.
    let record = reg.record(c).expect("record should remain queryable");
    assert_eq!(record.status, IdentityStatus::Revoked);
    assert_eq!(record.registered_by, alice);
    assert_eq!(record.verified_by, Some(owner));
}

#[test]
fn test_revoke_without_verification() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let c = commitment(2);

    reg.register(&principal("bob"), c).unwrap();
    reg.revoke(&owner, c, "duplicate documents").unwrap();

    let view = reg.check_status(c);
    assert!(view.registered);
    assert!(!view.verified, "never verified, so the flag stays false");
    assert!(view.revoked);
}

// =========================================================================
// Rejected transitions leave the record and log untouched
// =========================================================================

#[test]
fn test_failed_operations_do_not_advance_state() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let c = commitment(3);

    reg.register(&principal("alice"), c).unwrap();
    let log_len = reg.log_len();

    // Duplicate registration, from anyone including the owner.
    assert!(matches!(
        reg.register(&owner, c).unwrap_err(),
        RegistryError::AlreadyRegistered(_)
    ));
    // Verification by a principal with no capability.
    assert!(matches!(
        reg.verify(&principal("alice"), c).unwrap_err(),
        RegistryError::Unauthorized { .. }
    ));
    // Revocation of an unknown commitment.
    assert!(matches!(
        reg.revoke(&owner, commitment(99), "x").unwrap_err(),
        RegistryError::NotRegistered(_)
    ));

    assert_eq!(reg.log_len(), log_len);
    assert_eq!(
        reg.record(c).unwrap().status,
        IdentityStatus::Registered
    );
}

#[test]
fn test_zero_commitment_rejected_but_queryable() {
    let reg = IdentityRegistry::new(principal("owner"));

    let err = reg.register(&principal("alice"), Commitment::ZERO).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidCommitment(_)));

    // Status checks never fail, even for the zero value.
    assert_eq!(reg.check_status(Commitment::ZERO), StatusView::unregistered());
}

// =========================================================================
// Audit entry serialization
// =========================================================================

#[test]
fn test_audit_entries_roundtrip_as_json() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let c = commitment(4);

    reg.add_verifier(&owner, &principal("v1")).unwrap();
    reg.register(&principal("alice"), c).unwrap();
    reg.verify(&principal("v1"), c).unwrap();
    reg.revoke(&principal("v1"), c, "").unwrap();

    for entry in reg.replay() {
        let json = serde_json::to_string(&entry).expect("serialize should work");
        let back: attesta_core::AuditEntry =
            serde_json::from_str(&json).expect("deserialize should work");
        assert_eq!(back, entry);
    }

    // The revocation entry carries the empty reason verbatim.
    let last = reg.replay().pop().unwrap();
    assert!(matches!(
        last.event,
        AuditEvent::IdentityRevoked { ref reason, .. } if reason.is_empty()
    ));
}
