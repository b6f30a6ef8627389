//! Integration test: Verifier set management and role gating.
//!
//! Exercises the owner-managed verifier set end to end: grants, withdrawals,
//! the owner's implicit capability, and the gate ordering on lifecycle
//! operations.

use attesta_core::{AuditEvent, Commitment, Principal, RegistryError};
use attesta_registry::IdentityRegistry;

fn principal(id: &str) -> Principal {
    Principal::new(id).expect("valid principal")
}

fn commitment(byte: u8) -> Commitment {
    Commitment::from_bytes([byte; 32])
}

// =========================================================================
// Grant flow: non-owner fails, owner succeeds, grantee gains capability
// =========================================================================

#[test]
fn test_grant_flow() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let user1 = principal("user1");
    let user2 = principal("user2");
    let c = commitment(1);

    reg.register(&user1, c).unwrap();

    // user1 cannot appoint user2.
    let err = reg.add_verifier(&user1, &user2).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized { .. }));
    assert!(!reg.is_verifier(&user2));

    // user2 cannot verify yet.
    let err = reg.verify(&user2, c).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized { .. }));

    // The owner appoints user2, who can then verify.
    reg.add_verifier(&owner, &user2).unwrap();
    assert!(reg.is_verifier(&user2));
    reg.verify(&user2, c).expect("new verifier should be able to verify");

    let record = reg.record(c).unwrap();
    assert_eq!(record.verified_by, Some(user2));
}

#[test]
fn test_withdrawal_revokes_capability_immediately() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let v1 = principal("v1");

    reg.add_verifier(&owner, &v1).unwrap();
    reg.register(&principal("alice"), commitment(1)).unwrap();
    reg.register(&principal("alice"), commitment(2)).unwrap();

    reg.verify(&v1, commitment(1)).unwrap();
    reg.remove_verifier(&owner, &v1).unwrap();

    // The withdrawn verifier loses the capability for later operations;
    // the verification it already performed stands.
    let err = reg.verify(&v1, commitment(2)).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized { .. }));
    assert!(reg.check_status(commitment(1)).verified);
}

#[test]
fn test_owner_is_always_a_verifier() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());

    // The owner never appears in the flagged set, but holds the capability.
    assert!(reg.verifiers().is_empty());
    assert!(reg.is_verifier(&owner));

    // Removing the owner from the set is a no-op: the capability is a
    // union, not a flag.
    reg.remove_verifier(&owner, &owner).unwrap();
    assert!(reg.is_verifier(&owner));

    reg.register(&principal("alice"), commitment(1)).unwrap();
    reg.verify(&owner, commitment(1)).unwrap();
}

// =========================================================================
// Gate ordering and idempotent edits
// =========================================================================

#[test]
fn test_authorization_checked_before_record_lookup() {
    let reg = IdentityRegistry::new(principal("owner"));

    // The commitment does not exist, but an unauthorized caller sees the
    // role failure, not the lookup failure.
    let err = reg.verify(&principal("nobody"), commitment(9)).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized { .. }));
    let err = reg
        .revoke(&principal("nobody"), commitment(9), "x")
        .unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized { .. }));
}

#[test]
fn test_repeated_role_edits_are_recorded() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let v1 = principal("v1");

    // Granting twice and withdrawing a stranger all succeed and all land
    // in the log, even though only the first grant changes the set.
    reg.add_verifier(&owner, &v1).unwrap();
    reg.add_verifier(&owner, &v1).unwrap();
    reg.remove_verifier(&owner, &principal("stranger")).unwrap();

    assert_eq!(reg.verifiers(), vec![v1]);
    let entries = reg.replay();
    assert_eq!(entries.len(), 3);
    assert!(matches!(entries[0].event, AuditEvent::VerifierAdded { .. }));
    assert!(matches!(entries[1].event, AuditEvent::VerifierAdded { .. }));
    assert!(matches!(entries[2].event, AuditEvent::VerifierRemoved { .. }));
}

#[test]
fn test_verifier_cannot_manage_the_set() {
    let owner = principal("owner");
    let reg = IdentityRegistry::new(owner.clone());
    let v1 = principal("v1");

    reg.add_verifier(&owner, &v1).unwrap();

    // Verifier capability does not imply set management.
    let err = reg.add_verifier(&v1, &principal("v2")).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized { .. }));
    let err = reg.remove_verifier(&v1, &v1).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized { .. }));
    assert!(reg.is_verifier(&v1));
}
