use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::principal::Principal;

/// One accepted state transition, as recorded in the audit log.
///
/// Every event carries the acting principal and the wall-clock time the
/// transition was applied. Together the events are sufficient to replay
/// the full registry state, which is how external observers reconstruct
/// derived views (e.g. the current verifier set) and how the node restores
/// state after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEvent {
    IdentityRegistered {
        commitment: Commitment,
        registrant: Principal,
        at: DateTime<Utc>,
    },
    IdentityVerified {
        commitment: Commitment,
        verifier: Principal,
        at: DateTime<Utc>,
    },
    IdentityRevoked {
        commitment: Commitment,
        verifier: Principal,
        reason: String,
        at: DateTime<Utc>,
    },
    VerifierAdded {
        owner: Principal,
        verifier: Principal,
        at: DateTime<Utc>,
    },
    VerifierRemoved {
        owner: Principal,
        verifier: Principal,
        at: DateTime<Utc>,
    },
}

impl AuditEvent {
    /// The principal that performed the transition.
    pub fn actor(&self) -> &Principal {
        match self {
            Self::IdentityRegistered { registrant, .. } => registrant,
            Self::IdentityVerified { verifier, .. } => verifier,
            Self::IdentityRevoked { verifier, .. } => verifier,
            Self::VerifierAdded { owner, .. } => owner,
            Self::VerifierRemoved { owner, .. } => owner,
        }
    }

    /// When the transition was applied.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::IdentityRegistered { at, .. }
            | Self::IdentityVerified { at, .. }
            | Self::IdentityRevoked { at, .. }
            | Self::VerifierAdded { at, .. }
            | Self::VerifierRemoved { at, .. } => *at,
        }
    }

    /// The subject commitment, for identity lifecycle events.
    pub fn commitment(&self) -> Option<Commitment> {
        match self {
            Self::IdentityRegistered { commitment, .. }
            | Self::IdentityVerified { commitment, .. }
            | Self::IdentityRevoked { commitment, .. } => Some(*commitment),
            _ => None,
        }
    }
}

/// An audit event with its position in the global mutation order.
/// Sequence numbers start at 0 and increase by exactly one per accepted
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub seq: u64,
    #[serde(flatten)]
    pub event: AuditEvent,
}
