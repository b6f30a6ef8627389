use std::fmt;

use crate::error::RegistryError;

/// The lifecycle states of a registered identity commitment.
///
/// An unregistered commitment has no record at all, so "Unregistered" is
/// represented by absence in the registry map rather than a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum IdentityStatus {
    /// Registered by a principal, awaiting verification.
    Registered,
    /// Confirmed by an authorized verifier.
    Verified,
    /// Revoked for cause. Final state — revocation is permanent.
    Revoked,
}

impl IdentityStatus {
    /// Whether this is a final (terminal) state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl fmt::Display for IdentityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => write!(f, "Registered"),
            Self::Verified => write!(f, "Verified"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Events that drive identity lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A principal registers a new commitment.
    Register,
    /// A verifier confirms a registered commitment.
    Verify,
    /// A verifier revokes a registered or verified commitment.
    Revoke,
}

/// The canonical transition table for identity commitments.
///
/// Valid transitions:
/// - (absent) → Registered (Register)
/// - Registered → Verified (Verify)
/// - Registered → Revoked (Revoke)
/// - Verified → Revoked (Revoke)
///
/// Revoked is terminal: no re-registration and no un-revocation.
pub struct LifecycleStateMachine;

impl LifecycleStateMachine {
    /// Attempt a transition from the current status (`None` = unregistered).
    /// Returns the new status, or an error for illegal transitions.
    pub fn transition(
        current: Option<IdentityStatus>,
        event: LifecycleEvent,
    ) -> Result<IdentityStatus, RegistryError> {
        let new_status = match (current, event) {
            (None, LifecycleEvent::Register) => IdentityStatus::Registered,
            (Some(IdentityStatus::Registered), LifecycleEvent::Verify) => IdentityStatus::Verified,
            (Some(IdentityStatus::Registered), LifecycleEvent::Revoke) => IdentityStatus::Revoked,
            (Some(IdentityStatus::Verified), LifecycleEvent::Revoke) => IdentityStatus::Revoked,
            (from, event) => {
                return Err(RegistryError::InvalidTransition { from, event });
            }
        };

        tracing::debug!(from = ?current, to = %new_status, event = ?event, "lifecycle transition");

        Ok(new_status)
    }

    /// Check whether a transition is legal without performing it.
    pub fn can_transition(current: Option<IdentityStatus>, event: LifecycleEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
