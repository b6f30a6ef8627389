use crate::commitment::Commitment;
use crate::lifecycle::{IdentityStatus, LifecycleEvent};
use crate::principal::Principal;

/// Registry errors. Every variant carries the offending commitment or
/// principal so the caller can decide whether to retry with corrected
/// input, surface the failure, or treat it as a security event.
///
/// All of these are local, synchronous rejections — the engine never
/// retries internally and never mutates state when it returns an error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid commitment: {0}")]
    InvalidCommitment(String),

    #[error("invalid principal: {0:?}")]
    InvalidPrincipal(String),

    #[error("commitment already registered: {0}")]
    AlreadyRegistered(Commitment),

    #[error("commitment not registered: {0}")]
    NotRegistered(Commitment),

    #[error("commitment already verified: {0}")]
    AlreadyVerified(Commitment),

    #[error("commitment already revoked: {0}")]
    AlreadyRevoked(Commitment),

    #[error("principal {principal} is not authorized to {action}")]
    Unauthorized {
        principal: Principal,
        action: &'static str,
    },

    #[error("corrupt audit log: {0}")]
    CorruptAuditLog(String),

    #[error("illegal lifecycle transition: {event:?} from {from:?}")]
    InvalidTransition {
        /// Current status; `None` means the commitment has no record.
        from: Option<IdentityStatus>,
        event: LifecycleEvent,
    },
}
