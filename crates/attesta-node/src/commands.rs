//! Commands dispatched from the HTTP API to the node event loop.
//!
//! All mutations flow through this channel and are applied by the single
//! event loop, which persists the resulting audit entry before replying —
//! that loop is the total ordering point for durable state.

use serde::Serialize;
use tokio::sync::oneshot;

use attesta_core::{Commitment, Principal, RegistryError};

/// A command sent from the HTTP API to the node's main event loop.
pub enum NodeCommand {
    /// Register a new identity commitment.
    Register {
        caller: Principal,
        commitment: Commitment,
        reply: oneshot::Sender<Result<MutationResponse, CommandError>>,
    },
    /// Verify a registered commitment.
    Verify {
        caller: Principal,
        commitment: Commitment,
        reply: oneshot::Sender<Result<MutationResponse, CommandError>>,
    },
    /// Revoke a registered or verified commitment.
    Revoke {
        caller: Principal,
        commitment: Commitment,
        reason: String,
        reply: oneshot::Sender<Result<MutationResponse, CommandError>>,
    },
    /// Grant the verifier capability.
    AddVerifier {
        caller: Principal,
        target: Principal,
        reply: oneshot::Sender<Result<MutationResponse, CommandError>>,
    },
    /// Withdraw the verifier capability.
    RemoveVerifier {
        caller: Principal,
        target: Principal,
        reply: oneshot::Sender<Result<MutationResponse, CommandError>>,
    },
}

/// Response after an accepted mutation.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    /// Sequence number of the appended audit entry.
    pub seq: u64,
    /// What happened, e.g. "registered" or "verifier_added".
    pub status: String,
}

/// Why a command failed: rejected by the registry, or accepted but not
/// durably persisted.
#[derive(Debug, Clone)]
pub enum CommandError {
    Registry(RegistryError),
    Storage(String),
}

impl From<RegistryError> for CommandError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(e) => write!(f, "{e}"),
            Self::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}
