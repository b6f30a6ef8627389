//! Shared state accessible from HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use attesta_registry::IdentityRegistry;

use crate::commands::NodeCommand;

/// State shared with the HTTP API: a handle for dispatching mutations to
/// the event loop and direct read access to the registry.
pub struct NodeState {
    /// Sends mutation commands to the node's main event loop.
    pub command_tx: mpsc::Sender<NodeCommand>,
    /// The registry, for lock-free-handler reads (status, verifiers, feed).
    pub registry: Arc<IdentityRegistry>,
    /// When the node started, for uptime reporting.
    pub start_time: Instant,
}

impl NodeState {
    pub fn new(command_tx: mpsc::Sender<NodeCommand>, registry: Arc<IdentityRegistry>) -> Self {
        Self {
            command_tx,
            registry,
            start_time: Instant::now(),
        }
    }
}
