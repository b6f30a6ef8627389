//! The Attesta node orchestrator.
//!
//! Restores the registry from the persisted audit log, runs the HTTP API
//! in a background task, and processes mutation commands in a single event
//! loop so that every accepted transition is persisted before its caller
//! sees the reply.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

use attesta_core::Principal;
use attesta_registry::IdentityRegistry;

use crate::commands::{CommandError, MutationResponse, NodeCommand};
use crate::config::AttestaConfig;
use crate::state::NodeState;
use crate::storage::Storage;

/// Capacity of the HTTP-to-event-loop command channel.
const COMMAND_CHANNEL_CAPACITY: usize = 256;

/// The Attesta registry node.
pub struct AttestaNode {
    /// Node configuration.
    config: AttestaConfig,
    /// The owner principal, from config, fixed for the data directory.
    owner: Principal,
    /// The registry (None until start restores it from storage).
    registry: Option<Arc<IdentityRegistry>>,
    /// Persistent audit log storage.
    storage: Option<Arc<Storage>>,
    /// Shared state handed to HTTP handlers.
    node_state: Option<Arc<NodeState>>,
    /// Receives commands from the HTTP API.
    command_rx: Option<mpsc::Receiver<NodeCommand>>,
}

impl AttestaNode {
    /// Create a new node with the given config. Fails if the configured
    /// owner principal is empty.
    pub fn new(config: AttestaConfig) -> Result<Self> {
        let owner = Principal::new(config.registry.owner.clone())
            .map_err(|e| anyhow::anyhow!("config [registry].owner: {e}"))?;

        tracing::info!(owner = %owner, "Attesta node created");

        Ok(Self {
            config,
            owner,
            registry: None,
            storage: None,
            node_state: None,
            command_rx: None,
        })
    }

    /// Initialize and start the node: storage, registry restore, HTTP API.
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("starting Attesta node");

        // Open storage and pin the owner to the data directory.
        let storage = Storage::open(&self.config.storage.data_dir)?;
        match storage.owner()? {
            Some(existing) if existing != self.owner.as_str() => {
                anyhow::bail!(
                    "data directory belongs to owner '{existing}', configured owner is '{}'; \
                     the owner is fixed at system creation",
                    self.owner
                );
            }
            Some(_) => {}
            None => storage.set_owner(self.owner.as_str())?,
        }
        tracing::info!(path = %self.config.storage.data_dir.display(), "storage initialized");

        // Restore the registry by replaying the persisted audit log.
        let entries = storage.load_entries()?;
        let restored = entries.len();
        let registry = Arc::new(IdentityRegistry::restore(self.owner.clone(), entries)?);
        tracing::info!(
            entries = restored,
            identities = registry.len(),
            "registry restored from audit log"
        );

        // Command channel: HTTP API → event loop.
        let (command_tx, command_rx) = mpsc::channel::<NodeCommand>(COMMAND_CHANNEL_CAPACITY);
        let node_state = Arc::new(NodeState::new(command_tx, Arc::clone(&registry)));

        // Spawn the HTTP API server.
        let api_addr: SocketAddr =
            format!("{}:{}", self.config.api.listen_addr, self.config.api.port).parse()?;
        let api_state = Arc::clone(&node_state);
        tokio::spawn(async move {
            if let Err(e) = crate::api::start_api_server(api_addr, api_state).await {
                tracing::error!(error = %e, "HTTP API server error");
            }
        });

        self.registry = Some(registry);
        self.storage = Some(Arc::new(storage));
        self.node_state = Some(node_state);
        self.command_rx = Some(command_rx);

        Ok(())
    }

    /// Run the node's main event loop, applying and persisting mutations
    /// one at a time in arrival order.
    pub async fn run(&mut self) -> Result<()> {
        let mut command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;
        let registry = self
            .registry
            .clone()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;
        let storage = self
            .storage
            .clone()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;

        tracing::info!("entering main event loop");

        while let Some(cmd) = command_rx.recv().await {
            Self::handle_command(cmd, &registry, &storage);
        }

        tracing::info!("command channel closed");
        Ok(())
    }

    /// Gracefully shut down the node.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down Attesta node");

        self.node_state = None;
        self.command_rx = None;
        self.registry = None;

        if let Some(storage) = self.storage.take() {
            drop(storage);
            tracing::info!("storage closed");
        }

        tracing::info!("Attesta node shut down");
        Ok(())
    }

    /// The node's owner principal.
    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    /// The registry, once started.
    pub fn registry(&self) -> Option<Arc<IdentityRegistry>> {
        self.registry.clone()
    }

    /// Apply one command to the registry and persist the audit entry
    /// before replying.
    fn handle_command(cmd: NodeCommand, registry: &IdentityRegistry, storage: &Storage) {
        match cmd {
            NodeCommand::Register {
                caller,
                commitment,
                reply,
            } => {
                let result = registry
                    .register(&caller, commitment)
                    .map_err(CommandError::from)
                    .and_then(|entry| Self::persist(storage, entry.seq, "registered", &entry));
                let _ = reply.send(result);
            }
            NodeCommand::Verify {
                caller,
                commitment,
                reply,
            } => {
                let result = registry
                    .verify(&caller, commitment)
                    .map_err(CommandError::from)
                    .and_then(|entry| Self::persist(storage, entry.seq, "verified", &entry));
                let _ = reply.send(result);
            }
            NodeCommand::Revoke {
                caller,
                commitment,
                reason,
                reply,
            } => {
                let result = registry
                    .revoke(&caller, commitment, &reason)
                    .map_err(CommandError::from)
                    .and_then(|entry| Self::persist(storage, entry.seq, "revoked", &entry));
                let _ = reply.send(result);
            }
            NodeCommand::AddVerifier {
                caller,
                target,
                reply,
            } => {
                let result = registry
                    .add_verifier(&caller, &target)
                    .map_err(CommandError::from)
                    .and_then(|entry| Self::persist(storage, entry.seq, "verifier_added", &entry));
                let _ = reply.send(result);
            }
            NodeCommand::RemoveVerifier {
                caller,
                target,
                reply,
            } => {
                let result = registry
                    .remove_verifier(&caller, &target)
                    .map_err(CommandError::from)
                    .and_then(|entry| {
                        Self::persist(storage, entry.seq, "verifier_removed", &entry)
                    });
                let _ = reply.send(result);
            }
        }
    }

    fn persist(
        storage: &Storage,
        seq: u64,
        status: &str,
        entry: &attesta_core::AuditEntry,
    ) -> Result<MutationResponse, CommandError> {
        match storage.append_entry(entry) {
            Ok(()) => Ok(MutationResponse {
                seq,
                status: status.to_string(),
            }),
            Err(e) => {
                // The in-memory transition was applied but is not durable;
                // the next restart replays only the persisted prefix.
                tracing::error!(seq, error = %e, "failed to persist audit entry");
                Err(CommandError::Storage(e.to_string()))
            }
        }
    }
}
