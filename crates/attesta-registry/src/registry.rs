use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tokio::sync::broadcast;

use attesta_core::{
    AuditEntry, AuditEvent, Commitment, IdentityRecord, IdentityStatus, LifecycleEvent,
    LifecycleStateMachine, Principal, RegistryError, StatusView,
};

use crate::audit::AuditLog;

/// Capacity of the live audit feed. Slow subscribers that lag past this
/// many entries must fall back to `entries_after` to resynchronize.
const FEED_CAPACITY: usize = 256;

/// All mutable registry state, guarded as one unit so that validation,
/// mutation, and the log append of an operation are a single atomic step.
#[derive(Debug)]
struct Inner {
    identities: HashMap<Commitment, IdentityRecord>,
    verifiers: HashSet<Principal>,
    log: AuditLog,
}

/// The identity commitment registry: role registry, lifecycle engine, and
/// audit log behind one serialization point.
///
/// The owner is fixed at construction and cannot be transferred. Any
/// principal may register a commitment; only verifiers (the flagged set
/// plus the owner, by capability union) may verify or revoke; only the
/// owner may edit the verifier set.
///
/// Mutating operations take the write lock for their whole
/// validate-mutate-append span; if a precondition fails no state changes.
/// Reads take the read lock and observe a committed snapshot, so they may
/// run concurrently with each other.
#[derive(Debug)]
pub struct IdentityRegistry {
    owner: Principal,
    inner: RwLock<Inner>,
    feed: broadcast::Sender<AuditEntry>,
}

impl IdentityRegistry {
    /// Create a registry with a fixed owner and empty state.
    pub fn new(owner: Principal) -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        tracing::info!(owner = %owner, "identity registry created");
        Self {
            owner,
            inner: RwLock::new(Inner {
                identities: HashMap::new(),
                verifiers: HashSet::new(),
                log: AuditLog::new(),
            }),
            feed,
        }
    }

    /// Rebuild a registry from a persisted audit log, preserving the
    /// original actors, timestamps, and sequence numbers.
    pub fn restore(
        owner: Principal,
        entries: Vec<AuditEntry>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new(owner);
        {
            let mut inner = registry.write();
            for entry in entries {
                Self::apply_restored(&mut inner, entry)?;
            }
        }
        tracing::info!(entries = registry.log_len(), "registry restored from audit log");
        Ok(registry)
    }

    // --- Role registry ---

    /// The owner principal, fixed at creation.
    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn is_owner(&self, principal: &Principal) -> bool {
        *principal == self.owner
    }

    /// Capability union: explicitly flagged as verifier, or the owner.
    pub fn is_verifier(&self, principal: &Principal) -> bool {
        self.is_owner(principal) || self.read().verifiers.contains(principal)
    }

    /// Grant the verifier capability. Owner-only; adding an existing
    /// verifier is a no-op success. Every successful call emits a
    /// `VerifierAdded` entry, matching the observed emission behavior.
    pub fn add_verifier(
        &self,
        caller: &Principal,
        target: &Principal,
    ) -> Result<AuditEntry, RegistryError> {
        self.require_owner(caller, "add verifiers")?;

        let mut inner = self.write();
        inner.verifiers.insert(target.clone());
        let entry = inner.log.append(AuditEvent::VerifierAdded {
            owner: caller.clone(),
            verifier: target.clone(),
            at: Utc::now(),
        });
        self.publish(&entry);
        tracing::info!(verifier = %target, seq = entry.seq, "verifier added");
        Ok(entry)
    }

    /// Withdraw the verifier capability. Owner-only; removing a
    /// non-verifier is a no-op success. The owner remains a verifier by
    /// capability union regardless of the flag.
    pub fn remove_verifier(
        &self,
        caller: &Principal,
        target: &Principal,
    ) -> Result<AuditEntry, RegistryError> {
        self.require_owner(caller, "remove verifiers")?;

        let mut inner = self.write();
        inner.verifiers.remove(target);
        let entry = inner.log.append(AuditEvent::VerifierRemoved {
            owner: caller.clone(),
            verifier: target.clone(),
            at: Utc::now(),
        });
        self.publish(&entry);
        tracing::info!(verifier = %target, seq = entry.seq, "verifier removed");
        Ok(entry)
    }

    /// Snapshot of the explicitly-flagged verifier set, sorted for
    /// deterministic output. Does not include the owner unless flagged.
    pub fn verifiers(&self) -> Vec<Principal> {
        let mut list: Vec<Principal> = self.read().verifiers.iter().cloned().collect();
        list.sort();
        list
    }

    // --- Lifecycle engine ---

    /// Register a commitment. Open to any principal; the commitment, not
    /// the caller, is the identity key.
    pub fn register(
        &self,
        caller: &Principal,
        commitment: Commitment,
    ) -> Result<AuditEntry, RegistryError> {
        if !commitment.is_well_formed() {
            return Err(RegistryError::InvalidCommitment(commitment.to_string()));
        }

        let mut inner = self.write();
        if inner.identities.contains_key(&commitment) {
            tracing::debug!(%commitment, caller = %caller, "duplicate registration rejected");
            return Err(RegistryError::AlreadyRegistered(commitment));
        }
        LifecycleStateMachine::transition(None, LifecycleEvent::Register)?;

        let now = Utc::now();
        inner
            .identities
            .insert(commitment, IdentityRecord::new(commitment, caller.clone(), now));
        let entry = inner.log.append(AuditEvent::IdentityRegistered {
            commitment,
            registrant: caller.clone(),
            at: now,
        });
        self.publish(&entry);
        tracing::info!(%commitment, registrant = %caller, seq = entry.seq, "identity registered");
        Ok(entry)
    }

    /// Confirm a registered commitment. Verifier-only.
    ///
    /// A revoked commitment behaves as not-registered here: revocation is
    /// permanent, so re-verification fails with `NotRegistered` even though
    /// the record's history stays queryable.
    pub fn verify(
        &self,
        caller: &Principal,
        commitment: Commitment,
    ) -> Result<AuditEntry, RegistryError> {
        let mut inner = self.write();
        self.require_verifier(&inner, caller, "verify identities")?;

        let status = match inner.identities.get(&commitment) {
            None => return Err(RegistryError::NotRegistered(commitment)),
            Some(r) if r.status == IdentityStatus::Revoked => {
                // Revocation is permanent: the commitment behaves as
                // unregistered for verification purposes.
                return Err(RegistryError::NotRegistered(commitment));
            }
            Some(r) if r.status == IdentityStatus::Verified => {
                return Err(RegistryError::AlreadyVerified(commitment));
            }
            Some(r) => r.status,
        };
        let new_status = LifecycleStateMachine::transition(Some(status), LifecycleEvent::Verify)?;

        let now = Utc::now();
        if let Some(r) = inner.identities.get_mut(&commitment) {
            r.status = new_status;
            r.verified_by = Some(caller.clone());
            r.verified_at = Some(now);
        }
        let entry = inner.log.append(AuditEvent::IdentityVerified {
            commitment,
            verifier: caller.clone(),
            at: now,
        });
        self.publish(&entry);
        tracing::info!(%commitment, verifier = %caller, seq = entry.seq, "identity verified");
        Ok(entry)
    }

    /// Revoke a registered or verified commitment. Verifier-only.
    /// The reason is preserved verbatim, including the empty string.
    pub fn revoke(
        &self,
        caller: &Principal,
        commitment: Commitment,
        reason: &str,
    ) -> Result<AuditEntry, RegistryError> {
        let mut inner = self.write();
        self.require_verifier(&inner, caller, "revoke identities")?;

        let status = match inner.identities.get(&commitment) {
            None => return Err(RegistryError::NotRegistered(commitment)),
            Some(r) if r.status == IdentityStatus::Revoked => {
                return Err(RegistryError::AlreadyRevoked(commitment));
            }
            Some(r) => r.status,
        };
        let new_status = LifecycleStateMachine::transition(Some(status), LifecycleEvent::Revoke)?;

        let now = Utc::now();
        if let Some(r) = inner.identities.get_mut(&commitment) {
            r.status = new_status;
            r.revoked_at = Some(now);
            r.revocation_reason = Some(reason.to_string());
        }
        let entry = inner.log.append(AuditEvent::IdentityRevoked {
            commitment,
            verifier: caller.clone(),
            reason: reason.to_string(),
            at: now,
        });
        self.publish(&entry);
        tracing::info!(%commitment, verifier = %caller, seq = entry.seq, reason, "identity revoked");
        Ok(entry)
    }

    /// Pure status query. Never fails and never mutates — unknown or
    /// malformed commitments (including the zero value) yield the all-false
    /// view.
    pub fn check_status(&self, commitment: Commitment) -> StatusView {
        self.read()
            .identities
            .get(&commitment)
            .map(IdentityRecord::status_view)
            .unwrap_or_else(StatusView::unregistered)
    }

    /// Full record snapshot, if the commitment is registered.
    pub fn record(&self, commitment: Commitment) -> Option<IdentityRecord> {
        self.read().identities.get(&commitment).cloned()
    }

    /// Number of registered commitments (any status).
    pub fn len(&self) -> usize {
        self.read().identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().identities.is_empty()
    }

    // --- Audit feed ---

    /// Subscribe to the live audit feed. Entries accepted after this call
    /// are delivered in mutation order.
    pub fn subscribe(&self) -> broadcast::Receiver<AuditEntry> {
        self.feed.subscribe()
    }

    /// Snapshot of the full audit log.
    pub fn replay(&self) -> Vec<AuditEntry> {
        self.read().log.entries().to_vec()
    }

    /// Audit entries with a sequence number strictly greater than `seq`.
    pub fn entries_after(&self, seq: u64) -> Vec<AuditEntry> {
        self.read().log.entries_after(seq)
    }

    /// Number of audit entries.
    pub fn log_len(&self) -> usize {
        self.read().log.len()
    }

    // --- internals ---

    fn require_owner(
        &self,
        caller: &Principal,
        action: &'static str,
    ) -> Result<(), RegistryError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            tracing::warn!(principal = %caller, action, "unauthorized owner operation");
            Err(RegistryError::Unauthorized {
                principal: caller.clone(),
                action,
            })
        }
    }

    /// Capability check against the same guard that will commit the
    /// transition, so a concurrent `remove_verifier` cannot land between
    /// the check and the mutation.
    fn require_verifier(
        &self,
        inner: &Inner,
        caller: &Principal,
        action: &'static str,
    ) -> Result<(), RegistryError> {
        if self.is_owner(caller) || inner.verifiers.contains(caller) {
            Ok(())
        } else {
            tracing::warn!(principal = %caller, action, "unauthorized verifier operation");
            Err(RegistryError::Unauthorized {
                principal: caller.clone(),
                action,
            })
        }
    }

    /// Re-apply one persisted entry during restore. Uses the recorded
    /// actors and timestamps instead of the clock, and does not publish to
    /// the live feed.
    fn apply_restored(inner: &mut Inner, entry: AuditEntry) -> Result<(), RegistryError> {
        let event = entry.event.clone();
        if !inner.log.push_restored(entry) {
            return Err(RegistryError::CorruptAuditLog(
                "audit entries out of sequence".into(),
            ));
        }

        match event {
            AuditEvent::IdentityRegistered {
                commitment,
                registrant,
                at,
            } => {
                if inner.identities.contains_key(&commitment) {
                    return Err(RegistryError::CorruptAuditLog(format!(
                        "duplicate registration of {commitment} in log"
                    )));
                }
                inner
                    .identities
                    .insert(commitment, IdentityRecord::new(commitment, registrant, at));
            }
            AuditEvent::IdentityVerified {
                commitment,
                verifier,
                at,
            } => {
                let record = inner.identities.get_mut(&commitment).ok_or_else(|| {
                    RegistryError::CorruptAuditLog(format!(
                        "verification of unregistered {commitment} in log"
                    ))
                })?;
                record.status =
                    LifecycleStateMachine::transition(Some(record.status), LifecycleEvent::Verify)?;
                record.verified_by = Some(verifier);
                record.verified_at = Some(at);
            }
            AuditEvent::IdentityRevoked {
                commitment,
                reason,
                at,
                ..
            } => {
                let record = inner.identities.get_mut(&commitment).ok_or_else(|| {
                    RegistryError::CorruptAuditLog(format!(
                        "revocation of unregistered {commitment} in log"
                    ))
                })?;
                record.status =
                    LifecycleStateMachine::transition(Some(record.status), LifecycleEvent::Revoke)?;
                record.revoked_at = Some(at);
                record.revocation_reason = Some(reason);
            }
            AuditEvent::VerifierAdded { verifier, .. } => {
                inner.verifiers.insert(verifier);
            }
            AuditEvent::VerifierRemoved { verifier, .. } => {
                inner.verifiers.remove(&verifier);
            }
        }
        Ok(())
    }

    fn publish(&self, entry: &AuditEntry) {
        // Send fails only when there are no subscribers, which is fine.
        let _ = self.feed.send(entry.clone());
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
