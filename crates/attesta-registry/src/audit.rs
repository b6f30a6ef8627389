use std::collections::HashSet;

use attesta_core::{AuditEntry, AuditEvent, Principal};

/// Append-only log of accepted transitions.
///
/// Entries are numbered densely from 0 in mutation order. The log is never
/// truncated or reordered; it is the durable record the node persists and
/// the replay source for derived views.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, assigning it the next sequence number.
    pub fn append(&mut self, event: AuditEvent) -> AuditEntry {
        let entry = AuditEntry {
            seq: self.entries.len() as u64,
            event,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Re-insert a previously persisted entry during restore. The entry's
    /// sequence number must be the next expected one.
    pub(crate) fn push_restored(&mut self, entry: AuditEntry) -> bool {
        if entry.seq != self.entries.len() as u64 {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// All entries, in order.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries with a sequence number strictly greater than `seq`.
    /// Used by feed consumers resuming from a known position.
    pub fn entries_after(&self, seq: u64) -> Vec<AuditEntry> {
        let start = seq.saturating_add(1).min(self.entries.len() as u64) as usize;
        self.entries[start..].to_vec()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reconstruct the explicitly-flagged verifier set by replaying role events.
///
/// This is the derivation external observers use instead of querying the
/// registry's flag state directly. Note it yields the *flagged* set only —
/// the owner is a verifier by capability union whether or not it appears
/// here.
pub fn verifier_set_from_entries(entries: &[AuditEntry]) -> HashSet<Principal> {
    let mut set = HashSet::new();
    for entry in entries {
        match &entry.event {
            AuditEvent::VerifierAdded { verifier, .. } => {
                set.insert(verifier.clone());
            }
            AuditEvent::VerifierRemoved { verifier, .. } => {
                set.remove(verifier);
            }
            _ => {}
        }
    }
    set
}
