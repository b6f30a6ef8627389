//! Attesta Registry — the authorization and identity-lifecycle engine.
//!
//! [`IdentityRegistry`] owns all mutable state: the commitment records, the
//! verifier capability flags, and the append-only audit log. Every mutation
//! goes through it, behind a single serialization point, and appends one
//! audit entry atomically with the state change.

pub mod audit;
pub mod registry;

pub use audit::{verifier_set_from_entries, AuditLog};
pub use registry::IdentityRegistry;
