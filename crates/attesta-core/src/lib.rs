//! Attesta Core — Fundamental types, errors, and the lifecycle state machine
//! for the Attesta identity commitment registry.

pub mod commitment;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod principal;
pub mod record;

pub use commitment::Commitment;
pub use error::RegistryError;
pub use event::{AuditEntry, AuditEvent};
pub use lifecycle::{IdentityStatus, LifecycleEvent, LifecycleStateMachine};
pub use principal::Principal;
pub use record::{IdentityRecord, StatusView};
