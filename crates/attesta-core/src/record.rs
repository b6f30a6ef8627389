use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::lifecycle::IdentityStatus;
use crate::principal::Principal;

/// The stored record for one registered identity commitment.
///
/// `registered_by` and `registered_at` are set once at registration and
/// never change. The verification and revocation fields are populated only
/// by the corresponding lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub commitment: Commitment,
    pub status: IdentityStatus,
    pub registered_by: Principal,
    pub registered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<Principal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<String>,
}

impl IdentityRecord {
    /// A fresh record in the `Registered` state.
    pub fn new(commitment: Commitment, registered_by: Principal, at: DateTime<Utc>) -> Self {
        Self {
            commitment,
            status: IdentityStatus::Registered,
            registered_by,
            registered_at: at,
            verified_by: None,
            verified_at: None,
            revoked_at: None,
            revocation_reason: None,
        }
    }

    /// Project the record into the public status view.
    ///
    /// The view reports historical flags: a verified-then-revoked record
    /// reads `(registered=true, verified=true, revoked=true)`.
    pub fn status_view(&self) -> StatusView {
        StatusView {
            registered: true,
            verified: self.verified_at.is_some(),
            revoked: self.status == IdentityStatus::Revoked,
            revoked_at: self.revoked_at,
            revocation_reason: self.revocation_reason.clone(),
        }
    }
}

/// The answer to a status query. Unknown commitments yield all-false
/// flags with no timestamps — the query itself never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub registered: bool,
    pub verified: bool,
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<String>,
}

impl StatusView {
    /// The view for a commitment with no record.
    pub fn unregistered() -> Self {
        Self::default()
    }
}
