//! Shared argument groups and HTTP helpers for the remote commands.

use clap::Args;
use serde::Deserialize;

use attesta_core::Commitment;

/// Salt mixed into client-side commitment hashing, matching the value the
/// registration front-end bakes in. Override with `--salt` if your
/// deployment uses its own.
pub const DEFAULT_SALT: &str = "IdentityVerificationSystem2025";

/// How the user names a commitment: directly as hex, or derived from the
/// identity fields the way the registration form computes it.
#[derive(Args, Debug)]
pub struct CommitmentArgs {
    /// Commitment hash (64 hex chars, 0x prefix optional).
    #[arg(long, conflicts_with_all = ["name", "document"])]
    pub commitment: Option<String>,

    /// Full name, hashed together with --document and the salt.
    #[arg(long, requires = "document")]
    pub name: Option<String>,

    /// Document ID, hashed together with --name and the salt.
    #[arg(long, requires = "name")]
    pub document: Option<String>,

    /// Salt for client-side hashing.
    #[arg(long, default_value = DEFAULT_SALT)]
    pub salt: String,
}

impl CommitmentArgs {
    /// Resolve to a commitment, hashing the identity fields if no hex
    /// value was given.
    pub fn resolve(&self) -> anyhow::Result<Commitment> {
        if let Some(ref hex) = self.commitment {
            return Ok(Commitment::from_hex(hex)?);
        }
        match (&self.name, &self.document) {
            (Some(name), Some(document)) => {
                Ok(commitment_from_fields(name, document, &self.salt))
            }
            _ => anyhow::bail!("provide either --commitment or both --name and --document"),
        }
    }

    /// Whether the commitment was derived from identity fields rather
    /// than supplied as hex.
    pub fn is_derived(&self) -> bool {
        self.commitment.is_none()
    }
}

/// Compute a commitment as BLAKE3(name ‖ document ‖ salt). The registry
/// only ever sees the resulting opaque hash, never the fields.
pub fn commitment_from_fields(name: &str, document: &str, salt: &str) -> Commitment {
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(document.as_bytes());
    hasher.update(salt.as_bytes());
    Commitment::from_bytes(*hasher.finalize().as_bytes())
}

#[derive(Deserialize)]
pub struct MutationResponse {
    pub seq: u64,
    pub status: String,
}

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST a mutation and decode the reply, surfacing the server's error
/// string on failure.
pub async fn post_mutation(
    endpoint: &str,
    path: &str,
    body: serde_json::Value,
) -> anyhow::Result<MutationResponse> {
    let url = format!("{endpoint}{path}");
    let resp = reqwest::Client::new().post(&url).json(&body).send().await?;

    if resp.status().is_success() {
        Ok(resp.json().await?)
    } else {
        let status = resp.status();
        let error = resp
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|_| "unknown error".into());
        anyhow::bail!("node returned HTTP {status}: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_from_fields_deterministic() {
        let a = commitment_from_fields("Alice Santos", "DOC-123", DEFAULT_SALT);
        let b = commitment_from_fields("Alice Santos", "DOC-123", DEFAULT_SALT);
        assert_eq!(a, b);
        assert!(a.is_well_formed());
    }

    #[test]
    fn test_commitment_from_fields_sensitive_to_every_input() {
        let base = commitment_from_fields("Alice", "DOC-1", DEFAULT_SALT);
        assert_ne!(base, commitment_from_fields("Bob", "DOC-1", DEFAULT_SALT));
        assert_ne!(base, commitment_from_fields("Alice", "DOC-2", DEFAULT_SALT));
        assert_ne!(base, commitment_from_fields("Alice", "DOC-1", "other-salt"));
    }

    #[test]
    fn test_resolve_prefers_hex() {
        let args = CommitmentArgs {
            commitment: Some("ab".repeat(32)),
            name: None,
            document: None,
            salt: DEFAULT_SALT.into(),
        };
        let c = args.resolve().unwrap();
        assert_eq!(c, Commitment::from_bytes([0xAB; 32]));
        assert!(!args.is_derived());
    }

    #[test]
    fn test_resolve_from_fields() {
        let args = CommitmentArgs {
            commitment: None,
            name: Some("Alice".into()),
            document: Some("DOC-1".into()),
            salt: DEFAULT_SALT.into(),
        };
        assert_eq!(
            args.resolve().unwrap(),
            commitment_from_fields("Alice", "DOC-1", DEFAULT_SALT)
        );
        assert!(args.is_derived());
    }

    #[test]
    fn test_resolve_requires_something() {
        let args = CommitmentArgs {
            commitment: None,
            name: None,
            document: None,
            salt: DEFAULT_SALT.into(),
        };
        assert!(args.resolve().is_err());
    }
}
