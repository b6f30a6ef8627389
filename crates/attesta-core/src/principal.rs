use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RegistryError;

/// An externally-authenticated caller identity, e.g. a wallet address or a
/// service account name. The registry only compares principals for
/// equality; it never interprets the contents.
///
/// Serialized as a plain string; deserialization goes through
/// [`Principal::new`] so the non-empty invariant also holds for data read
/// back from disk or the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Principal(String);

impl Principal {
    /// Create a principal. The identifier must be non-empty.
    pub fn new(id: impl Into<String>) -> Result<Self, RegistryError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RegistryError::InvalidPrincipal(id));
        }
        Ok(Self(id))
    }

    /// Get the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Principal {
    type Error = RegistryError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
