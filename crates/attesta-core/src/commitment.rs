use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// An identity commitment: a 32-byte hash binding a real-world identity
/// without revealing it. The registry treats it as an opaque key.
///
/// The all-zero value is reserved as "absent/invalid" and is rejected by
/// every registering operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// The reserved all-zero commitment.
    pub const ZERO: Commitment = Commitment([0u8; 32]);

    /// Wrap raw bytes as a commitment. No validation — use
    /// [`is_well_formed`](Self::is_well_formed) before registering.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// A commitment is well-formed iff it is not the reserved zero value.
    pub fn is_well_formed(&self) -> bool {
        self.0 != [0u8; 32]
    }

    /// Hex encoding without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string. A leading `0x` is tolerated.
    pub fn from_hex(s: &str) -> Result<Self, RegistryError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)
            .map_err(|_| RegistryError::InvalidCommitment(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| RegistryError::InvalidCommitment(s.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for Commitment {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Commitment {
        Commitment::from_bytes([0xAB; 32])
    }

    #[test]
    fn test_zero_is_not_well_formed() {
        assert!(!Commitment::ZERO.is_well_formed());
    }

    #[test]
    fn test_nonzero_is_well_formed() {
        assert!(sample().is_well_formed());
    }

    #[test]
    fn test_hex_roundtrip() {
        let c = sample();
        let parsed = Commitment::from_hex(&c.to_hex()).unwrap();
        assert_eq!(c, parsed);
    }

    #[test]
    fn test_from_hex_with_prefix() {
        let c = sample();
        let parsed = Commitment::from_hex(&format!("0x{}", c.to_hex())).unwrap();
        assert_eq!(c, parsed);
    }

    #[test]
    fn test_from_hex_wrong_length() {
        assert!(Commitment::from_hex("abcd").is_err());
    }

    #[test]
    fn test_from_hex_not_hex() {
        assert!(Commitment::from_hex("zz").is_err());
    }

    #[test]
    fn test_display_has_prefix() {
        let c = Commitment::from_bytes([0x01; 32]);
        let s = format!("{}", c);
        assert!(s.starts_with("0x01"));
        assert_eq!(s.len(), 2 + 64);
    }

    #[test]
    fn test_from_str() {
        let c: Commitment = sample().to_string().parse().unwrap();
        assert_eq!(c, sample());
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = sample();
        let json = serde_json::to_string(&c).unwrap();
        let back: Commitment = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn test_serde_rejects_garbage() {
        let result: Result<Commitment, _> = serde_json::from_str("\"not-a-hash\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_parses_but_is_malformed() {
        // Parsing succeeds so check_status can accept adversarial input;
        // registration rejects it separately.
        let zero = Commitment::from_hex(&"00".repeat(32)).unwrap();
        assert_eq!(zero, Commitment::ZERO);
        assert!(!zero.is_well_formed());
    }
}
