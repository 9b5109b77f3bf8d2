//! EVM account address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// A 20-byte account address, written as `0x` followed by 40 hex digits.
///
/// Parsing is case-insensitive; checksummed (mixed-case) input is accepted
/// without checksum validation. Display is always lowercase.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address, used on the wire to mean "none".
    pub const ZERO: Self = Self([0u8; 20]);

    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Map the zero address to `None`.
    pub fn non_zero(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }

    /// Parse a `0x`-prefixed hex address.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidAddress(raw.to_string()))?;
        if digits.len() != Self::LEN * 2 {
            return Err(TypeError::InvalidAddress(raw.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| TypeError::InvalidAddress(raw.to_string()))?;
        Ok(Self(bytes))
    }

    /// Whether `raw` is a well-formed address string.
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn parses_mixed_case_and_displays_lowercase() {
        let addr = Address::parse(SAMPLE).unwrap();
        assert_eq!(addr.to_string(), SAMPLE.to_lowercase());
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(Address::parse("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea").is_err());
        assert!(Address::parse("0x").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(Address::parse("0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
    }

    #[test]
    fn zero_maps_to_none() {
        assert_eq!(Address::ZERO.non_zero(), None);
        let addr = Address::parse(SAMPLE).unwrap();
        assert_eq!(addr.non_zero(), Some(addr));
    }

    #[test]
    fn serde_uses_string_form() {
        let addr = Address::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE.to_lowercase()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<Address>("\"0x1234\"").is_err());
    }
}
