//! Transaction hashes and IPFS content identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// A 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let digits = raw
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidTxHash(raw.to_string()))?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| TypeError::InvalidTxHash(raw.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash(0x{}…)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for TxHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TxHash {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TxHash> for String {
    fn from(h: TxHash) -> Self {
        h.to_string()
    }
}

/// An IPFS content identifier (CIDv0 or CIDv1) returned by a pinning service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BASE32_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz234567";

impl ContentHash {
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let raw = raw.trim();
        if Self::is_cid_v0(raw) || Self::is_cid_v1(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypeError::InvalidContentHash(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_cid_v0(raw: &str) -> bool {
        raw.len() == 46
            && raw.starts_with("Qm")
            && raw.chars().all(|c| BASE58_ALPHABET.contains(c))
    }

    fn is_cid_v1(raw: &str) -> bool {
        raw.len() >= 50
            && raw.starts_with('b')
            && raw[1..].chars().all(|c| BASE32_ALPHABET.contains(c))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentHash {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ContentHash> for String {
    fn from(h: ContentHash) -> Self {
        h.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_hash_display_parse() {
        let h = TxHash::new([0xab; 32]);
        let s = h.to_string();
        assert!(s.starts_with("0xabab"));
        assert_eq!(TxHash::parse(&s).unwrap(), h);
        assert!(TxHash::parse("0xabc").is_err());
    }

    #[test]
    fn accepts_cid_v0() {
        let cid = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
        assert_eq!(ContentHash::parse(cid).unwrap().as_str(), cid);
    }

    #[test]
    fn accepts_cid_v1() {
        let cid = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi";
        assert!(ContentHash::parse(cid).is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(ContentHash::parse("").is_err());
        assert!(ContentHash::parse("not-a-cid").is_err());
        // '0' and 'l' are outside the base58 alphabet.
        assert!(ContentHash::parse("Qm0wAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdl").is_err());
    }
}
