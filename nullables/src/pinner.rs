//! Nullable pinning service — records uploads, returns deterministic hashes.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use votechain_ipfs::{IpfsError, PinningService};
use votechain_types::ContentHash;

const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A pinned upload, kept for assertions.
#[derive(Clone, Debug, PartialEq)]
pub enum Pinned {
    File { name: String, bytes: Vec<u8> },
    Json { name: String, value: serde_json::Value },
}

#[derive(Default)]
pub struct NullPinner {
    pinned: Mutex<Vec<(ContentHash, Pinned)>>,
    counter: AtomicU64,
    failing: AtomicBool,
}

impl NullPinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail until switched back.
    pub fn fail_uploads(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    pub fn pinned(&self) -> Vec<(ContentHash, Pinned)> {
        self.pinned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up a pinned JSON document by hash.
    pub fn json(&self, hash: &ContentHash) -> Option<serde_json::Value> {
        self.pinned().into_iter().find_map(|(h, p)| match p {
            Pinned::Json { value, .. } if &h == hash => Some(value),
            _ => None,
        })
    }

    fn record(&self, item: Pinned) -> Result<ContentHash, IpfsError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(IpfsError::Unreachable("pinning disabled".into()));
        }
        let hash = fake_cid(self.counter.fetch_add(1, Ordering::SeqCst));
        self.pinned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((hash.clone(), item));
        Ok(hash)
    }
}

/// A well-formed CIDv0 unique to `n`.
pub fn fake_cid(mut n: u64) -> ContentHash {
    let mut body = [b'1'; 44];
    for slot in body.iter_mut().rev() {
        *slot = BASE58[(n % 58) as usize];
        n /= 58;
        if n == 0 {
            break;
        }
    }
    let raw = format!("Qm{}", String::from_utf8_lossy(&body));
    ContentHash::parse(&raw).unwrap_or_else(|_| unreachable!("base58 body is always valid"))
}

impl PinningService for NullPinner {
    async fn pin_file(&self, name: &str, bytes: Vec<u8>) -> Result<ContentHash, IpfsError> {
        if bytes.is_empty() {
            return Err(IpfsError::EmptyUpload);
        }
        self.record(Pinned::File {
            name: name.to_string(),
            bytes,
        })
    }

    async fn pin_json(&self, name: &str, value: &serde_json::Value) -> Result<ContentHash, IpfsError> {
        self.record(Pinned::Json {
            name: name.to_string(),
            value: value.clone(),
        })
    }

    async fn fetch_json(&self, hash: &ContentHash) -> Result<serde_json::Value, IpfsError> {
        self.json(hash)
            .ok_or_else(|| IpfsError::RequestFailed(format!("HTTP status 404 for {hash}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_cids_are_distinct_and_valid() {
        let a = fake_cid(0);
        let b = fake_cid(57);
        let c = fake_cid(58);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(a.as_str().len(), 46);
    }

    #[tokio::test]
    async fn failure_switch() {
        let p = NullPinner::new();
        p.fail_uploads(true);
        assert!(p.pin_file("a", vec![1]).await.is_err());
        p.fail_uploads(false);
        let h = p.pin_json("meta", &serde_json::json!({"title": "x"})).await.unwrap();
        assert_eq!(p.json(&h), Some(serde_json::json!({"title": "x"})));
    }
}
