//! Nullable clock: campaign windows driven by the test.

use std::sync::atomic::{AtomicU64, Ordering};

use votechain_types::{Clock, Timestamp};

/// Settable time shared by the client and [`NullGateway`](crate::NullGateway),
/// so date validation and contract date checks agree.
#[derive(Debug, Default)]
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    /// Move forward, e.g. past a campaign's end to make upkeep due.
    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_moves_when_told() {
        let c = NullClock::new(100);
        assert_eq!(c.now().as_secs(), 100);
        c.advance(50);
        assert_eq!(c.now().as_secs(), 150);
        c.set(7);
        assert_eq!(c.now().as_secs(), 7);
    }
}
