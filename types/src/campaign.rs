//! Campaigns: time-boxed voting events with registered voters and candidates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{Address, ContentHash, Timestamp};

/// On-chain campaign identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub u64);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a campaign sits in its lifecycle relative to a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignPhase {
    /// Start date not reached yet; registration is open.
    Upcoming,
    /// Between start and end; votes are accepted.
    Active,
    /// Past the end date but upkeep has not closed it yet.
    Ended,
    /// Closed by the contract; the winner is final.
    Closed,
}

impl CampaignPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Closed => "closed",
        }
    }
}

/// A normalized copy of a campaign as returned by the contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub is_closed: bool,
    pub winner: Option<Address>,
    /// IPFS hash of the [`CampaignMetadata`] document.
    pub details_hash: String,
    pub voters: Vec<Address>,
    pub candidates: Vec<Address>,
    /// Votes per candidate.
    pub tallies: BTreeMap<Address, u64>,
}

impl Campaign {
    pub fn phase(&self, now: Timestamp) -> CampaignPhase {
        if self.is_closed {
            CampaignPhase::Closed
        } else if now < self.start {
            CampaignPhase::Upcoming
        } else if now < self.end {
            CampaignPhase::Active
        } else {
            CampaignPhase::Ended
        }
    }

    pub fn is_voter(&self, account: &Address) -> bool {
        self.voters.contains(account)
    }

    pub fn is_candidate(&self, account: &Address) -> bool {
        self.candidates.contains(account)
    }

    pub fn is_registered(&self, account: &Address) -> bool {
        self.is_voter(account) || self.is_candidate(account)
    }

    pub fn votes_for(&self, candidate: &Address) -> u64 {
        self.tallies.get(candidate).copied().unwrap_or(0)
    }

    pub fn total_votes(&self) -> u64 {
        self.tallies.values().sum()
    }

    /// Candidate with the most votes; ties go to the earlier-registered candidate.
    pub fn leader(&self) -> Option<Address> {
        let mut best: Option<(Address, u64)> = None;
        for candidate in &self.candidates {
            let votes = self.votes_for(candidate);
            match best {
                Some((_, top)) if votes <= top => {}
                _ => best = Some((*candidate, votes)),
            }
        }
        best.filter(|(_, votes)| *votes > 0).map(|(addr, _)| addr)
    }

    pub fn duration_secs(&self) -> u64 {
        self.end.as_secs().saturating_sub(self.start.as_secs())
    }
}

/// Off-chain campaign description pinned to IPFS and referenced by
/// [`Campaign::details_hash`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignMetadata {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hash: Option<ContentHash>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn campaign() -> Campaign {
        Campaign {
            id: CampaignId(1),
            start: Timestamp::new(100),
            end: Timestamp::new(200),
            is_closed: false,
            winner: None,
            details_hash: String::new(),
            voters: vec![addr(1), addr(2)],
            candidates: vec![addr(10), addr(11)],
            tallies: BTreeMap::new(),
        }
    }

    #[test]
    fn phase_follows_dates_and_close_flag() {
        let mut c = campaign();
        assert_eq!(c.phase(Timestamp::new(50)), CampaignPhase::Upcoming);
        assert_eq!(c.phase(Timestamp::new(100)), CampaignPhase::Active);
        assert_eq!(c.phase(Timestamp::new(200)), CampaignPhase::Ended);
        c.is_closed = true;
        assert_eq!(c.phase(Timestamp::new(150)), CampaignPhase::Closed);
    }

    #[test]
    fn leader_breaks_ties_by_registration_order() {
        let mut c = campaign();
        assert_eq!(c.leader(), None);
        c.tallies.insert(addr(11), 3);
        c.tallies.insert(addr(10), 3);
        assert_eq!(c.leader(), Some(addr(10)));
        c.tallies.insert(addr(11), 4);
        assert_eq!(c.leader(), Some(addr(11)));
        assert_eq!(c.total_votes(), 7);
    }

    #[test]
    fn registration_checks() {
        let c = campaign();
        assert!(c.is_voter(&addr(1)));
        assert!(c.is_candidate(&addr(10)));
        assert!(!c.is_registered(&addr(99)));
        assert_eq!(c.duration_secs(), 100);
    }
}
