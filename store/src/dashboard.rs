//! Admin dashboard figures derived from the cached campaigns.

use serde::Serialize;

use votechain_types::{Campaign, CampaignPhase, Timestamp};

use crate::status::AsyncState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_campaigns: usize,
    pub active: usize,
    pub upcoming: usize,
    /// Past their end date but not yet closed by upkeep.
    pub awaiting_close: usize,
    pub closed: usize,
    pub total_votes: u64,
    pub pending_verifications: usize,
}

impl DashboardStats {
    pub fn compute<'a>(
        campaigns: impl IntoIterator<Item = &'a Campaign>,
        pending_verifications: usize,
        now: Timestamp,
    ) -> Self {
        let mut stats = Self {
            pending_verifications,
            ..Self::default()
        };
        for c in campaigns {
            stats.total_campaigns += 1;
            stats.total_votes += c.total_votes();
            match c.phase(now) {
                CampaignPhase::Upcoming => stats.upcoming += 1,
                CampaignPhase::Active => stats.active += 1,
                CampaignPhase::Ended => stats.awaiting_close += 1,
                CampaignPhase::Closed => stats.closed += 1,
            }
        }
        stats
    }
}

#[derive(Clone, Debug, Default)]
pub struct DashboardSlice {
    pub stats: Option<DashboardStats>,
    pub state: AsyncState,
}

impl DashboardSlice {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use votechain_types::{Address, CampaignId};

    fn campaign(id: u64, start: u64, end: u64, closed: bool, votes: u64) -> Campaign {
        let cand = Address::new([1; 20]);
        Campaign {
            id: CampaignId(id),
            start: Timestamp::new(start),
            end: Timestamp::new(end),
            is_closed: closed,
            winner: None,
            details_hash: String::new(),
            voters: Vec::new(),
            candidates: vec![cand],
            tallies: BTreeMap::from([(cand, votes)]),
        }
    }

    #[test]
    fn counts_each_phase() {
        let cs = [
            campaign(1, 200, 300, false, 0),
            campaign(2, 50, 150, false, 4),
            campaign(3, 10, 20, false, 2),
            campaign(4, 10, 20, true, 7),
        ];
        let stats = DashboardStats::compute(&cs, 3, Timestamp::new(100));
        assert_eq!(
            stats,
            DashboardStats {
                total_campaigns: 4,
                active: 1,
                upcoming: 1,
                awaiting_close: 1,
                closed: 1,
                total_votes: 13,
                pending_verifications: 3,
            }
        );
    }
}
