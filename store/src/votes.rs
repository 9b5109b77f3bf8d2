//! Vote records mirrored from the contract and the in-flight vote guard.

use std::collections::{HashMap, HashSet};

use votechain_types::{Address, CampaignId, VoteRecord};

use crate::status::AsyncState;

#[derive(Clone, Debug, Default)]
pub struct VoteSlice {
    records: HashMap<(CampaignId, Address), Address>,
    in_flight: HashSet<(CampaignId, Address)>,
    pub state: AsyncState,
}

impl VoteSlice {
    /// The candidate `voter` is known to have chosen in `campaign`.
    pub fn vote_of(&self, campaign: CampaignId, voter: &Address) -> Option<Address> {
        self.records.get(&(campaign, *voter)).copied()
    }

    pub fn has_voted(&self, campaign: CampaignId, voter: &Address) -> bool {
        self.records.contains_key(&(campaign, *voter))
    }

    /// Claim the vote slot for `(campaign, voter)`. Returns `false` if a vote
    /// is already on its way, so the caller must not submit another.
    pub fn begin_vote(&mut self, campaign: CampaignId, voter: Address) -> bool {
        self.in_flight.insert((campaign, voter))
    }

    pub fn end_vote(&mut self, campaign: CampaignId, voter: &Address) {
        self.in_flight.remove(&(campaign, *voter));
    }

    pub fn is_in_flight(&self, campaign: CampaignId, voter: &Address) -> bool {
        self.in_flight.contains(&(campaign, *voter))
    }

    /// Local patch after a confirmed vote; the next refetch supersedes it.
    pub fn mark_vote_cast(&mut self, record: VoteRecord) {
        self.in_flight.remove(&(record.campaign_id, record.voter));
        self.records
            .insert((record.campaign_id, record.voter), record.candidate);
    }

    /// Authoritative value from the contract; `None` removes a stale record.
    pub fn set_record(&mut self, campaign: CampaignId, voter: Address, candidate: Option<Address>) {
        match candidate {
            Some(c) => {
                self.records.insert((campaign, voter), c);
            }
            None => {
                self.records.remove(&(campaign, voter));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.in_flight.clear();
        self.state = AsyncState::default();
    }
}
