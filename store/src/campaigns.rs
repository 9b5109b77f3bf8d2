//! Campaigns keyed by id.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use votechain_types::{Address, Campaign, CampaignId, CampaignMetadata, CampaignPhase, Timestamp};

use crate::status::AsyncState;

#[derive(Clone, Debug, Default)]
pub struct CampaignSlice {
    entities: BTreeMap<CampaignId, Campaign>,
    metadata: BTreeMap<CampaignId, CampaignMetadata>,
    details: HashMap<CampaignId, AsyncState>,
    /// Campaigns the connected account is registered in, derived from `entities`.
    by_account: Option<(Address, BTreeSet<CampaignId>)>,
    pub listing: AsyncState,
    pub mutation: AsyncState,
}

impl CampaignSlice {
    pub fn get(&self, id: CampaignId) -> Option<&Campaign> {
        self.entities.get(&id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Campaign> {
        self.entities.values()
    }

    pub fn ids(&self) -> Vec<CampaignId> {
        self.entities.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn in_phase(&self, phase: CampaignPhase, now: Timestamp) -> Vec<&Campaign> {
        self.entities
            .values()
            .filter(|c| c.phase(now) == phase)
            .collect()
    }

    /// Per-campaign fetch status.
    pub fn detail_state(&self, id: CampaignId) -> AsyncState {
        self.details.get(&id).cloned().unwrap_or_default()
    }

    pub fn detail_state_mut(&mut self, id: CampaignId) -> &mut AsyncState {
        self.details.entry(id).or_default()
    }

    /// Insert or replace one campaign without touching the others.
    pub fn upsert(&mut self, campaign: Campaign) {
        let id = campaign.id;
        self.entities.insert(id, campaign);
        self.refresh_index_for(id);
    }

    /// Apply a full listing: upsert every fetched campaign and drop ids the
    /// contract no longer lists. `listed` is the id set the contract reported;
    /// campaigns whose detail fetch failed are kept if they were cached.
    pub fn reconcile_listing(&mut self, listed: &[CampaignId], fetched: Vec<Campaign>) {
        let keep: BTreeSet<CampaignId> = listed.iter().copied().collect();
        let stale: Vec<CampaignId> = self
            .entities
            .keys()
            .filter(|id| !keep.contains(id))
            .copied()
            .collect();
        for id in stale {
            self.remove(id);
        }
        for campaign in fetched {
            self.upsert(campaign);
        }
    }

    pub fn remove(&mut self, id: CampaignId) -> Option<Campaign> {
        self.metadata.remove(&id);
        self.details.remove(&id);
        if let Some((_, ids)) = &mut self.by_account {
            ids.remove(&id);
        }
        self.entities.remove(&id)
    }

    pub fn metadata(&self, id: CampaignId) -> Option<&CampaignMetadata> {
        self.metadata.get(&id)
    }

    pub fn set_metadata(&mut self, id: CampaignId, metadata: CampaignMetadata) {
        self.metadata.insert(id, metadata);
    }

    /// Start tracking which campaigns `account` takes part in.
    pub fn index_account(&mut self, account: Address) {
        let ids = self
            .entities
            .values()
            .filter(|c| c.is_registered(&account))
            .map(|c| c.id)
            .collect();
        self.by_account = Some((account, ids));
    }

    pub fn for_account(&self) -> Vec<&Campaign> {
        match &self.by_account {
            Some((_, ids)) => ids.iter().filter_map(|id| self.entities.get(id)).collect(),
            None => Vec::new(),
        }
    }

    pub fn clear_account_cache(&mut self) {
        self.by_account = None;
    }

    fn refresh_index_for(&mut self, id: CampaignId) {
        let Some((account, ids)) = &mut self.by_account else {
            return;
        };
        match self.entities.get(&id) {
            Some(c) if c.is_registered(account) => {
                ids.insert(id);
            }
            _ => {
                ids.remove(&id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn campaign(id: u64, voters: Vec<Address>) -> Campaign {
        Campaign {
            id: CampaignId(id),
            start: Timestamp::new(100),
            end: Timestamp::new(200),
            is_closed: false,
            winner: None,
            details_hash: String::new(),
            voters,
            candidates: Vec::new(),
            tallies: BTreeMap::new(),
        }
    }

    #[test]
    fn upsert_leaves_other_entries_alone() {
        let mut s = CampaignSlice::default();
        s.upsert(campaign(1, vec![]));
        s.upsert(campaign(2, vec![]));
        let mut updated = campaign(1, vec![]);
        updated.is_closed = true;
        s.upsert(updated);
        assert!(s.get(CampaignId(1)).unwrap().is_closed);
        assert!(!s.get(CampaignId(2)).unwrap().is_closed);
    }

    #[test]
    fn listing_prunes_delisted_ids_only() {
        let mut s = CampaignSlice::default();
        s.upsert(campaign(1, vec![]));
        s.upsert(campaign(2, vec![]));
        s.upsert(campaign(3, vec![]));
        // 3 was listed but its detail fetch failed; it survives.
        s.reconcile_listing(&[CampaignId(1), CampaignId(3)], vec![campaign(1, vec![])]);
        assert_eq!(s.ids(), vec![CampaignId(1), CampaignId(3)]);
    }

    #[test]
    fn account_index_follows_upserts() {
        let me = Address::new([7; 20]);
        let mut s = CampaignSlice::default();
        s.upsert(campaign(1, vec![me]));
        s.upsert(campaign(2, vec![]));
        s.index_account(me);
        assert_eq!(s.for_account().len(), 1);

        s.upsert(campaign(2, vec![me]));
        assert_eq!(s.for_account().len(), 2);

        s.remove(CampaignId(1));
        assert_eq!(s.for_account().len(), 1);

        s.clear_account_cache();
        assert!(s.for_account().is_empty());
    }

    #[test]
    fn detail_state_defaults_to_idle() {
        let mut s = CampaignSlice::default();
        assert!(!s.detail_state(CampaignId(9)).is_pending());
        s.detail_state_mut(CampaignId(9)).begin();
        assert!(s.detail_state(CampaignId(9)).is_pending());
    }
}
