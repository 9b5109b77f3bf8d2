//! The single canonical store all coordinators write to.

use votechain_types::Address;

use crate::campaigns::CampaignSlice;
use crate::dashboard::DashboardSlice;
use crate::events::{EventBus, StoreEvent};
use crate::notifications::{NotificationLevel, Notifications};
use crate::user::UserSlice;
use crate::verification::VerificationSlice;
use crate::votes::VoteSlice;

/// Normalized cache of contract state plus transient request status.
///
/// Nothing here is authoritative: every confirmed write is followed by a
/// refetch that overwrites local patches. Wallet handles are never kept here.
#[derive(Debug, Default)]
pub struct Store {
    pub user: UserSlice,
    pub campaigns: CampaignSlice,
    pub votes: VoteSlice,
    pub verification: VerificationSlice,
    pub dashboard: DashboardSlice,
    pub notifications: Notifications,
    events: EventBus,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StoreEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn emit(&self, event: StoreEvent) {
        self.events.emit(&event);
    }

    /// Queue a notification and announce it to subscribers.
    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let id = self.notifications.push(level, message);
        if let Some(n) = self.notifications.iter().find(|n| n.id == id).cloned() {
            self.events.emit(&StoreEvent::Notified(n));
        }
    }

    /// Record a newly connected account. Any state belonging to a different
    /// account is cleared first.
    pub fn set_account(&mut self, account: Address) {
        if self.user.account.is_some_and(|prev| prev != account) {
            self.clear_account_state();
        }
        self.user.account = Some(account);
        self.campaigns.index_account(account);
        self.events.emit(&StoreEvent::AccountChanged(Some(account)));
    }

    pub fn account(&self) -> Option<Address> {
        self.user.account
    }

    /// Drop everything tied to the connected account. Public campaign data
    /// stays cached.
    pub fn clear_account_state(&mut self) {
        tracing::debug!(account = ?self.user.account, "clearing account state");
        self.user.clear();
        self.votes.clear();
        self.verification.own_request = None;
        self.verification.submission = Default::default();
        self.verification.clear_pending();
        self.campaigns.clear_account_cache();
        self.dashboard.clear();
        self.events.emit(&StoreEvent::AccountStateCleared);
        self.events.emit(&StoreEvent::AccountChanged(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use votechain_types::{
        Campaign, CampaignId, RequestedRole, Role, Timestamp, UserDetails, VerificationRequest,
        VerificationStatus, VoteRecord,
    };

    fn populated(account: Address) -> Store {
        let mut s = Store::new();
        s.campaigns.upsert(Campaign {
            id: CampaignId(1),
            start: Timestamp::new(1),
            end: Timestamp::new(2),
            is_closed: false,
            winner: None,
            details_hash: String::new(),
            voters: vec![account],
            candidates: Vec::new(),
            tallies: BTreeMap::new(),
        });
        s.set_account(account);
        s.user.role = Some(Role::Voter);
        s.user.details = Some(UserDetails {
            name: "Ada".into(),
            ..Default::default()
        });
        s.votes.mark_vote_cast(VoteRecord {
            campaign_id: CampaignId(1),
            voter: account,
            candidate: Address::new([9; 20]),
        });
        s.verification.own_request = Some(VerificationRequest {
            requester: account,
            role: RequestedRole::Voter,
            document_hash: String::new(),
            admin_feedback: String::new(),
            status: VerificationStatus::Approved,
        });
        s
    }

    #[test]
    fn clearing_keeps_public_campaigns() {
        let me = Address::new([1; 20]);
        let mut s = populated(me);
        assert_eq!(s.campaigns.for_account().len(), 1);

        s.clear_account_state();
        assert_eq!(s.account(), None);
        assert_eq!(s.user.role, None);
        assert_eq!(s.user.details, None);
        assert!(s.votes.is_empty());
        assert!(s.verification.own_request.is_none());
        assert!(s.campaigns.for_account().is_empty());
        assert_eq!(s.campaigns.len(), 1);
    }

    #[test]
    fn switching_account_drops_previous_profile() {
        let mut s = populated(Address::new([1; 20]));
        s.set_account(Address::new([2; 20]));
        assert_eq!(s.account(), Some(Address::new([2; 20])));
        assert_eq!(s.user.role, None);
        assert_eq!(s.user.details, None);
        assert!(s.votes.is_empty());
    }

    #[test]
    fn reconnecting_same_account_keeps_state() {
        let me = Address::new([1; 20]);
        let mut s = populated(me);
        s.set_account(me);
        assert_eq!(s.user.role, Some(Role::Voter));
    }

    #[test]
    fn subscribers_see_notifications() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut s = Store::new();
        let sink = Arc::clone(&seen);
        s.subscribe(Box::new(move |e| {
            if let StoreEvent::Notified(n) = e {
                sink.lock().unwrap().push(n.message.clone());
            }
        }));
        s.notify(NotificationLevel::Error, "Transaction rejected");
        assert_eq!(*seen.lock().unwrap(), vec!["Transaction rejected".to_string()]);
    }
}
