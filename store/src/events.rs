//! Change notifications for views subscribed to the store.

use votechain_types::{Address, CampaignId};

use crate::notifications::Notification;

/// Something in the store changed and dependent views should re-render.
#[derive(Clone, Debug)]
pub enum StoreEvent {
    AccountChanged(Option<Address>),
    ProfileUpdated(Address),
    CampaignsListed,
    CampaignUpdated(CampaignId),
    CampaignRemoved(CampaignId),
    VoteRecorded {
        campaign: CampaignId,
        voter: Address,
    },
    VerificationQueueChanged,
    DashboardUpdated,
    Notified(Notification),
    AccountStateCleared,
}

/// Synchronous fan-out of [`StoreEvent`]s.
///
/// Listeners run inline while the store is being mutated; they must not try
/// to lock the store again.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&StoreEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StoreEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &StoreEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
