//! Fixed-interval winner check for a single campaign.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use votechain_gateway::ContractGateway;
use votechain_ipfs::PinningService;
use votechain_store::NotificationLevel;
use votechain_types::{Address, CampaignId, Clock};

use crate::client::VotingClient;

/// Polls until the campaign has a winner, then stops.
///
/// The task also stops on the shutdown signal and when the poller is dropped.
/// Failed polls are logged and retried on the next tick; they never reach the
/// notification queue.
pub struct WinnerPoller {
    campaign: CampaignId,
    winner: watch::Receiver<Option<Address>>,
    handle: JoinHandle<()>,
}

impl WinnerPoller {
    pub fn spawn<G, P, C>(
        client: Arc<VotingClient<G, P, C>>,
        campaign: CampaignId,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Self
    where
        G: ContractGateway + 'static,
        P: PinningService + 'static,
        C: Clock + 'static,
    {
        let (tx, winner) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        tracing::debug!(%campaign, "winner poll cancelled");
                        break;
                    }
                    _ = ticker.tick() => {}
                }
                client.metrics.contract_reads.inc();
                match client.gateway.winner(campaign).await {
                    Ok(Some(w)) => {
                        tracing::info!(%campaign, winner = %w, "winner recorded");
                        client.record_winner(campaign, w);
                        client.notify(
                            NotificationLevel::Info,
                            format!("Campaign {campaign} won by {w}"),
                        );
                        let _ = tx.send(Some(w));
                        break;
                    }
                    Ok(None) => {}
                    Err(e) => tracing::debug!(%campaign, "winner poll failed: {e}"),
                }
            }
        });
        Self {
            campaign,
            winner,
            handle,
        }
    }

    pub fn campaign(&self) -> CampaignId {
        self.campaign
    }

    /// Winner seen so far.
    pub fn winner(&self) -> Option<Address> {
        *self.winner.borrow()
    }

    /// Wait for a winner; `None` if polling stopped without one.
    pub async fn wait(&mut self) -> Option<Address> {
        match self.winner.wait_for(Option::is_some).await {
            Ok(w) => *w,
            Err(_) => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for WinnerPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
