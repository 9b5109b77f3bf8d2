//! Admin dashboard and upkeep.

use votechain_gateway::{ContractGateway, TxOutcome};
use votechain_ipfs::PinningService;
use votechain_store::{DashboardStats, NotificationLevel, StoreEvent};
use votechain_types::{CampaignId, Clock};

use crate::client::VotingClient;
use crate::ClientError;

impl<G, P, C> VotingClient<G, P, C>
where
    G: ContractGateway,
    P: PinningService,
    C: Clock,
{
    /// Refresh campaigns and the review queue, then recompute the figures.
    pub async fn refresh_dashboard(&self) -> Result<DashboardStats, ClientError> {
        self.with_store(|s| s.dashboard.state.begin());
        let result = async {
            self.fetch_campaigns().await?;
            self.fetch_pending_verifications().await?;
            Ok::<_, ClientError>(())
        }
        .await;
        if let Err(e) = result {
            // The failing fetch has already notified.
            self.with_store(|s| s.dashboard.state.fail(e.user_message()));
            return Err(e);
        }
        let now = self.now();
        let stats = self.with_store(|s| {
            let stats =
                DashboardStats::compute(s.campaigns.all(), s.verification.pending_count(), now);
            s.dashboard.stats = Some(stats);
            s.dashboard.state.succeed();
            s.emit(StoreEvent::DashboardUpdated);
            stats
        });
        Ok(stats)
    }

    /// Close the campaign the contract reports as due, if any.
    pub async fn run_upkeep(&self) -> Result<Option<(CampaignId, TxOutcome)>, ClientError> {
        let result = async {
            let Some(id) = self.read(self.gateway.check_upkeep()).await? else {
                return Ok(None);
            };
            self.ensure_contract().await?;
            let outcome = self
                .submit("performUpkeep", self.gateway.perform_upkeep(id))
                .await?;
            Ok::<_, ClientError>(Some((id, outcome)))
        }
        .await;
        let done = self.settle("run_upkeep", result, |s, msg| {
            s.campaigns.mutation.fail(msg)
        })?;
        if let Some((id, _)) = &done {
            tracing::info!(campaign = %id, "campaign closed by upkeep");
            self.notify(NotificationLevel::Success, format!("Campaign {id} closed"));
            self.refetch_campaign(*id).await;
        }
        Ok(done)
    }
}
