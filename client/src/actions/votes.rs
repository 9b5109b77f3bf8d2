//! Casting votes and reading results.

use votechain_gateway::{ContractGateway, GatewayError, TxOutcome};
use votechain_ipfs::PinningService;
use votechain_store::{NotificationLevel, StoreEvent};
use votechain_types::{Address, CampaignId, CampaignPhase, Clock, VoteRecord};

use crate::client::VotingClient;
use crate::ClientError;

impl<G, P, C> VotingClient<G, P, C>
where
    G: ContractGateway,
    P: PinningService,
    C: Clock,
{
    /// Vote for `candidate` in campaign `id`.
    ///
    /// Refused before any transaction when the cache already records a vote
    /// by this account or the same vote is still in flight. A contract
    /// rejection despite a stale cache is reported like any other failure.
    pub async fn vote(&self, id: CampaignId, candidate: Address) -> Result<TxOutcome, ClientError> {
        self.with_store(|s| s.votes.state.begin());
        let result = self.vote_inner(id, candidate).await;
        let outcome = self.settle("vote", result, |s, msg| s.votes.state.fail(msg))?;
        self.with_store(|s| s.votes.state.succeed());
        self.notify(NotificationLevel::Success, format!("Vote cast in campaign {id}"));
        self.refetch_listing().await;
        Ok(outcome)
    }

    async fn vote_inner(&self, id: CampaignId, candidate: Address) -> Result<TxOutcome, ClientError> {
        let voter = self.account()?;
        let now = self.now();
        self.with_store(|s| {
            if s.votes.has_voted(id, &voter) {
                return Err(ClientError::AlreadyVoted(id));
            }
            if let Some(c) = s.campaigns.get(id) {
                if c.phase(now) != CampaignPhase::Active {
                    return Err(ClientError::Validation(format!(
                        "campaign {id} is {}",
                        c.phase(now).as_str()
                    )));
                }
                if !c.is_candidate(&candidate) {
                    return Err(ClientError::Validation(format!(
                        "{candidate} is not a candidate in campaign {id}"
                    )));
                }
            }
            if !s.votes.begin_vote(id, voter) {
                return Err(ClientError::VoteInFlight(id));
            }
            Ok(())
        })
        .map_err(|e| self.blocked(e))?;

        let result = async {
            self.ensure_contract().await?;
            self.submit("vote", self.gateway.vote(id, candidate)).await
        }
        .await;

        let reverted = matches!(
            result,
            Err(ClientError::Gateway(GatewayError::Reverted { .. }))
        );
        match &result {
            Ok(outcome) => {
                tracing::info!(campaign = %id, %candidate, tx = %outcome.tx_hash, "vote confirmed");
                self.with_store(|s| {
                    s.votes.mark_vote_cast(VoteRecord {
                        campaign_id: id,
                        voter,
                        candidate,
                    });
                    s.emit(StoreEvent::VoteRecorded {
                        campaign: id,
                        voter,
                    });
                });
            }
            Err(_) => self.with_store(|s| s.votes.end_vote(id, &voter)),
        }
        if reverted {
            // The cache may be stale; learn what the contract holds.
            if let Ok(choice) = self.read(self.gateway.vote_of(id, voter)).await {
                self.with_store(|s| s.votes.set_record(id, voter, choice));
            }
        }
        result
    }

    /// Read the recorded winner of a closed campaign.
    pub async fn fetch_winner(&self, id: CampaignId) -> Result<Option<Address>, ClientError> {
        let result = self.read(self.gateway.winner(id)).await;
        let winner = self.settle("fetch_winner", result, |s, msg| {
            s.campaigns.detail_state_mut(id).fail(msg)
        })?;
        if let Some(w) = winner {
            self.record_winner(id, w);
        }
        Ok(winner)
    }

    /// Patch the cached campaign with its winner until the next refetch.
    pub(crate) fn record_winner(&self, id: CampaignId, winner: Address) {
        self.with_store(|s| {
            if let Some(mut c) = s.campaigns.get(id).cloned() {
                if c.winner != Some(winner) {
                    c.winner = Some(winner);
                    c.is_closed = true;
                    s.campaigns.upsert(c);
                    s.emit(StoreEvent::CampaignUpdated(id));
                }
            }
        });
    }

    pub fn has_voted(&self, id: CampaignId) -> bool {
        match self.gateway.signer() {
            Some(account) => self.read_store(|s| s.votes.has_voted(id, &account)),
            None => false,
        }
    }
}
