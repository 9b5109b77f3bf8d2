//! Campaign listing, detail, metadata and admin CRUD.

use votechain_gateway::{ContractGateway, CreatedCampaign, TxOutcome};
use votechain_ipfs::PinningService;
use votechain_store::{NotificationLevel, StoreEvent};
use votechain_types::{Address, Campaign, CampaignId, CampaignMetadata, Clock, ContentHash, Role, Timestamp};

use crate::client::VotingClient;
use crate::{validation, ClientError};

/// A file picked by the user for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Input of the create-campaign form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub image: Option<Attachment>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    Voter,
    Candidate,
}

impl Registration {
    fn required_role(self) -> Role {
        match self {
            Self::Voter => Role::Voter,
            Self::Candidate => Role::Candidate,
        }
    }
}

impl<G, P, C> VotingClient<G, P, C>
where
    G: ContractGateway,
    P: PinningService,
    C: Clock,
{
    /// Fetch every campaign the contract lists and reconcile the cache.
    ///
    /// A campaign whose detail fetch fails keeps its cached copy and gets a
    /// per-campaign error; the listing itself still succeeds.
    pub async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, ClientError> {
        self.with_store(|s| s.campaigns.listing.begin());
        let result = self.load_listing().await;
        let result = self.settle("fetch_campaigns", result, |s, msg| {
            s.campaigns.listing.fail(msg)
        });
        if result.is_ok() {
            self.with_store(|s| {
                s.campaigns.listing.succeed();
                s.emit(StoreEvent::CampaignsListed);
            });
        }
        result
    }

    async fn load_listing(&self) -> Result<Vec<Campaign>, ClientError> {
        let ids = self.read(self.gateway.campaign_ids()).await?;
        tracing::debug!(count = ids.len(), "campaign ids listed");

        let mut fetched = Vec::with_capacity(ids.len());
        for id in &ids {
            self.with_store(|s| s.campaigns.detail_state_mut(*id).begin());
            match self.read(self.gateway.campaign(*id)).await {
                Ok(campaign) => {
                    self.with_store(|s| s.campaigns.detail_state_mut(*id).succeed());
                    fetched.push(campaign);
                }
                Err(e) => {
                    tracing::warn!(campaign = %id, "campaign detail fetch failed: {e}");
                    let message = e.user_message();
                    self.with_store(|s| s.campaigns.detail_state_mut(*id).fail(message));
                }
            }
        }

        self.with_store(|s| s.campaigns.reconcile_listing(&ids, fetched.clone()));
        self.sync_own_votes(&fetched).await;
        Ok(fetched)
    }

    /// Fetch one campaign and merge it into the cache.
    pub async fn fetch_campaign(&self, id: CampaignId) -> Result<Campaign, ClientError> {
        self.with_store(|s| s.campaigns.detail_state_mut(id).begin());
        let result = self.read(self.gateway.campaign(id)).await;
        let result = self.settle("fetch_campaign", result, |s, msg| {
            s.campaigns.detail_state_mut(id).fail(msg)
        })?;
        self.with_store(|s| {
            s.campaigns.upsert(result.clone());
            s.campaigns.detail_state_mut(id).succeed();
            s.emit(StoreEvent::CampaignUpdated(id));
        });
        self.sync_own_votes(std::slice::from_ref(&result)).await;
        Ok(result)
    }

    /// Load the pinned title/description of a campaign.
    pub async fn fetch_campaign_metadata(&self, id: CampaignId) -> Result<CampaignMetadata, ClientError> {
        let result = self.load_metadata(id).await;
        let metadata = self.settle("fetch_campaign_metadata", result, |s, msg| {
            s.campaigns.detail_state_mut(id).fail(msg)
        })?;
        self.with_store(|s| {
            s.campaigns.set_metadata(id, metadata.clone());
            s.emit(StoreEvent::CampaignUpdated(id));
        });
        Ok(metadata)
    }

    async fn load_metadata(&self, id: CampaignId) -> Result<CampaignMetadata, ClientError> {
        let cached = self.read_store(|s| s.campaigns.get(id).map(|c| c.details_hash.clone()));
        let details_hash = match cached {
            Some(hash) => hash,
            None => self.read(self.gateway.campaign(id)).await?.details_hash,
        };
        let hash = ContentHash::parse(&details_hash).map_err(|_| {
            ClientError::Validation(format!("campaign {id} has no readable metadata"))
        })?;
        let value = self.pinner.fetch_json(&hash).await?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::Validation(format!("campaign {id} metadata is malformed: {e}")))
    }

    /// Pin the campaign description, create the campaign, and return the
    /// id taken from the `CampaignCreated` event.
    pub async fn create_campaign(&self, draft: CampaignDraft) -> Result<CreatedCampaign, ClientError> {
        self.with_store(|s| s.campaigns.mutation.begin());
        let result = self.create_campaign_inner(draft).await;
        let created = self.settle("create_campaign", result, |s, msg| {
            s.campaigns.mutation.fail(msg)
        })?;
        self.with_store(|s| s.campaigns.mutation.succeed());
        self.notify(
            NotificationLevel::Success,
            format!("Campaign {} created", created.id),
        );
        self.refetch_campaign(created.id).await;
        Ok(created)
    }

    async fn create_campaign_inner(&self, draft: CampaignDraft) -> Result<CreatedCampaign, ClientError> {
        let (hash, metadata) = self.prepare_campaign(&draft).await?;
        let created = self
            .submit(
                "createCampaign",
                self.gateway
                    .create_campaign(draft.start, draft.end, hash.as_str()),
            )
            .await?;
        tracing::info!(campaign = %created.id, tx = %created.tx.tx_hash, "campaign created");
        self.with_store(|s| s.campaigns.set_metadata(created.id, metadata));
        Ok(created)
    }

    /// Change the window and description of a campaign that has not started.
    pub async fn update_campaign(&self, id: CampaignId, draft: CampaignDraft) -> Result<TxOutcome, ClientError> {
        self.with_store(|s| s.campaigns.mutation.begin());
        let result = async {
            let (hash, metadata) = self.prepare_campaign(&draft).await?;
            let outcome = self
                .submit(
                    "updateCampaign",
                    self.gateway
                        .update_campaign(id, draft.start, draft.end, hash.as_str()),
                )
                .await?;
            self.with_store(|s| s.campaigns.set_metadata(id, metadata));
            Ok::<_, ClientError>(outcome)
        }
        .await;
        let outcome = self.settle("update_campaign", result, |s, msg| {
            s.campaigns.mutation.fail(msg)
        })?;
        self.with_store(|s| s.campaigns.mutation.succeed());
        self.notify(NotificationLevel::Success, format!("Campaign {id} updated"));
        self.refetch_campaign(id).await;
        Ok(outcome)
    }

    pub async fn delete_campaign(&self, id: CampaignId) -> Result<TxOutcome, ClientError> {
        self.with_store(|s| s.campaigns.mutation.begin());
        let result = async {
            self.ensure_admin().await?;
            self.submit("deleteCampaign", self.gateway.delete_campaign(id))
                .await
        }
        .await;
        let outcome = self.settle("delete_campaign", result, |s, msg| {
            s.campaigns.mutation.fail(msg)
        })?;
        self.with_store(|s| {
            s.campaigns.mutation.succeed();
            s.campaigns.remove(id);
            s.emit(StoreEvent::CampaignRemoved(id));
        });
        self.notify(NotificationLevel::Success, format!("Campaign {id} deleted"));
        self.refetch_listing().await;
        Ok(outcome)
    }

    /// Register the connected account as a voter or candidate.
    pub async fn register_for_campaign(
        &self,
        id: CampaignId,
        kind: Registration,
    ) -> Result<TxOutcome, ClientError> {
        self.with_store(|s| s.campaigns.mutation.begin());
        let result = self.register_inner(id, kind).await;
        let outcome = self.settle("register_for_campaign", result, |s, msg| {
            s.campaigns.mutation.fail(msg)
        })?;
        self.with_store(|s| s.campaigns.mutation.succeed());
        self.notify(
            NotificationLevel::Success,
            format!("Registered in campaign {id}"),
        );
        self.refetch_campaign(id).await;
        Ok(outcome)
    }

    async fn register_inner(&self, id: CampaignId, kind: Registration) -> Result<TxOutcome, ClientError> {
        let account = self.account()?;
        let (role, cached) = self.read_store(|s| (s.user.role, s.campaigns.get(id).cloned()));
        let needed = kind.required_role();
        if role.is_some_and(|r| r != needed) {
            return Err(self.blocked(ClientError::Validation(format!(
                "only verified {needed}s can register as {needed}"
            ))));
        }
        if let Some(c) = cached {
            if c.is_registered(&account) {
                return Err(self.blocked(ClientError::Validation(format!(
                    "already registered in campaign {id}"
                ))));
            }
        }
        self.ensure_contract().await?;
        match kind {
            Registration::Voter => {
                self.submit("registerAsVoter", self.gateway.register_voter(id))
                    .await
            }
            Registration::Candidate => {
                self.submit("registerAsCandidate", self.gateway.register_candidate(id))
                    .await
            }
        }
    }

    /// Shared by create and update: validate, check admin, pin the metadata.
    async fn prepare_campaign(
        &self,
        draft: &CampaignDraft,
    ) -> Result<(ContentHash, CampaignMetadata), ClientError> {
        validation::required("title", &draft.title)
            .and_then(|()| validation::required("description", &draft.description))
            .and_then(|()| {
                validation::campaign_window(
                    draft.start,
                    draft.end,
                    self.now(),
                    self.config.min_campaign_duration_secs,
                )
            })
            .map_err(|e| self.blocked(e))?;
        self.ensure_admin().await?;

        let image_hash = match &draft.image {
            Some(image) => Some(self.pin_file(&image.name, image.bytes.clone()).await?),
            None => None,
        };
        let metadata = CampaignMetadata {
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            image_hash,
        };
        let value = serde_json::to_value(&metadata)
            .map_err(|e| ClientError::Validation(format!("cannot encode metadata: {e}")))?;
        let hash = self
            .pin_json(&format!("campaign-{}", metadata.title), &value)
            .await?;
        Ok((hash, metadata))
    }

    /// Dependent refetch after a write; failures are logged, not reported,
    /// since the write itself succeeded.
    pub(crate) async fn refetch_campaign(&self, id: CampaignId) {
        match self.read(self.gateway.campaign(id)).await {
            Ok(campaign) => {
                self.with_store(|s| {
                    s.campaigns.upsert(campaign.clone());
                    s.campaigns.detail_state_mut(id).succeed();
                    s.emit(StoreEvent::CampaignUpdated(id));
                });
                self.sync_own_votes(std::slice::from_ref(&campaign)).await;
            }
            Err(e) => tracing::warn!(campaign = %id, "refetch after write failed: {e}"),
        }
    }

    pub(crate) async fn refetch_listing(&self) {
        match self.load_listing().await {
            Ok(_) => self.with_store(|s| {
                s.campaigns.listing.succeed();
                s.emit(StoreEvent::CampaignsListed);
            }),
            Err(e) => tracing::warn!("listing refetch failed: {e}"),
        }
    }

    /// Mirror the connected account's ballots for campaigns it votes in.
    async fn sync_own_votes(&self, campaigns: &[Campaign]) {
        let Some(account) = self.gateway.signer() else {
            return;
        };
        for c in campaigns.iter().filter(|c| c.is_voter(&account)) {
            match self.read(self.gateway.vote_of(c.id, account)).await {
                Ok(choice) => self.with_store(|s| {
                    if s.account() == Some(account) {
                        s.votes.set_record(c.id, account, choice);
                    }
                }),
                Err(e) => tracing::debug!(campaign = %c.id, "vote lookup failed: {e}"),
            }
        }
    }

    /// The campaigns the connected account takes part in.
    pub fn my_campaigns(&self) -> Vec<Campaign> {
        self.read_store(|s| s.campaigns.for_account().into_iter().cloned().collect())
    }

    pub fn cached_campaign(&self, id: CampaignId) -> Option<Campaign> {
        self.read_store(|s| s.campaigns.get(id).cloned())
    }

    /// The leading candidate in the cached tallies, for display before close.
    pub fn cached_leader(&self, id: CampaignId) -> Option<Address> {
        self.read_store(|s| s.campaigns.get(id).and_then(Campaign::leader))
    }
}
