//! The connected user's role and profile.

use votechain_gateway::{ContractGateway, TxOutcome};
use votechain_ipfs::PinningService;
use votechain_store::{NotificationLevel, StoreEvent};
use votechain_types::{Address, Clock, Role, UserDetails};

use crate::actions::Attachment;
use crate::client::VotingClient;
use crate::{validation, ClientError};

impl<G, P, C> VotingClient<G, P, C>
where
    G: ContractGateway,
    P: PinningService,
    C: Clock,
{
    /// Load role, profile and own verification request of the connected account.
    pub async fn fetch_user(&self) -> Result<(Role, Option<UserDetails>), ClientError> {
        self.with_store(|s| s.user.state.begin());
        let result = async {
            let account = self.account()?;
            let role = self.read(self.gateway.user_role(account)).await?;
            let details = self.read(self.gateway.user_details(account)).await?;
            let request = self.read(self.gateway.verification_request(account)).await?;
            Ok::<_, ClientError>((account, role, details, request))
        }
        .await;
        let (account, role, details, request) =
            self.settle("fetch_user", result, |s, msg| s.user.state.fail(msg))?;

        self.with_store(|s| {
            if s.user.apply_profile(account, role, details.clone()) {
                s.verification.own_request = request;
                s.user.state.succeed();
                s.emit(StoreEvent::ProfileUpdated(account));
            }
        });
        tracing::debug!(%account, %role, "user loaded");
        Ok((role, details))
    }

    /// Validate and save profile details, pinning a new profile image first.
    pub async fn update_profile(
        &self,
        details: UserDetails,
        image: Option<Attachment>,
    ) -> Result<TxOutcome, ClientError> {
        self.with_store(|s| s.user.state.begin());
        let result = self.update_profile_inner(details, image).await;
        let outcome = self.settle("update_profile", result, |s, msg| s.user.state.fail(msg))?;
        self.notify(NotificationLevel::Success, "Profile updated");
        if let Err(e) = self.fetch_user().await {
            tracing::warn!("profile refetch failed: {e}");
        }
        Ok(outcome)
    }

    async fn update_profile_inner(
        &self,
        mut details: UserDetails,
        image: Option<Attachment>,
    ) -> Result<TxOutcome, ClientError> {
        self.account()?;
        validation::profile(&details).map_err(|e| self.blocked(e))?;
        if let Some(image) = image {
            details.profile_image_hash = Some(self.pin_file(&image.name, image.bytes).await?);
        }
        self.ensure_contract().await?;
        self.submit("updateUserDetails", self.gateway.update_user_details(&details))
            .await
    }

    /// Role as the route guard sees it.
    pub fn current_role(&self) -> Option<Role> {
        self.read_store(|s| s.user.effective_role())
    }

    pub fn connected_account(&self) -> Option<Address> {
        self.read_store(|s| s.account())
    }
}
