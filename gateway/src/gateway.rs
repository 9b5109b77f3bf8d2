//! The injected contract handle shared by every coordinator.

use std::future::Future;

use votechain_types::{
    Address, Campaign, CampaignId, RequestedRole, Role, Timestamp, TxHash, UserDetails,
    VerificationRequest,
};

use crate::GatewayError;

/// A confirmed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Result of `createCampaign`: the id comes from the `CampaignCreated` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatedCampaign {
    pub id: CampaignId,
    pub tx: TxOutcome,
}

/// Typed access to the voting contract.
///
/// Reads work without a signer. Writes require a signer bound with
/// [`bind_signer`](Self::bind_signer) and resolve only after the transaction
/// is mined; a mined-but-reverted transaction is an error.
///
/// Implementations: [`RpcGateway`](crate::RpcGateway) for a live node, and an
/// in-memory double in the `votechain-nullables` crate for tests.
pub trait ContractGateway: Send + Sync {
    /// Address of the bound contract.
    fn contract_address(&self) -> Address;

    /// Attach the connected wallet account as the transaction sender.
    fn bind_signer(&self, account: Address);

    /// Detach the signer; subsequent writes fail with [`GatewayError::NoSigner`].
    fn unbind_signer(&self);

    fn signer(&self) -> Option<Address>;

    // ── Reads ───────────────────────────────────────────────────────────

    /// Whether contract code exists at the bound address.
    fn contract_deployed(&self) -> impl Future<Output = Result<bool, GatewayError>> + Send;

    fn admin(&self) -> impl Future<Output = Result<Address, GatewayError>> + Send;

    fn user_role(
        &self,
        account: Address,
    ) -> impl Future<Output = Result<Role, GatewayError>> + Send;

    fn user_details(
        &self,
        account: Address,
    ) -> impl Future<Output = Result<Option<UserDetails>, GatewayError>> + Send;

    fn campaign_ids(&self) -> impl Future<Output = Result<Vec<CampaignId>, GatewayError>> + Send;

    fn campaign(
        &self,
        id: CampaignId,
    ) -> impl Future<Output = Result<Campaign, GatewayError>> + Send;

    /// The candidate `voter` chose in campaign `id`, if any.
    fn vote_of(
        &self,
        id: CampaignId,
        voter: Address,
    ) -> impl Future<Output = Result<Option<Address>, GatewayError>> + Send;

    /// Accounts with a verification request awaiting review.
    fn pending_requesters(
        &self,
    ) -> impl Future<Output = Result<Vec<Address>, GatewayError>> + Send;

    fn verification_request(
        &self,
        account: Address,
    ) -> impl Future<Output = Result<Option<VerificationRequest>, GatewayError>> + Send;

    fn winner(
        &self,
        id: CampaignId,
    ) -> impl Future<Output = Result<Option<Address>, GatewayError>> + Send;

    /// The campaign the contract reports as due for closing, if any.
    fn check_upkeep(&self) -> impl Future<Output = Result<Option<CampaignId>, GatewayError>> + Send;

    // ── Writes ──────────────────────────────────────────────────────────

    fn create_campaign(
        &self,
        start: Timestamp,
        end: Timestamp,
        details_hash: &str,
    ) -> impl Future<Output = Result<CreatedCampaign, GatewayError>> + Send;

    fn update_campaign(
        &self,
        id: CampaignId,
        start: Timestamp,
        end: Timestamp,
        details_hash: &str,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn delete_campaign(
        &self,
        id: CampaignId,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn register_voter(
        &self,
        id: CampaignId,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn register_candidate(
        &self,
        id: CampaignId,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn vote(
        &self,
        id: CampaignId,
        candidate: Address,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn update_user_details(
        &self,
        details: &UserDetails,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn request_verification(
        &self,
        role: RequestedRole,
        document_hash: &str,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn approve_verification(
        &self,
        requester: Address,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn reject_verification(
        &self,
        requester: Address,
        feedback: &str,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;

    fn perform_upkeep(
        &self,
        id: CampaignId,
    ) -> impl Future<Output = Result<TxOutcome, GatewayError>> + Send;
}
