//! [`ContractGateway`] backed by JSON-RPC endpoints.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use votechain_abi::IVotingSystem::{self, CampaignCreated, VoteCast};
use votechain_abi::{
    decode_returns, decode_revert_reason, find_event, from_sol_address, from_sol_addresses,
    narrow_u64, to_sol_address, uint, SolCall,
};
use votechain_types::{
    Address, Campaign, CampaignId, RequestedRole, Role, Timestamp, TxHash, UserDetails,
    VerificationRequest,
};

use crate::contract;
use crate::gateway::{ContractGateway, CreatedCampaign, TxOutcome};
use crate::receipt::TransactionReceipt;
use crate::rpc::{decode_hex_bytes, CallRequest, RpcClient};
use crate::GatewayError;

/// How long to wait for a submitted transaction to be mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1_000),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Contract handle over a fallback read endpoint and an optional wallet endpoint.
///
/// Reads go through the wallet's provider while a signer is bound and fall
/// back to the configured RPC endpoint otherwise. Writes are always signed by
/// the wallet and wait for exactly one receipt; a failed or timed-out
/// transaction is reported, never resubmitted.
pub struct RpcGateway {
    contract: Address,
    provider: RpcClient,
    wallet: Option<RpcClient>,
    signer: RwLock<Option<Address>>,
    confirmation: ConfirmationPolicy,
}

impl RpcGateway {
    /// Read-only handle: no wallet, writes always fail with `NoSigner`.
    pub fn read_only(provider: RpcClient, contract: Address) -> Self {
        Self {
            contract,
            provider,
            wallet: None,
            signer: RwLock::new(None),
            confirmation: ConfirmationPolicy::default(),
        }
    }

    /// Handle that can sign through `wallet` once a signer is bound.
    pub fn with_wallet(provider: RpcClient, wallet: RpcClient, contract: Address) -> Self {
        Self {
            wallet: Some(wallet),
            ..Self::read_only(provider, contract)
        }
    }

    pub fn with_confirmation(mut self, policy: ConfirmationPolicy) -> Self {
        self.confirmation = policy;
        self
    }

    /// The endpoint used for reads right now.
    pub fn read_endpoint(&self) -> &RpcClient {
        match (&self.wallet, self.signer()) {
            (Some(wallet), Some(_)) => wallet,
            _ => &self.provider,
        }
    }

    async fn call<C: SolCall>(&self, call: C) -> Result<C::Return, GatewayError> {
        let req = CallRequest {
            from: self.signer(),
            to: self.contract,
            data: call.abi_encode(),
        };
        tracing::debug!(function = C::SIGNATURE, "contract read");
        let data = self.read_endpoint().call(&req).await?;
        Ok(decode_returns::<C>(&data)?)
    }

    async fn transact<C: SolCall>(&self, call: C) -> Result<TransactionReceipt, GatewayError> {
        let function = C::SIGNATURE;
        let signer = self.signer().ok_or(GatewayError::NoSigner)?;
        let wallet = self.wallet.as_ref().ok_or(GatewayError::NoSigner)?;
        let req = CallRequest {
            from: Some(signer),
            to: self.contract,
            data: call.abi_encode(),
        };

        let tx_hash = wallet.send_transaction(&req).await?;
        tracing::info!(function, %tx_hash, from = %signer, "transaction submitted");

        let receipt = wait_for_receipt(wallet, &tx_hash, self.confirmation).await?;
        if !receipt.success {
            let reason = self.revert_reason(&req, receipt.block_number).await;
            tracing::warn!(function, %tx_hash, ?reason, "transaction reverted");
            return Err(GatewayError::Reverted { tx_hash, reason });
        }
        tracing::info!(
            function,
            %tx_hash,
            block = receipt.block_number,
            "transaction confirmed"
        );
        Ok(receipt)
    }

    async fn send<C: SolCall>(&self, call: C) -> Result<TxOutcome, GatewayError> {
        self.transact(call).await.map(|r| outcome(&r))
    }

    /// Replay a failed transaction as a call at its block to recover the reason.
    async fn revert_reason(&self, req: &CallRequest, block: u64) -> Option<String> {
        let tag = format!("0x{block:x}");
        match self.read_endpoint().call_at(req, &tag).await {
            Ok(_) => None,
            Err(GatewayError::Rpc { message, data, .. }) => data
                .as_deref()
                .and_then(|d| decode_hex_bytes(d).ok())
                .and_then(|bytes| decode_revert_reason(&bytes))
                .or(Some(message)),
            Err(_) => None,
        }
    }
}

fn outcome(receipt: &TransactionReceipt) -> TxOutcome {
    TxOutcome {
        tx_hash: receipt.tx_hash,
        block_number: receipt.block_number,
    }
}

/// Poll for a receipt until it appears or the policy's timeout elapses.
///
/// Transport errors while polling are logged and polling continues; the
/// transaction itself is never resubmitted.
pub async fn wait_for_receipt(
    client: &RpcClient,
    tx_hash: &TxHash,
    policy: ConfirmationPolicy,
) -> Result<TransactionReceipt, GatewayError> {
    let poll = async {
        let mut ticker = tokio::time::interval(policy.poll_interval);
        loop {
            ticker.tick().await;
            match client.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return receipt,
                Ok(None) => {}
                Err(e) => tracing::warn!(%tx_hash, "receipt poll failed: {e}"),
            }
        }
    };
    tokio::time::timeout(policy.timeout, poll)
        .await
        .map_err(|_| GatewayError::ConfirmationTimeout(*tx_hash))
}

fn time(t: Timestamp) -> votechain_abi::U256 {
    uint(t.as_secs())
}

impl ContractGateway for RpcGateway {
    fn contract_address(&self) -> Address {
        self.contract
    }

    fn bind_signer(&self, account: Address) {
        *self.signer.write().unwrap_or_else(PoisonError::into_inner) = Some(account);
    }

    fn unbind_signer(&self) {
        *self.signer.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn signer(&self) -> Option<Address> {
        *self.signer.read().unwrap_or_else(PoisonError::into_inner)
    }

    async fn contract_deployed(&self) -> Result<bool, GatewayError> {
        let code = self.read_endpoint().get_code(&self.contract).await?;
        Ok(!code.is_empty())
    }

    async fn admin(&self) -> Result<Address, GatewayError> {
        let admin = self.call(IVotingSystem::adminCall {}).await?;
        Ok(from_sol_address(admin))
    }

    async fn user_role(&self, account: Address) -> Result<Role, GatewayError> {
        let code = self
            .call(IVotingSystem::getUserRoleCall {
                user: to_sol_address(account),
            })
            .await?;
        Ok(Role::from_u8(code)?)
    }

    async fn user_details(&self, account: Address) -> Result<Option<UserDetails>, GatewayError> {
        let ret = self
            .call(IVotingSystem::getUserDetailsCall {
                user: to_sol_address(account),
            })
            .await?;
        Ok(contract::decode_user_details(ret))
    }

    async fn campaign_ids(&self) -> Result<Vec<CampaignId>, GatewayError> {
        let ids = self.call(IVotingSystem::getAllCampaignIdsCall {}).await?;
        ids.into_iter()
            .map(|id| Ok(CampaignId(narrow_u64(id)?)))
            .collect()
    }

    async fn campaign(&self, id: CampaignId) -> Result<Campaign, GatewayError> {
        let ret = self
            .call(IVotingSystem::getCampaignDetailsCall {
                campaignId: uint(id.0),
            })
            .await?;
        contract::decode_campaign(ret)
    }

    async fn vote_of(&self, id: CampaignId, voter: Address) -> Result<Option<Address>, GatewayError> {
        let candidate = self
            .call(IVotingSystem::getVoteCall {
                campaignId: uint(id.0),
                voter: to_sol_address(voter),
            })
            .await?;
        Ok(from_sol_address(candidate).non_zero())
    }

    async fn pending_requesters(&self) -> Result<Vec<Address>, GatewayError> {
        let requesters = self
            .call(IVotingSystem::getPendingVerificationRequestsCall {})
            .await?;
        Ok(from_sol_addresses(requesters))
    }

    async fn verification_request(
        &self,
        account: Address,
    ) -> Result<Option<VerificationRequest>, GatewayError> {
        let ret = self
            .call(IVotingSystem::getVerificationRequestCall {
                user: to_sol_address(account),
            })
            .await?;
        contract::decode_verification_request(ret)
    }

    async fn winner(&self, id: CampaignId) -> Result<Option<Address>, GatewayError> {
        let winner = self
            .call(IVotingSystem::getWinnerCall {
                campaignId: uint(id.0),
            })
            .await?;
        Ok(from_sol_address(winner).non_zero())
    }

    async fn check_upkeep(&self) -> Result<Option<CampaignId>, GatewayError> {
        let ret = self
            .call(IVotingSystem::checkUpkeepCall {
                checkData: Default::default(),
            })
            .await?;
        contract::decode_check_upkeep(ret)
    }

    async fn create_campaign(
        &self,
        start: Timestamp,
        end: Timestamp,
        details_hash: &str,
    ) -> Result<CreatedCampaign, GatewayError> {
        let receipt = self
            .transact(IVotingSystem::createCampaignCall {
                startDate: time(start),
                endDate: time(end),
                detailsHash: details_hash.to_string(),
            })
            .await?;
        let event = find_event::<CampaignCreated>(&receipt.logs, &self.contract)
            .ok_or(GatewayError::MissingEvent("CampaignCreated"))??;
        Ok(CreatedCampaign {
            id: contract::decode_campaign_created(&event)?,
            tx: outcome(&receipt),
        })
    }

    async fn update_campaign(
        &self,
        id: CampaignId,
        start: Timestamp,
        end: Timestamp,
        details_hash: &str,
    ) -> Result<TxOutcome, GatewayError> {
        self.send(IVotingSystem::updateCampaignCall {
            campaignId: uint(id.0),
            startDate: time(start),
            endDate: time(end),
            detailsHash: details_hash.to_string(),
        })
        .await
    }

    async fn delete_campaign(&self, id: CampaignId) -> Result<TxOutcome, GatewayError> {
        self.send(IVotingSystem::deleteCampaignCall {
            campaignId: uint(id.0),
        })
        .await
    }

    async fn register_voter(&self, id: CampaignId) -> Result<TxOutcome, GatewayError> {
        self.send(IVotingSystem::registerAsVoterCall {
            campaignId: uint(id.0),
        })
        .await
    }

    async fn register_candidate(&self, id: CampaignId) -> Result<TxOutcome, GatewayError> {
        self.send(IVotingSystem::registerAsCandidateCall {
            campaignId: uint(id.0),
        })
        .await
    }

    async fn vote(&self, id: CampaignId, candidate: Address) -> Result<TxOutcome, GatewayError> {
        let receipt = self
            .transact(IVotingSystem::voteCall {
                campaignId: uint(id.0),
                candidate: to_sol_address(candidate),
            })
            .await?;
        match find_event::<VoteCast>(&receipt.logs, &self.contract) {
            Some(Ok(_)) => {}
            Some(Err(e)) => tracing::warn!(campaign = %id, "undecodable VoteCast log: {e}"),
            None => tracing::debug!(campaign = %id, "vote confirmed without VoteCast log"),
        }
        Ok(outcome(&receipt))
    }

    async fn update_user_details(&self, details: &UserDetails) -> Result<TxOutcome, GatewayError> {
        self.send(contract::user_details_call(details)).await
    }

    async fn request_verification(
        &self,
        role: RequestedRole,
        document_hash: &str,
    ) -> Result<TxOutcome, GatewayError> {
        self.send(IVotingSystem::requestVerificationCall {
            role: role.as_u8(),
            documentHash: document_hash.to_string(),
        })
        .await
    }

    async fn approve_verification(&self, requester: Address) -> Result<TxOutcome, GatewayError> {
        self.send(IVotingSystem::approveVerificationCall {
            user: to_sol_address(requester),
        })
        .await
    }

    async fn reject_verification(
        &self,
        requester: Address,
        feedback: &str,
    ) -> Result<TxOutcome, GatewayError> {
        self.send(IVotingSystem::rejectVerificationCall {
            user: to_sol_address(requester),
            feedback: feedback.to_string(),
        })
        .await
    }

    async fn perform_upkeep(&self, id: CampaignId) -> Result<TxOutcome, GatewayError> {
        self.send(IVotingSystem::performUpkeepCall {
            performData: contract::upkeep_perform_data(id).into(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> RpcGateway {
        let provider = RpcClient::new("http://127.0.0.1:8545").unwrap();
        let wallet = RpcClient::new("http://127.0.0.1:1248").unwrap();
        RpcGateway::with_wallet(provider, wallet, Address::new([0xcc; 20]))
    }

    #[test]
    fn reads_fall_back_to_provider_without_signer() {
        let gw = gateway();
        assert_eq!(gw.read_endpoint().url(), "http://127.0.0.1:8545");
        gw.bind_signer(Address::new([1; 20]));
        assert_eq!(gw.read_endpoint().url(), "http://127.0.0.1:1248");
        gw.unbind_signer();
        assert_eq!(gw.read_endpoint().url(), "http://127.0.0.1:8545");
    }

    #[test]
    fn read_only_gateway_never_switches_endpoint() {
        let provider = RpcClient::new("http://127.0.0.1:8545").unwrap();
        let gw = RpcGateway::read_only(provider, Address::ZERO);
        gw.bind_signer(Address::new([1; 20]));
        assert_eq!(gw.read_endpoint().url(), "http://127.0.0.1:8545");
    }

    #[tokio::test]
    async fn writes_without_signer_fail_before_any_request() {
        let gw = gateway();
        let err = gw.vote(CampaignId(1), Address::new([2; 20])).await.unwrap_err();
        assert!(matches!(err, GatewayError::NoSigner));
    }

    #[tokio::test]
    async fn read_only_gateway_cannot_write_even_with_signer() {
        let provider = RpcClient::new("http://127.0.0.1:8545").unwrap();
        let gw = RpcGateway::read_only(provider, Address::ZERO);
        gw.bind_signer(Address::new([1; 20]));
        let err = gw.delete_campaign(CampaignId(1)).await.unwrap_err();
        assert!(matches!(err, GatewayError::NoSigner));
    }
}
