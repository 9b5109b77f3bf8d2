//! Nullable contract — an in-memory voting contract.
//!
//! Enforces the rules the real contract enforces (admin-only writes, date
//! windows, registration, one vote per voter) so client code can be tested
//! against realistic reverts without a node.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use votechain_abi::AbiError;
use votechain_gateway::{ContractGateway, CreatedCampaign, GatewayError, TxOutcome};
use votechain_types::{
    Address, Campaign, CampaignId, Clock, RequestedRole, Role, Timestamp, TxHash, UserDetails,
    VerificationRequest, VerificationStatus,
};

use crate::clock::NullClock;

#[derive(Clone, Debug)]
struct SimCampaign {
    start: Timestamp,
    end: Timestamp,
    closed: bool,
    winner: Option<Address>,
    details_hash: String,
    voters: Vec<Address>,
    candidates: Vec<Address>,
    ballots: HashMap<Address, Address>,
}

impl SimCampaign {
    fn to_campaign(&self, id: u64) -> Campaign {
        let mut tallies: BTreeMap<Address, u64> =
            self.candidates.iter().map(|c| (*c, 0)).collect();
        for candidate in self.ballots.values() {
            *tallies.entry(*candidate).or_default() += 1;
        }
        Campaign {
            id: CampaignId(id),
            start: self.start,
            end: self.end,
            is_closed: self.closed,
            winner: self.winner,
            details_hash: self.details_hash.clone(),
            voters: self.voters.clone(),
            candidates: self.candidates.clone(),
            tallies,
        }
    }
}

#[derive(Clone, Default)]
struct Chain {
    roles: HashMap<Address, Role>,
    details: HashMap<Address, UserDetails>,
    campaigns: BTreeMap<u64, SimCampaign>,
    next_id: u64,
    requests: BTreeMap<Address, VerificationRequest>,
    block: u64,
}

/// In-memory [`ContractGateway`].
pub struct NullGateway {
    address: Address,
    admin: Address,
    clock: Arc<NullClock>,
    chain: Mutex<Chain>,
    signer: RwLock<Option<Address>>,
    failures: Mutex<VecDeque<GatewayError>>,
    deployed: AtomicBool,
    mismatched: AtomicBool,
    transactions: AtomicU64,
    reads: AtomicU64,
    sent: Mutex<Vec<&'static str>>,
}

impl NullGateway {
    pub fn new(admin: Address, clock: Arc<NullClock>) -> Self {
        Self {
            address: Address::new([0xc0; 20]),
            admin,
            clock,
            chain: Mutex::new(Chain {
                next_id: 1,
                ..Chain::default()
            }),
            signer: RwLock::new(None),
            failures: Mutex::new(VecDeque::new()),
            deployed: AtomicBool::new(true),
            mismatched: AtomicBool::new(false),
            transactions: AtomicU64::new(0),
            reads: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    // ── Test setup ──────────────────────────────────────────────────────

    pub fn set_role(&self, account: Address, role: Role) {
        self.chain().roles.insert(account, role);
    }

    /// Insert a campaign directly, skipping the date checks.
    pub fn seed_campaign(
        &self,
        start: u64,
        end: u64,
        voters: &[Address],
        candidates: &[Address],
    ) -> CampaignId {
        let mut chain = self.chain();
        let id = chain.next_id;
        chain.next_id += 1;
        chain.campaigns.insert(
            id,
            SimCampaign {
                start: Timestamp::new(start),
                end: Timestamp::new(end),
                closed: false,
                winner: None,
                details_hash: String::new(),
                voters: voters.to_vec(),
                candidates: candidates.to_vec(),
                ballots: HashMap::new(),
            },
        );
        CampaignId(id)
    }

    /// Record a ballot directly, as if cast by another client.
    pub fn seed_vote(&self, id: CampaignId, voter: Address, candidate: Address) {
        if let Some(c) = self.chain().campaigns.get_mut(&id.0) {
            c.ballots.insert(voter, candidate);
        }
    }

    /// Remove a campaign behind the client's back.
    pub fn drop_campaign(&self, id: CampaignId) {
        self.chain().campaigns.remove(&id.0);
    }

    /// The next write fails with `err` before touching state.
    pub fn fail_next_write(&self, err: GatewayError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(err);
    }

    /// Pretend there is no code at the contract address.
    pub fn set_deployed(&self, deployed: bool) {
        self.deployed.store(deployed, Ordering::SeqCst);
    }

    /// Pretend the address holds a contract with a different ABI.
    pub fn set_mismatched(&self, mismatched: bool) {
        self.mismatched.store(mismatched, Ordering::SeqCst);
    }

    // ── Assertions ──────────────────────────────────────────────────────

    /// Number of transactions submitted, including reverted ones.
    pub fn transactions(&self) -> u64 {
        self.transactions.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Names of the contract functions written to, in order.
    pub fn sent(&self) -> Vec<&'static str> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn role_of(&self, account: &Address) -> Role {
        role_in(&self.chain(), self.admin, account)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn chain(&self) -> MutexGuard<'_, Chain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<(), GatewayError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.mismatched.load(Ordering::SeqCst) {
            return Err(GatewayError::Abi(AbiError::EmptyResponse));
        }
        Ok(())
    }

    /// Run a state-changing call the way a mined transaction would: either
    /// every change applies or the call reverts with a reason.
    fn transact<T>(
        &self,
        function: &'static str,
        apply: impl FnOnce(&mut Chain, Address, Timestamp, TxOutcome) -> Result<T, String>,
    ) -> Result<T, GatewayError> {
        let sender = self.signer().ok_or(GatewayError::NoSigner)?;
        if let Some(err) = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            return Err(err);
        }

        let n = self.transactions.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(function);
        let mut hash = [0u8; 32];
        hash[24..].copy_from_slice(&n.to_be_bytes());
        let tx_hash = TxHash::new(hash);

        let mut chain = self.chain();
        let mut scratch = chain.clone();
        scratch.block += 1;
        let outcome = TxOutcome {
            tx_hash,
            block_number: scratch.block,
        };
        match apply(&mut scratch, sender, self.clock.now(), outcome) {
            Ok(value) => {
                *chain = scratch;
                Ok(value)
            }
            Err(reason) => {
                chain.block += 1;
                Err(GatewayError::Reverted {
                    tx_hash,
                    reason: Some(reason),
                })
            }
        }
    }

    fn admin_transact<T>(
        &self,
        function: &'static str,
        apply: impl FnOnce(&mut Chain, Timestamp) -> Result<T, String>,
    ) -> Result<TxOutcome, GatewayError> {
        let admin = self.admin;
        self.transact(function, |chain, sender, now, tx| {
            if sender != admin {
                return Err("Only admin can perform this action".into());
            }
            apply(chain, now).map(|_| tx)
        })
    }
}

fn role_in(chain: &Chain, admin: Address, account: &Address) -> Role {
    if *account == admin {
        Role::Admin
    } else {
        chain.roles.get(account).copied().unwrap_or(Role::Unverified)
    }
}

fn campaign_mut(chain: &mut Chain, id: CampaignId) -> Result<&mut SimCampaign, String> {
    chain
        .campaigns
        .get_mut(&id.0)
        .ok_or_else(|| "Campaign does not exist".to_string())
}

fn check_dates(start: Timestamp, end: Timestamp, now: Timestamp) -> Result<(), String> {
    if start <= now {
        return Err("Start date must be in the future".into());
    }
    if end <= start {
        return Err("End date must be after start date".into());
    }
    Ok(())
}

impl ContractGateway for NullGateway {
    fn contract_address(&self) -> Address {
        self.address
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
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.deployed.load(Ordering::SeqCst))
    }

    async fn admin(&self) -> Result<Address, GatewayError> {
        self.read()?;
        Ok(self.admin)
    }

    async fn user_role(&self, account: Address) -> Result<Role, GatewayError> {
        self.read()?;
        Ok(self.role_of(&account))
    }

    async fn user_details(&self, account: Address) -> Result<Option<UserDetails>, GatewayError> {
        self.read()?;
        Ok(self.chain().details.get(&account).cloned())
    }

    async fn campaign_ids(&self) -> Result<Vec<CampaignId>, GatewayError> {
        self.read()?;
        Ok(self.chain().campaigns.keys().map(|id| CampaignId(*id)).collect())
    }

    async fn campaign(&self, id: CampaignId) -> Result<Campaign, GatewayError> {
        self.read()?;
        self.chain()
            .campaigns
            .get(&id.0)
            .map(|c| c.to_campaign(id.0))
            .ok_or_else(|| GatewayError::Rpc {
                code: 3,
                message: "execution reverted: Campaign does not exist".into(),
                data: None,
            })
    }

    async fn vote_of(&self, id: CampaignId, voter: Address) -> Result<Option<Address>, GatewayError> {
        self.read()?;
        Ok(self
            .chain()
            .campaigns
            .get(&id.0)
            .and_then(|c| c.ballots.get(&voter).copied()))
    }

    async fn pending_requesters(&self) -> Result<Vec<Address>, GatewayError> {
        self.read()?;
        Ok(self
            .chain()
            .requests
            .values()
            .filter(|r| r.status == VerificationStatus::Pending)
            .map(|r| r.requester)
            .collect())
    }

    async fn verification_request(
        &self,
        account: Address,
    ) -> Result<Option<VerificationRequest>, GatewayError> {
        self.read()?;
        Ok(self.chain().requests.get(&account).cloned())
    }

    async fn winner(&self, id: CampaignId) -> Result<Option<Address>, GatewayError> {
        self.read()?;
        Ok(self.chain().campaigns.get(&id.0).and_then(|c| c.winner))
    }

    async fn check_upkeep(&self) -> Result<Option<CampaignId>, GatewayError> {
        self.read()?;
        let now = self.clock.now();
        Ok(self
            .chain()
            .campaigns
            .iter()
            .find(|(_, c)| !c.closed && now >= c.end)
            .map(|(id, _)| CampaignId(*id)))
    }

    async fn create_campaign(
        &self,
        start: Timestamp,
        end: Timestamp,
        details_hash: &str,
    ) -> Result<CreatedCampaign, GatewayError> {
        let details_hash = details_hash.to_string();
        let admin = self.admin;
        self.transact("createCampaign", |chain, sender, now, tx| {
            if sender != admin {
                return Err("Only admin can perform this action".into());
            }
            check_dates(start, end, now)?;
            let id = chain.next_id;
            chain.next_id += 1;
            chain.campaigns.insert(
                id,
                SimCampaign {
                    start,
                    end,
                    closed: false,
                    winner: None,
                    details_hash,
                    voters: Vec::new(),
                    candidates: Vec::new(),
                    ballots: HashMap::new(),
                },
            );
            Ok(CreatedCampaign {
                id: CampaignId(id),
                tx,
            })
        })
    }

    async fn update_campaign(
        &self,
        id: CampaignId,
        start: Timestamp,
        end: Timestamp,
        details_hash: &str,
    ) -> Result<TxOutcome, GatewayError> {
        let details_hash = details_hash.to_string();
        self.admin_transact("updateCampaign", |chain, now| {
            let c = campaign_mut(chain, id)?;
            if c.closed {
                return Err("Campaign is closed".into());
            }
            if c.start <= now {
                return Err("Campaign has already started".into());
            }
            check_dates(start, end, now)?;
            c.start = start;
            c.end = end;
            c.details_hash = details_hash;
            Ok(())
        })
    }

    async fn delete_campaign(&self, id: CampaignId) -> Result<TxOutcome, GatewayError> {
        self.admin_transact("deleteCampaign", |chain, _| {
            chain
                .campaigns
                .remove(&id.0)
                .map(|_| ())
                .ok_or_else(|| "Campaign does not exist".to_string())
        })
    }

    async fn register_voter(&self, id: CampaignId) -> Result<TxOutcome, GatewayError> {
        let admin = self.admin;
        self.transact("registerAsVoter", |chain, sender, now, tx| {
            let role = role_in(chain, admin, &sender);
            if role != Role::Voter {
                return Err("Only verified voters can register".into());
            }
            let c = campaign_mut(chain, id)?;
            if c.closed || now >= c.end {
                return Err("Campaign has ended".into());
            }
            if c.voters.contains(&sender) {
                return Err("Already registered".into());
            }
            c.voters.push(sender);
            Ok(tx)
        })
    }

    async fn register_candidate(&self, id: CampaignId) -> Result<TxOutcome, GatewayError> {
        let admin = self.admin;
        self.transact("registerAsCandidate", |chain, sender, now, tx| {
            let role = role_in(chain, admin, &sender);
            if role != Role::Candidate {
                return Err("Only verified candidates can register".into());
            }
            let c = campaign_mut(chain, id)?;
            if c.closed || now >= c.start {
                return Err("Candidate registration is closed".into());
            }
            if c.candidates.contains(&sender) {
                return Err("Already registered".into());
            }
            c.candidates.push(sender);
            Ok(tx)
        })
    }

    async fn vote(&self, id: CampaignId, candidate: Address) -> Result<TxOutcome, GatewayError> {
        self.transact("vote", |chain, sender, now, tx| {
            let c = campaign_mut(chain, id)?;
            if c.closed || now < c.start || now >= c.end {
                return Err("Campaign is not active".into());
            }
            if !c.voters.contains(&sender) {
                return Err("Not a registered voter".into());
            }
            if !c.candidates.contains(&candidate) {
                return Err("Invalid candidate".into());
            }
            if c.ballots.contains_key(&sender) {
                return Err("Already voted".into());
            }
            c.ballots.insert(sender, candidate);
            Ok(tx)
        })
    }

    async fn update_user_details(&self, details: &UserDetails) -> Result<TxOutcome, GatewayError> {
        let details = details.clone();
        self.transact("updateUserDetails", |chain, sender, _, tx| {
            chain.details.insert(sender, details);
            Ok(tx)
        })
    }

    async fn request_verification(
        &self,
        role: RequestedRole,
        document_hash: &str,
    ) -> Result<TxOutcome, GatewayError> {
        let document_hash = document_hash.to_string();
        let admin = self.admin;
        self.transact("requestVerification", |chain, sender, _, tx| {
            let current = role_in(chain, admin, &sender);
            if !current.can_request_verification() {
                return Err("Verification already requested or granted".into());
            }
            chain.roles.insert(sender, Role::PendingVerification);
            chain.requests.insert(
                sender,
                VerificationRequest {
                    requester: sender,
                    role,
                    document_hash,
                    admin_feedback: String::new(),
                    status: VerificationStatus::Pending,
                },
            );
            Ok(tx)
        })
    }

    async fn approve_verification(&self, requester: Address) -> Result<TxOutcome, GatewayError> {
        self.admin_transact("approveVerification", |chain, _| {
            let req = chain
                .requests
                .get_mut(&requester)
                .filter(|r| r.status == VerificationStatus::Pending)
                .ok_or_else(|| "No pending request".to_string())?;
            req.status = VerificationStatus::Approved;
            let granted = req.role.as_role();
            chain.roles.insert(requester, granted);
            Ok(())
        })
    }

    async fn reject_verification(
        &self,
        requester: Address,
        feedback: &str,
    ) -> Result<TxOutcome, GatewayError> {
        let feedback = feedback.to_string();
        self.admin_transact("rejectVerification", |chain, _| {
            let req = chain
                .requests
                .get_mut(&requester)
                .filter(|r| r.status == VerificationStatus::Pending)
                .ok_or_else(|| "No pending request".to_string())?;
            req.status = VerificationStatus::Rejected;
            req.admin_feedback = feedback;
            chain.roles.insert(requester, Role::Unverified);
            Ok(())
        })
    }

    async fn perform_upkeep(&self, id: CampaignId) -> Result<TxOutcome, GatewayError> {
        self.transact("performUpkeep", |chain, _, now, tx| {
            let c = campaign_mut(chain, id)?;
            if c.closed {
                return Err("Campaign already closed".into());
            }
            if now < c.end {
                return Err("Campaign has not ended".into());
            }
            c.closed = true;
            c.winner = c.to_campaign(id.0).leader();
            Ok(tx)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::new([b; 20])
    }

    fn setup() -> (NullGateway, Arc<NullClock>) {
        let clock = Arc::new(NullClock::new(1_000));
        (NullGateway::new(addr(0xad), Arc::clone(&clock)), clock)
    }

    #[tokio::test]
    async fn admin_creates_campaign_with_sequential_ids() {
        let (gw, _) = setup();
        gw.bind_signer(addr(0xad));
        let a = gw
            .create_campaign(Timestamp::new(2_000), Timestamp::new(3_000), "h")
            .await
            .unwrap();
        let b = gw
            .create_campaign(Timestamp::new(2_000), Timestamp::new(3_000), "h")
            .await
            .unwrap();
        assert_eq!(a.id, CampaignId(1));
        assert_eq!(b.id, CampaignId(2));
        assert_eq!(gw.campaign_ids().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn non_admin_create_reverts_without_state_change() {
        let (gw, _) = setup();
        gw.bind_signer(addr(1));
        let err = gw
            .create_campaign(Timestamp::new(2_000), Timestamp::new(3_000), "h")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Reverted { .. }));
        assert_eq!(gw.transactions(), 1);
        assert!(gw.campaign_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_vote_per_voter() {
        let (gw, clock) = setup();
        let (voter, cand) = (addr(1), addr(2));
        let id = gw.seed_campaign(1_100, 2_000, &[voter], &[cand]);
        clock.set(1_500);
        gw.bind_signer(voter);
        gw.vote(id, cand).await.unwrap();
        let err = gw.vote(id, cand).await.unwrap_err();
        assert_eq!(err.contract_message(), Some("Already voted"));
        assert_eq!(gw.campaign(id).await.unwrap().votes_for(&cand), 1);
    }

    #[tokio::test]
    async fn verification_lifecycle() {
        let (gw, _) = setup();
        let user = addr(3);
        gw.bind_signer(user);
        gw.request_verification(RequestedRole::Candidate, "doc")
            .await
            .unwrap();
        assert_eq!(gw.role_of(&user), Role::PendingVerification);
        assert_eq!(gw.pending_requesters().await.unwrap(), vec![user]);

        gw.bind_signer(addr(0xad));
        gw.approve_verification(user).await.unwrap();
        assert_eq!(gw.role_of(&user), Role::Candidate);
        assert!(gw.pending_requesters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upkeep_closes_ended_campaign_with_leader() {
        let (gw, clock) = setup();
        let (v1, v2, c1, c2) = (addr(1), addr(2), addr(3), addr(4));
        let id = gw.seed_campaign(1_100, 2_000, &[v1, v2], &[c1, c2]);
        gw.seed_vote(id, v1, c2);
        gw.seed_vote(id, v2, c2);
        assert_eq!(gw.check_upkeep().await.unwrap(), None);

        clock.set(2_000);
        assert_eq!(gw.check_upkeep().await.unwrap(), Some(id));
        gw.bind_signer(v1);
        gw.perform_upkeep(id).await.unwrap();
        assert_eq!(gw.winner(id).await.unwrap(), Some(c2));
        assert_eq!(gw.check_upkeep().await.unwrap(), None);
    }

    #[tokio::test]
    async fn injected_failure_consumes_no_transaction() {
        let (gw, _) = setup();
        gw.bind_signer(addr(1));
        gw.fail_next_write(GatewayError::Rpc {
            code: 4001,
            message: "User denied transaction signature".into(),
            data: None,
        });
        let err = gw.update_user_details(&UserDetails::default()).await.unwrap_err();
        assert!(err.is_user_rejection());
        assert_eq!(gw.transactions(), 0);
        gw.update_user_details(&UserDetails::default()).await.unwrap();
        assert_eq!(gw.transactions(), 1);
    }

    #[tokio::test]
    async fn writes_need_a_signer() {
        let (gw, _) = setup();
        let err = gw.delete_campaign(CampaignId(1)).await.unwrap_err();
        assert!(matches!(err, GatewayError::NoSigner));
    }
}
