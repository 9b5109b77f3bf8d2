//! Verification requests: submitting one, and the admin review queue.

use votechain_gateway::{ContractGateway, TxOutcome};
use votechain_ipfs::PinningService;
use votechain_store::{NotificationLevel, StoreEvent};
use votechain_types::{Address, Clock, RequestedRole, VerificationRequest};

use crate::actions::Attachment;
use crate::client::VotingClient;
use crate::{validation, ClientError};

impl<G, P, C> VotingClient<G, P, C>
where
    G: ContractGateway,
    P: PinningService,
    C: Clock,
{
    /// Upload the identity document and ask to be verified as `role`.
    ///
    /// A failed upload aborts before any transaction; the caller keeps the
    /// form input and can resubmit.
    pub async fn request_verification(
        &self,
        role: RequestedRole,
        document: &Attachment,
    ) -> Result<TxOutcome, ClientError> {
        self.with_store(|s| s.verification.submission.begin());
        let result = self.request_verification_inner(role, document).await;
        let outcome = self.settle("request_verification", result, |s, msg| {
            s.verification.submission.fail(msg)
        })?;
        self.with_store(|s| s.verification.submission.succeed());
        self.notify(
            NotificationLevel::Success,
            format!("Verification as {} requested", role.as_role()),
        );
        if let Err(e) = self.fetch_user().await {
            tracing::warn!("profile refetch failed: {e}");
        }
        Ok(outcome)
    }

    async fn request_verification_inner(
        &self,
        role: RequestedRole,
        document: &Attachment,
    ) -> Result<TxOutcome, ClientError> {
        self.account()?;
        if let Some(current) = self.read_store(|s| s.user.role) {
            if !current.can_request_verification() {
                return Err(self.blocked(ClientError::Validation(format!(
                    "cannot request verification while {current}"
                ))));
            }
        }
        validation::document(&document.bytes, self.config.max_document_bytes)
            .map_err(|e| self.blocked(e))?;

        let hash = self.pin_file(&document.name, document.bytes.clone()).await?;
        self.ensure_contract().await?;
        self.submit(
            "requestVerification",
            self.gateway.request_verification(role, hash.as_str()),
        )
        .await
    }

    /// Load every pending request for admin review.
    pub async fn fetch_pending_verifications(&self) -> Result<Vec<VerificationRequest>, ClientError> {
        self.with_store(|s| s.verification.state.begin());
        let result = self.load_pending().await;
        let requests = self.settle("fetch_pending_verifications", result, |s, msg| {
            s.verification.state.fail(msg)
        })?;
        self.with_store(|s| {
            s.verification.set_pending(requests.clone());
            s.verification.state.succeed();
            s.emit(StoreEvent::VerificationQueueChanged);
        });
        Ok(requests)
    }

    async fn load_pending(&self) -> Result<Vec<VerificationRequest>, ClientError> {
        let requesters = self.read(self.gateway.pending_requesters()).await?;
        let mut requests = Vec::with_capacity(requesters.len());
        for requester in requesters {
            if let Some(req) = self.read(self.gateway.verification_request(requester)).await? {
                requests.push(req);
            }
        }
        Ok(requests)
    }

    pub async fn approve_verification(&self, requester: Address) -> Result<TxOutcome, ClientError> {
        self.with_store(|s| s.verification.state.begin());
        let result = async {
            self.ensure_admin().await?;
            self.submit(
                "approveVerification",
                self.gateway.approve_verification(requester),
            )
            .await
        }
        .await;
        self.finish_review("approve_verification", requester, result, "approved")
            .await
    }

    /// Reject with feedback the requester will see.
    pub async fn reject_verification(
        &self,
        requester: Address,
        feedback: &str,
    ) -> Result<TxOutcome, ClientError> {
        self.with_store(|s| s.verification.state.begin());
        let result = async {
            validation::required("feedback", feedback).map_err(|e| self.blocked(e))?;
            self.ensure_admin().await?;
            self.submit(
                "rejectVerification",
                self.gateway.reject_verification(requester, feedback.trim()),
            )
            .await
        }
        .await;
        self.finish_review("reject_verification", requester, result, "rejected")
            .await
    }

    async fn finish_review(
        &self,
        op: &'static str,
        requester: Address,
        result: Result<TxOutcome, ClientError>,
        verdict: &str,
    ) -> Result<TxOutcome, ClientError> {
        let outcome = self.settle(op, result, |s, msg| s.verification.state.fail(msg))?;
        self.with_store(|s| {
            s.verification.remove_processed(&requester);
            s.verification.state.succeed();
            s.emit(StoreEvent::VerificationQueueChanged);
        });
        self.notify(
            NotificationLevel::Success,
            format!("Request from {requester} {verdict}"),
        );
        match self.load_pending().await {
            Ok(requests) => self.with_store(|s| s.verification.set_pending(requests)),
            Err(e) => tracing::warn!("pending refetch failed: {e}"),
        }
        Ok(outcome)
    }
}
