//! The client handle every coordinator hangs off.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::OnceCell;

use votechain_gateway::{require_admin, verify_contract, ContractGateway, GatewayError};
use votechain_ipfs::{IpfsError, PinningService};
use votechain_store::{NotificationLevel, Store};
use votechain_types::{Address, ContentHash, Clock, Timestamp};

use crate::config::ClientConfig;
use crate::metrics::ClientMetrics;
use crate::ClientError;

/// Owns the injected collaborators and the shared store.
///
/// Each public coordinator validates its input, submits at most one
/// transaction, refetches what the write touched, and on failure records the
/// error on the relevant slice and raises exactly one notification.
pub struct VotingClient<G, P, C> {
    pub(crate) gateway: Arc<G>,
    pub(crate) pinner: Arc<P>,
    pub(crate) clock: Arc<C>,
    pub(crate) store: Arc<RwLock<Store>>,
    pub(crate) config: ClientConfig,
    pub(crate) metrics: Arc<ClientMetrics>,
    contract_checked: OnceCell<()>,
}

impl<G, P, C> VotingClient<G, P, C>
where
    G: ContractGateway,
    P: PinningService,
    C: Clock,
{
    pub fn new(
        gateway: Arc<G>,
        pinner: Arc<P>,
        clock: Arc<C>,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            gateway,
            pinner,
            clock,
            store: Arc::new(RwLock::new(Store::new())),
            config,
            metrics: Arc::new(ClientMetrics::new()?),
            contract_checked: OnceCell::new(),
        })
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn pinner(&self) -> &Arc<P> {
        &self.pinner
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Shared handle for views that subscribe to the store.
    pub fn store(&self) -> Arc<RwLock<Store>> {
        Arc::clone(&self.store)
    }

    /// Run `f` against the store. Never call this across an `.await`.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// Read-only view of the store.
    pub fn read_store<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// The connected account, or `WalletNotConnected`.
    pub fn account(&self) -> Result<Address, ClientError> {
        self.gateway.signer().ok_or(ClientError::WalletNotConnected)
    }

    /// Check once per client that the configured address holds the voting
    /// contract. Failures are not cached, so a later call retries.
    pub(crate) async fn ensure_contract(&self) -> Result<(), ClientError> {
        self.contract_checked
            .get_or_try_init(|| async { verify_contract(&*self.gateway).await })
            .await?;
        Ok(())
    }

    /// Contract check plus on-chain admin identity, before any admin write.
    pub(crate) async fn ensure_admin(&self) -> Result<Address, ClientError> {
        self.ensure_contract().await?;
        match require_admin(&*self.gateway).await {
            Ok(admin) => Ok(admin),
            Err(e) => {
                self.metrics.tx_blocked.inc();
                Err(e.into())
            }
        }
    }

    /// Count a read against the contract.
    pub(crate) async fn read<T>(
        &self,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, ClientError> {
        self.metrics.contract_reads.inc();
        Ok(call.await?)
    }

    /// Submit one write and track it in the metrics. Never retried.
    pub(crate) async fn submit<T>(
        &self,
        function: &'static str,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, ClientError> {
        self.metrics
            .tx_submitted
            .with_label_values(&[function])
            .inc();
        match call.await {
            Ok(value) => {
                self.metrics
                    .tx_confirmed
                    .with_label_values(&[function])
                    .inc();
                Ok(value)
            }
            Err(e) => {
                self.metrics.tx_failed.with_label_values(&[function]).inc();
                Err(e.into())
            }
        }
    }

    pub(crate) async fn pin_file(&self, name: &str, bytes: Vec<u8>) -> Result<ContentHash, ClientError> {
        let result = self.pinner.pin_file(name, bytes).await;
        self.track_upload(result)
    }

    pub(crate) async fn pin_json(
        &self,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<ContentHash, ClientError> {
        let result = self.pinner.pin_json(name, value).await;
        self.track_upload(result)
    }

    fn track_upload(&self, result: Result<ContentHash, IpfsError>) -> Result<ContentHash, ClientError> {
        match result {
            Ok(hash) => {
                self.metrics.ipfs_uploads.inc();
                Ok(hash)
            }
            Err(e) => {
                self.metrics.ipfs_failures.inc();
                Err(e.into())
            }
        }
    }

    /// Refused locally before anything was sent.
    pub(crate) fn blocked(&self, err: ClientError) -> ClientError {
        self.metrics.tx_blocked.inc();
        err
    }

    /// Coordinator boundary: on failure, log, record the message on the
    /// slice via `on_error`, and raise exactly one notification.
    pub(crate) fn settle<T>(
        &self,
        op: &'static str,
        result: Result<T, ClientError>,
        on_error: impl FnOnce(&mut Store, &str),
    ) -> Result<T, ClientError> {
        if let Err(e) = &result {
            let message = e.user_message();
            tracing::warn!(op, category = ?e.category(), error = %e, "action failed");
            self.with_store(|s| {
                on_error(s, &message);
                s.notify(NotificationLevel::Error, message);
            });
        }
        result
    }

    pub(crate) fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        let message = message.into();
        self.with_store(|s| s.notify(level, message));
    }
}
