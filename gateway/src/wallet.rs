//! Wallet provider: account access plus account/chain change notifications.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use votechain_types::Address;

use crate::rpc::RpcClient;
use crate::GatewayError;

/// Something the wallet told us changed underneath the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
    Disconnected,
}

/// The user's wallet.
pub trait WalletProvider: Send + Sync {
    /// Ask for account access; the wallet may prompt the user.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, GatewayError>> + Send;

    /// Accounts already exposed, without prompting.
    fn accounts(&self) -> impl Future<Output = Result<Vec<Address>, GatewayError>> + Send;

    fn chain_id(&self) -> impl Future<Output = Result<u64, GatewayError>> + Send;

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;
}

/// Wallet reached over its JSON-RPC endpoint.
///
/// JSON-RPC has no push channel, so account and chain changes are detected by
/// polling; see [`RpcWallet::spawn_watcher`].
pub struct RpcWallet {
    client: RpcClient,
    events: broadcast::Sender<WalletEvent>,
}

impl RpcWallet {
    pub fn new(client: RpcClient) -> Self {
        let (events, _) = broadcast::channel(32);
        Self { client, events }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Poll the wallet every `interval` and publish changes until `shutdown` fires.
    pub fn spawn_watcher(
        self: &Arc<Self>,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let wallet = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut watch = WatchState::default();
            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        tracing::debug!("wallet watcher stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let observed = match (wallet.client.accounts().await, wallet.client.chain_id().await) {
                            (Ok(accounts), Ok(chain)) => Some((accounts, chain)),
                            (Err(e), _) | (_, Err(e)) => {
                                tracing::debug!("wallet poll failed: {e}");
                                None
                            }
                        };
                        for event in watch.observe(observed) {
                            tracing::info!(?event, "wallet state changed");
                            // No receivers is fine; nobody is listening yet.
                            let _ = wallet.events.send(event);
                        }
                    }
                }
            }
        })
    }
}

/// Diffs successive wallet polls into events.
#[derive(Default)]
struct WatchState {
    last: Option<(Vec<Address>, u64)>,
    reachable: bool,
}

impl WatchState {
    fn observe(&mut self, observed: Option<(Vec<Address>, u64)>) -> Vec<WalletEvent> {
        let Some((accounts, chain)) = observed else {
            let mut events = Vec::new();
            if self.reachable {
                events.push(WalletEvent::Disconnected);
            }
            self.reachable = false;
            self.last = None;
            return events;
        };
        self.reachable = true;

        let mut events = Vec::new();
        if let Some((prev_accounts, prev_chain)) = &self.last {
            if *prev_accounts != accounts {
                events.push(WalletEvent::AccountsChanged(accounts.clone()));
            }
            if *prev_chain != chain {
                events.push(WalletEvent::ChainChanged(chain));
            }
        }
        self.last = Some((accounts, chain));
        events
    }
}

impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, GatewayError> {
        self.client.request_accounts().await
    }

    async fn accounts(&self) -> Result<Vec<Address>, GatewayError> {
        self.client.accounts().await
    }

    async fn chain_id(&self) -> Result<u64, GatewayError> {
        self.client.chain_id().await
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}
