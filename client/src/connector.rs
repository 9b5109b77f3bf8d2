//! Wallet session lifecycle: connect, disconnect, and react to wallet events.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use votechain_gateway::{ContractGateway, GatewayError, WalletEvent, WalletProvider};
use votechain_ipfs::PinningService;
use votechain_store::NotificationLevel;
use votechain_types::{Address, Clock};

use crate::client::VotingClient;
use crate::ClientError;

/// Binds the wallet's account to the client and keeps them in step.
///
/// Switching or dropping the account always clears every account-scoped
/// slice before anything is loaded for the new one.
pub struct WalletConnector<W, G, P, C> {
    wallet: Arc<W>,
    client: Arc<VotingClient<G, P, C>>,
}

impl<W, G, P, C> WalletConnector<W, G, P, C>
where
    W: WalletProvider + 'static,
    G: ContractGateway + 'static,
    P: PinningService + 'static,
    C: Clock + 'static,
{
    pub fn new(wallet: Arc<W>, client: Arc<VotingClient<G, P, C>>) -> Self {
        Self { wallet, client }
    }

    pub fn client(&self) -> &Arc<VotingClient<G, P, C>> {
        &self.client
    }

    /// Ask the wallet for access and start a session for its first account.
    pub async fn connect(&self) -> Result<Address, ClientError> {
        self.client.with_store(|s| s.user.state.begin());
        let result = self.open_session().await;
        let account = self
            .client
            .settle("connect", result, |s, msg| s.user.state.fail(msg))?;
        self.client
            .notify(NotificationLevel::Success, format!("Connected as {account}"));
        Ok(account)
    }

    async fn open_session(&self) -> Result<Address, ClientError> {
        let accounts = self.wallet.request_accounts().await.map_err(wallet_error)?;
        let account = accounts
            .first()
            .copied()
            .ok_or(ClientError::WalletNotConnected)?;
        self.check_chain().await?;
        self.bind(account).await;
        Ok(account)
    }

    async fn check_chain(&self) -> Result<(), ClientError> {
        let Some(expected) = self.client.config.chain_id else {
            return Ok(());
        };
        let found = self.wallet.chain_id().await.map_err(wallet_error)?;
        if found != expected {
            return Err(ClientError::WrongChain { expected, found });
        }
        Ok(())
    }

    async fn bind(&self, account: Address) {
        self.client.gateway.bind_signer(account);
        self.client.with_store(|s| s.set_account(account));
        tracing::info!(%account, "wallet connected");
        if let Err(e) = self.client.fetch_user().await {
            tracing::warn!(%account, "profile load failed: {e}");
        }
    }

    /// Drop the session and everything cached for the account.
    pub fn disconnect(&self) {
        if let Some(account) = self.end_session() {
            tracing::info!(%account, "wallet disconnected");
            self.client
                .notify(NotificationLevel::Info, "Wallet disconnected");
        }
    }

    fn end_session(&self) -> Option<Address> {
        let previous = self.client.gateway.signer();
        self.client.gateway.unbind_signer();
        self.client.with_store(|s| s.clear_account_state());
        previous
    }

    pub async fn handle_event(&self, event: WalletEvent) {
        tracing::debug!(?event, "wallet event");
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.first().copied() {
                // Only an explicit connect starts a session.
                _ if self.client.gateway.signer().is_none() => {
                    tracing::debug!(?accounts, "no session, ignoring account change");
                }
                None => self.disconnect(),
                Some(account) if Some(account) == self.client.gateway.signer() => {}
                Some(account) => {
                    self.end_session();
                    self.bind(account).await;
                    self.client
                        .notify(NotificationLevel::Info, format!("Switched to {account}"));
                }
            },
            WalletEvent::ChainChanged(found) => match self.client.config.chain_id {
                Some(expected) if expected != found => {
                    self.disconnect();
                    self.client.notify(
                        NotificationLevel::Warning,
                        ClientError::WrongChain { expected, found }.user_message(),
                    );
                }
                _ => tracing::info!(chain_id = found, "wallet switched network"),
            },
            WalletEvent::Disconnected => self.disconnect(),
        }
    }

    /// Forward wallet events to [`handle_event`](Self::handle_event) until shutdown.
    pub fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let mut events = self.wallet.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.recv() => break,
                    event = events.recv() => match event {
                        Ok(event) => self.handle_event(event).await,
                        Err(RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "wallet events lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!("wallet event loop stopped");
        })
    }
}

/// A missing or unreachable wallet is not the same failure as a refusal.
fn wallet_error(e: GatewayError) -> ClientError {
    match e {
        GatewayError::Transport(msg) => ClientError::WalletUnavailable(msg),
        other => other.into(),
    }
}
