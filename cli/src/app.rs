//! Wiring of the real gateway, wallet and pinning service.

use std::sync::Arc;

use votechain_client::{ClientConfig, ClientError, ShutdownController, VotingClient, WalletConnector};
use votechain_gateway::{ConfirmationPolicy, RpcClient, RpcGateway, RpcWallet};
use votechain_ipfs::PinataClient;
use votechain_types::{Address, SystemClock};

pub type Client = VotingClient<RpcGateway, PinataClient, SystemClock>;
pub type Connector = WalletConnector<RpcWallet, RpcGateway, PinataClient, SystemClock>;

pub struct App {
    pub client: Arc<Client>,
    pub connector: Option<Arc<Connector>>,
    pub wallet: Option<Arc<RpcWallet>>,
    pub shutdown: ShutdownController,
}

impl App {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let contract = config.require_contract()?;
        let provider = RpcClient::new(&config.rpc_url)?;
        let wallet_client = match &config.wallet_url {
            Some(url) => Some(RpcClient::new(url)?),
            None => None,
        };
        let policy = ConfirmationPolicy {
            poll_interval: config.confirmation_poll(),
            timeout: config.confirmation_timeout(),
        };
        let gateway = match &wallet_client {
            Some(wallet) => RpcGateway::with_wallet(provider, wallet.clone(), contract),
            None => RpcGateway::read_only(provider, contract),
        }
        .with_confirmation(policy);
        let pinner = PinataClient::new(
            &config.ipfs.api_url,
            &config.ipfs.gateway_url,
            &config.ipfs.api_key,
            &config.ipfs.api_secret,
        );
        tracing::debug!(rpc = %config.rpc_url, %contract, wallet = wallet_client.is_some(), "client configured");

        let client = Arc::new(VotingClient::new(
            Arc::new(gateway),
            Arc::new(pinner),
            Arc::new(SystemClock),
            config,
        )?);
        let wallet = wallet_client.map(|c| Arc::new(RpcWallet::new(c)));
        let connector = wallet
            .as_ref()
            .map(|w| Arc::new(WalletConnector::new(Arc::clone(w), Arc::clone(&client))));
        Ok(Self {
            client,
            connector,
            wallet,
            shutdown: ShutdownController::new(),
        })
    }

    /// Connect the configured wallet; commands that sign or read the
    /// caller's own state need this first.
    pub async fn connect(&self) -> Result<Address, ClientError> {
        match &self.connector {
            Some(connector) => connector.connect().await,
            None => Err(ClientError::WalletUnavailable(
                "no wallet endpoint configured (set --wallet-url)".into(),
            )),
        }
    }

    /// Connect if a wallet is configured; stay anonymous otherwise.
    pub async fn try_connect(&self) -> Option<Address> {
        match &self.connector {
            Some(_) => self.connect().await.ok(),
            None => None,
        }
    }

    /// Follow wallet account and chain changes until shutdown.
    pub fn watch_wallet(&self) {
        if let (Some(wallet), Some(connector)) = (&self.wallet, &self.connector) {
            let interval = self.client.config().wallet_poll();
            wallet.spawn_watcher(interval, self.shutdown.subscribe());
            Arc::clone(connector).run(self.shutdown.subscribe());
        }
    }
}
