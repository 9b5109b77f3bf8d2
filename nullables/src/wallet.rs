//! Nullable wallet — scripted accounts, chain and user decisions.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use votechain_gateway::error::USER_REJECTED_CODE;
use votechain_gateway::{GatewayError, WalletEvent, WalletProvider};
use votechain_types::Address;

/// A wallet whose state is driven by the test.
///
/// Changes made through [`switch_account`](Self::switch_account),
/// [`switch_chain`](Self::switch_chain) and [`lock`](Self::lock) are
/// published to subscribers like a real wallet's events.
pub struct NullWallet {
    accounts: Mutex<Vec<Address>>,
    chain_id: AtomicU64,
    reject_requests: AtomicBool,
    installed: AtomicBool,
    events: broadcast::Sender<WalletEvent>,
}

impl NullWallet {
    pub fn new(account: Address, chain_id: u64) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(vec![account]),
            chain_id: AtomicU64::new(chain_id),
            reject_requests: AtomicBool::new(false),
            installed: AtomicBool::new(true),
            events,
        }
    }

    /// Make `request_accounts` fail as if the user clicked "reject".
    pub fn reject_requests(&self, reject: bool) {
        self.reject_requests.store(reject, Ordering::SeqCst);
    }

    /// Simulate a browser without the wallet extension.
    pub fn uninstall(&self) {
        self.installed.store(false, Ordering::SeqCst);
    }

    pub fn switch_account(&self, account: Address) {
        let accounts = vec![account];
        *self.accounts.lock().unwrap_or_else(PoisonError::into_inner) = accounts.clone();
        let _ = self.events.send(WalletEvent::AccountsChanged(accounts));
    }

    pub fn switch_chain(&self, chain_id: u64) {
        self.chain_id.store(chain_id, Ordering::SeqCst);
        let _ = self.events.send(WalletEvent::ChainChanged(chain_id));
    }

    /// The user locked the wallet: no accounts exposed any more.
    pub fn lock(&self) {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        let _ = self.events.send(WalletEvent::AccountsChanged(Vec::new()));
    }

    fn check_installed(&self) -> Result<(), GatewayError> {
        if self.installed.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(GatewayError::Transport("no wallet provider found".into()))
        }
    }

    fn current(&self) -> Vec<Address> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl WalletProvider for NullWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, GatewayError> {
        self.check_installed()?;
        if self.reject_requests.load(Ordering::SeqCst) {
            return Err(GatewayError::Rpc {
                code: USER_REJECTED_CODE,
                message: "User rejected the request.".into(),
                data: None,
            });
        }
        Ok(self.current())
    }

    async fn accounts(&self) -> Result<Vec<Address>, GatewayError> {
        self.check_installed()?;
        Ok(self.current())
    }

    async fn chain_id(&self) -> Result<u64, GatewayError> {
        self.check_installed()?;
        Ok(self.chain_id.load(Ordering::SeqCst))
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}
