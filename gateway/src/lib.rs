//! Contract gateway for the votechain client.
//!
//! Provides everything the action layer needs to talk to the chain:
//! - JSON-RPC transport ([`RpcClient`]) with preserved error objects
//! - The [`ContractGateway`] trait: one typed method per contract call
//! - [`RpcGateway`]: read path through a provider, write path through a signer
//! - Wallet provider abstraction with account/chain change events
//! - Pre-flight checks (admin identity, contract presence) run before writes

pub mod contract;
pub mod error;
pub mod gateway;
pub mod preflight;
pub mod receipt;
pub mod rpc;
pub mod rpc_gateway;
pub mod wallet;

pub use error::GatewayError;
pub use gateway::{ContractGateway, CreatedCampaign, TxOutcome};
pub use preflight::{require_admin, verify_contract};
pub use receipt::TransactionReceipt;
pub use rpc::{CallRequest, RpcClient};
pub use rpc_gateway::{ConfirmationPolicy, RpcGateway};
pub use wallet::{RpcWallet, WalletEvent, WalletProvider};
