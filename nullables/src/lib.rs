//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the client (contract, wallet, pinning
//! service, clock) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (time, account switches, injected failures)
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod gateway;
pub mod pinner;
pub mod wallet;

pub use clock::NullClock;
pub use gateway::NullGateway;
pub use pinner::{fake_cid, NullPinner, Pinned};
pub use wallet::NullWallet;
