//! Off-chain content storage for the votechain client.
//!
//! Documents, profile images and campaign metadata are pinned to IPFS and
//! only their content hash is written on-chain.

pub mod client;
pub mod error;

pub use client::{PinataClient, PinningService};
pub use error::IpfsError;
