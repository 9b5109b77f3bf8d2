//! Fundamental types for the votechain client.
//!
//! This crate defines the domain model shared across every other crate in the
//! workspace: account addresses, transaction hashes, timestamps, roles, and the
//! normalized copies of on-chain campaigns, profiles, and verification requests.

pub mod address;
pub mod campaign;
pub mod error;
pub mod hash;
pub mod role;
pub mod time;
pub mod user;
pub mod verification;
pub mod vote;

pub use address::Address;
pub use campaign::{Campaign, CampaignId, CampaignMetadata, CampaignPhase};
pub use error::TypeError;
pub use hash::{ContentHash, TxHash};
pub use role::{RequestedRole, Role};
pub use time::{Clock, SystemClock, Timestamp};
pub use user::UserDetails;
pub use verification::{VerificationRequest, VerificationStatus};
pub use vote::VoteRecord;
