//! Client-side state for the votechain client.
//!
//! One store, one slice per resource. Entities are keyed by their on-chain
//! identifier and merged by key, so fetches for different campaigns or
//! requests never overwrite each other.

pub mod campaigns;
pub mod dashboard;
pub mod events;
pub mod notifications;
pub mod status;
pub mod store;
pub mod user;
pub mod verification;
pub mod votes;

pub use campaigns::CampaignSlice;
pub use dashboard::{DashboardSlice, DashboardStats};
pub use events::{EventBus, StoreEvent};
pub use notifications::{Notification, NotificationLevel, Notifications};
pub use status::{AsyncState, RequestStatus};
pub use store::Store;
pub use user::UserSlice;
pub use verification::VerificationSlice;
pub use votes::VoteSlice;
