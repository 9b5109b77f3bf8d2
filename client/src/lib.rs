//! Action layer of the votechain client.
//!
//! [`VotingClient`] exposes one coordinator per contract operation. Each
//! validates input, runs pre-flight checks, submits at most one transaction,
//! normalizes results into the shared [`Store`](votechain_store::Store) and
//! turns every failure into a classified [`ClientError`] plus one
//! notification. [`WalletConnector`] owns the wallet session and
//! [`WinnerPoller`] watches a campaign for its result.

pub mod actions;
pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod metrics;
pub mod poller;
pub mod shutdown;
pub mod validation;

pub use actions::{Attachment, CampaignDraft, Registration};
pub use client::VotingClient;
pub use config::{ClientConfig, IpfsConfig};
pub use connector::WalletConnector;
pub use error::{ClientError, ErrorCategory};
pub use metrics::ClientMetrics;
pub use poller::WinnerPoller;
pub use shutdown::ShutdownController;
