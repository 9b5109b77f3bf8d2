//! One coordinator per contract operation.

mod admin;
mod campaigns;
mod profile;
mod verification;
mod votes;

pub use campaigns::{Attachment, CampaignDraft, Registration};
