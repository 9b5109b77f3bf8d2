//! Vote records.

use serde::{Deserialize, Serialize};

use crate::{Address, CampaignId};

/// One voter's choice in one campaign. Write-once on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteRecord {
    pub campaign_id: CampaignId,
    pub voter: Address,
    pub candidate: Address,
}
