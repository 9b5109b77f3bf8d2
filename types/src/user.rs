//! User profile details stored by the contract.

use serde::{Deserialize, Serialize};

use crate::ContentHash;

/// Profile fields written through `updateUserDetails`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub name: String,
    pub email: String,
    /// Free-form date string as entered by the user (e.g. `1990-04-01`).
    pub date_of_birth: String,
    pub identity_number: String,
    pub contact_number: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_image_hash: Option<ContentHash>,
    #[serde(default)]
    pub supportive_links: Vec<String>,
}

impl UserDetails {
    /// The contract returns empty strings for accounts that never saved a profile.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.identity_number.is_empty()
    }
}
