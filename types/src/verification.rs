//! Verification requests: a user's claim to the Voter or Candidate role.

use serde::{Deserialize, Serialize};

use crate::{Address, RequestedRole, TypeError};

/// Review status of a verification request. Codes match the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn from_u8(code: u8) -> Result<Self, TypeError> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Approved),
            2 => Ok(Self::Rejected),
            other => Err(TypeError::InvalidStatus(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_processed(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub requester: Address,
    pub role: RequestedRole,
    /// IPFS hash of the supporting identity document.
    pub document_hash: String,
    /// Feedback left by the admin on rejection; empty otherwise.
    pub admin_feedback: String,
    pub status: VerificationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(VerificationStatus::from_u8(0).unwrap(), VerificationStatus::Pending);
        assert!(VerificationStatus::from_u8(2).unwrap().is_processed());
        assert!(VerificationStatus::from_u8(3).is_err());
    }
}
