//! User roles as recorded by the voting contract.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeError;

/// A user's permission tier.
///
/// The discriminants match the contract's `uint8` encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// No verified identity yet.
    Unverified,
    /// Verified and allowed to register as a campaign voter.
    Voter,
    /// Verified and allowed to register as a campaign candidate.
    Candidate,
    /// The contract administrator.
    Admin,
    /// A verification request is awaiting admin review.
    PendingVerification,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Unverified,
        Role::Voter,
        Role::Candidate,
        Role::Admin,
        Role::PendingVerification,
    ];

    pub fn from_u8(code: u8) -> Result<Self, TypeError> {
        match code {
            0 => Ok(Self::Unverified),
            1 => Ok(Self::Voter),
            2 => Ok(Self::Candidate),
            3 => Ok(Self::Admin),
            4 => Ok(Self::PendingVerification),
            other => Err(TypeError::InvalidRole(other)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Unverified => 0,
            Self::Voter => 1,
            Self::Candidate => 2,
            Self::Admin => 3,
            Self::PendingVerification => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Voter => "voter",
            Self::Candidate => "candidate",
            Self::Admin => "admin",
            Self::PendingVerification => "pending_verification",
        }
    }

    /// Whether the user may submit a verification request.
    pub fn can_request_verification(&self) -> bool {
        matches!(self, Self::Unverified)
    }

    /// Whether the user holds a verified campaign role.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Voter | Self::Candidate)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role a verification request asks the admin to grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestedRole {
    Voter,
    Candidate,
}

impl RequestedRole {
    pub fn as_role(&self) -> Role {
        match self {
            Self::Voter => Role::Voter,
            Self::Candidate => Role::Candidate,
        }
    }

    pub fn as_u8(&self) -> u8 {
        self.as_role().as_u8()
    }

    pub fn from_u8(code: u8) -> Result<Self, TypeError> {
        Role::from_u8(code).and_then(Self::try_from)
    }
}

impl TryFrom<Role> for RequestedRole {
    type Error = TypeError;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Voter => Ok(Self::Voter),
            Role::Candidate => Ok(Self::Candidate),
            other => Err(TypeError::NotRequestable(other.to_string())),
        }
    }
}

impl fmt::Display for RequestedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_role().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_u8(role.as_u8()).unwrap(), role);
        }
        assert_eq!(Role::from_u8(9), Err(TypeError::InvalidRole(9)));
    }

    #[test]
    fn only_voter_and_candidate_are_requestable() {
        assert_eq!(RequestedRole::from_u8(1).unwrap(), RequestedRole::Voter);
        assert_eq!(RequestedRole::from_u8(2).unwrap(), RequestedRole::Candidate);
        assert!(RequestedRole::from_u8(3).is_err());
        assert!(RequestedRole::try_from(Role::Unverified).is_err());
    }
}
