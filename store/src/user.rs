//! The connected account and its on-chain profile.

use votechain_types::{Address, Role, UserDetails};

use crate::status::AsyncState;

#[derive(Clone, Debug, Default)]
pub struct UserSlice {
    pub account: Option<Address>,
    pub role: Option<Role>,
    pub details: Option<UserDetails>,
    pub state: AsyncState,
}

impl UserSlice {
    /// Role as the route guard sees it: unknown roles count as unverified.
    pub fn effective_role(&self) -> Option<Role> {
        self.account.map(|_| self.role.unwrap_or(Role::Unverified))
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Store a fetched profile, ignoring it if the account switched meanwhile.
    pub fn apply_profile(
        &mut self,
        account: Address,
        role: Role,
        details: Option<UserDetails>,
    ) -> bool {
        if self.account != Some(account) {
            tracing::debug!(%account, "dropping profile for a stale account");
            return false;
        }
        self.role = Some(role);
        self.details = details;
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_role_defaults_to_unverified_when_connected() {
        let mut u = UserSlice::default();
        assert_eq!(u.effective_role(), None);
        u.account = Some(Address::new([1; 20]));
        assert_eq!(u.effective_role(), Some(Role::Unverified));
        u.role = Some(Role::Voter);
        assert_eq!(u.effective_role(), Some(Role::Voter));
    }

    #[test]
    fn stale_profile_is_dropped() {
        let mut u = UserSlice {
            account: Some(Address::new([2; 20])),
            ..Default::default()
        };
        assert!(!u.apply_profile(Address::new([1; 20]), Role::Admin, None));
        assert_eq!(u.role, None);
        assert!(u.apply_profile(Address::new([2; 20]), Role::Candidate, None));
        assert_eq!(u.role, Some(Role::Candidate));
    }
}
