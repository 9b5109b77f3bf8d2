//! Access decisions for a session on a route.

use votechain_types::{Address, Role};

use crate::table::{Route, ADMIN_HOME, HOME};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

/// Decide whether the session may enter `route`.
///
/// Signed-out users hitting a protected route go home. Signed-in users whose
/// role is not admitted also go home, except admins, who are sent to the
/// admin dashboard when a non-admin route turns them away. A connected
/// account whose role has not loaded yet is treated as unverified.
pub fn guard(account: Option<&Address>, role: Option<Role>, route: &Route) -> Access {
    if account.is_none() {
        return if route.requires_auth {
            Access::Redirect(HOME)
        } else {
            Access::Allow
        };
    }
    let role = role.unwrap_or(Role::Unverified);
    if route.allows(role) {
        Access::Allow
    } else if role == Role::Admin && !route.is_admin_only() {
        Access::Redirect(ADMIN_HOME)
    } else {
        Access::Redirect(HOME)
    }
}

/// Where a freshly connected session should land.
pub fn landing_page(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_HOME,
        _ => "/campaigns",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{resolve, ROUTES};
    use proptest::prelude::*;

    fn route(path: &str) -> &'static Route {
        resolve(path).unwrap().0
    }

    const ME: Address = Address::ZERO;

    #[test]
    fn signed_out_user_is_sent_home_from_admin() {
        assert_eq!(guard(None, None, route("/admin")), Access::Redirect("/"));
    }

    #[test]
    fn admin_on_profile_goes_to_dashboard() {
        assert_eq!(
            guard(Some(&ME), Some(Role::Admin), route("/profile")),
            Access::Redirect("/admin")
        );
    }

    #[test]
    fn voter_may_browse_campaigns() {
        assert_eq!(
            guard(Some(&ME), Some(Role::Voter), route("/campaigns")),
            Access::Allow
        );
    }

    #[test]
    fn voter_is_sent_home_from_admin() {
        assert_eq!(
            guard(Some(&ME), Some(Role::Voter), route("/admin")),
            Access::Redirect("/")
        );
    }

    #[test]
    fn unloaded_role_counts_as_unverified() {
        assert_eq!(guard(Some(&ME), None, route("/verify")), Access::Allow);
        assert_eq!(
            guard(Some(&ME), None, route("/register")),
            Access::Redirect("/")
        );
    }

    #[test]
    fn pending_user_can_check_verification() {
        assert_eq!(
            guard(Some(&ME), Some(Role::PendingVerification), route("/verify")),
            Access::Allow
        );
    }

    #[test]
    fn landing_pages() {
        assert_eq!(landing_page(Role::Admin), "/admin");
        assert_eq!(landing_page(Role::Voter), "/campaigns");
        assert_eq!(landing_page(Role::Unverified), "/campaigns");
    }

    #[test]
    fn landing_page_is_always_reachable() {
        for role in Role::ALL {
            let target = route(landing_page(role));
            assert_eq!(guard(Some(&ME), Some(role), target), Access::Allow, "{role:?}");
        }
    }

    proptest! {
        #[test]
        fn home_is_always_open(idx in 0usize..5, signed_in in any::<bool>()) {
            let role = Role::ALL[idx];
            let account = signed_in.then_some(&ME);
            prop_assert_eq!(guard(account, Some(role), route("/")), Access::Allow);
        }

        #[test]
        fn redirects_never_loop(idx in 0usize..5, r in 0usize..ROUTES.len()) {
            let role = Role::ALL[idx];
            if let Access::Redirect(target) = guard(Some(&ME), Some(role), &ROUTES[r]) {
                prop_assert_eq!(guard(Some(&ME), Some(role), route(target)), Access::Allow);
            }
        }
    }
}
