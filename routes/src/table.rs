//! The route table.

use std::collections::BTreeMap;

use votechain_types::Role;

pub const HOME: &str = "/";
pub const ADMIN_HOME: &str = "/admin";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    /// Pattern; segments starting with `:` match any value.
    pub path: &'static str,
    pub requires_auth: bool,
    /// `None` admits every role.
    pub allowed_roles: Option<&'static [Role]>,
}

impl Route {
    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.map_or(true, |roles| roles.contains(&role))
    }

    /// Only admins may enter.
    pub fn is_admin_only(&self) -> bool {
        matches!(self.allowed_roles, Some(roles) if *roles == [Role::Admin])
    }

    /// Match `path` against this route, returning captured parameters.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<&'static str, String>> {
        let pattern: Vec<&'static str> = split(self.path).collect();
        let actual: Vec<&str> = split(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }
        let mut params = BTreeMap::new();
        for (p, a) in pattern.into_iter().zip(actual) {
            match p.strip_prefix(':') {
                Some(name) => {
                    params.insert(name, a.to_string());
                }
                None if p == a => {}
                None => return None,
            }
        }
        Some(params)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

const VERIFIED: &[Role] = &[Role::Voter, Role::Candidate];
const UNVERIFIED: &[Role] = &[Role::Unverified, Role::PendingVerification];
const NON_ADMIN: &[Role] = &[
    Role::Voter,
    Role::Candidate,
    Role::Unverified,
    Role::PendingVerification,
];
const ADMIN: &[Role] = &[Role::Admin];

pub const ROUTES: &[Route] = &[
    Route {
        path: HOME,
        requires_auth: false,
        allowed_roles: None,
    },
    Route {
        path: "/campaigns",
        requires_auth: true,
        allowed_roles: None,
    },
    Route {
        path: "/campaigns/:id",
        requires_auth: true,
        allowed_roles: None,
    },
    Route {
        path: "/register",
        requires_auth: true,
        allowed_roles: Some(VERIFIED),
    },
    Route {
        path: "/verify",
        requires_auth: true,
        allowed_roles: Some(UNVERIFIED),
    },
    Route {
        path: "/profile",
        requires_auth: true,
        allowed_roles: Some(NON_ADMIN),
    },
    Route {
        path: ADMIN_HOME,
        requires_auth: true,
        allowed_roles: Some(ADMIN),
    },
    Route {
        path: "/admin/verifications",
        requires_auth: true,
        allowed_roles: Some(ADMIN),
    },
    Route {
        path: "/admin/campaigns/new",
        requires_auth: true,
        allowed_roles: Some(ADMIN),
    },
];

/// Find the route for a concrete path, with its parameters.
pub fn resolve(path: &str) -> Option<(&'static Route, BTreeMap<&'static str, String>)> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    ROUTES
        .iter()
        .find_map(|r| r.matches(path).map(|params| (r, params)))
}
