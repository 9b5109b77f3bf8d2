//! Route-level access control.
//!
//! Each route declares whether it needs a connected account and which roles
//! may see it; [`guard`] turns the current session into allow-or-redirect.

pub mod guard;
pub mod table;

pub use guard::{guard, landing_page, Access};
pub use table::{resolve, Route, HOME, ADMIN_HOME, ROUTES};
