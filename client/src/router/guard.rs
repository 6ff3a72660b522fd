use shared::types::RoutesConfig;

use crate::router::location::Location;
use crate::router::routes::RouteMeta;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Cancel this navigation and start one to the given location.
    Redirect(Location),
}

/// Decide whether a transition to `to` may proceed.
///
/// Order matters: the login screen is always reachable, the token check
/// runs before the role check, and a role check only applies to routes that
/// declare roles.
pub fn evaluate(
    to: &Location,
    meta: &RouteMeta,
    session: &Session,
    routes: &RoutesConfig,
) -> GuardDecision {
    if to.path == routes.login_path {
        return GuardDecision::Allow;
    }

    if !session.is_logged_in() {
        return GuardDecision::Redirect(
            Location::new(&routes.login_path).with_query("redirect", &to.path),
        );
    }

    if let Some(required) = &meta.roles {
        if !session.has_role(required.as_slice()) {
            return GuardDecision::Redirect(Location::new(&routes.home_path));
        }
    }

    GuardDecision::Allow
}
