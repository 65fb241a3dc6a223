//! Advisory role gating for screen subtrees.
//!
//! The guard decides where the router should send the user; it is NOT a
//! security boundary. The role it reads is client-supplied and the backend
//! authorizes every request independently.

use mealdash_core::Role;

use crate::session::SessionStore;

/// Route of the login screen.
pub const LOGIN_ROUTE: &str = "/login";

/// The landing route for a role's own area.
///
/// The guard never sends a signed-in user to an error page; a user who walks
/// into the wrong area is placed somewhere usable instead.
#[must_use]
pub const fn landing_route(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::Manager => "/manager",
        Role::Customer => "/",
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the guarded subtree.
    Allow,
    /// Not signed in: go to the login screen.
    RedirectToLogin,
    /// Signed in with the wrong role: go to that role's landing route.
    RedirectTo(&'static str),
}

impl GuardDecision {
    /// The redirect target, if this decision is a redirect.
    #[must_use]
    pub const fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_ROUTE),
            Self::RedirectTo(route) => Some(route),
        }
    }
}

/// Gate for a subtree of screens, allowing only the listed roles.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    allowed: Vec<Role>,
}

impl RouteGuard {
    /// Create a guard for the given allow-list.
    #[must_use]
    pub fn new(allowed: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed: allowed.into(),
        }
    }

    /// Decide what to do with the current session.
    ///
    /// - No token: the user is not signed in, redirect to login.
    /// - A known role outside the allow-list: redirect to that role's own
    ///   landing route.
    /// - A token with no resolvable role: allow. The backend is
    ///   authoritative, and stranding a signed-in user on the login screen
    ///   over a missing role cache would be worse than rendering.
    #[must_use]
    pub fn check(&self, session: &SessionStore) -> GuardDecision {
        if !session.is_authenticated() {
            return GuardDecision::RedirectToLogin;
        }

        match session.role() {
            Some(role) if !self.allowed.contains(&role) => {
                GuardDecision::RedirectTo(landing_route(role))
            }
            _ => GuardDecision::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(token: Option<&str>, role: Option<Role>) -> SessionStore {
        let session = SessionStore::in_memory();
        if let Some(token) = token {
            session.set_token(token);
        }
        if let Some(role) = role {
            session.set_role(role);
        }
        session
    }

    #[test]
    fn test_no_token_redirects_to_login() {
        let guard = RouteGuard::new([Role::Customer]);
        let session = session_with(None, None);
        assert_eq!(guard.check(&session), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn test_wrong_role_lands_on_own_home() {
        // A manager poking at the admin area goes to the manager dashboard,
        // not to login and not to an error page.
        let guard = RouteGuard::new([Role::Admin]);
        let session = session_with(Some("tok"), Some(Role::Manager));
        assert_eq!(guard.check(&session), GuardDecision::RedirectTo("/manager"));
    }

    #[test]
    fn test_customer_in_admin_area_lands_on_storefront() {
        let guard = RouteGuard::new([Role::Admin, Role::Manager]);
        let session = session_with(Some("tok"), Some(Role::Customer));
        assert_eq!(guard.check(&session), GuardDecision::RedirectTo("/"));
    }

    #[test]
    fn test_allowed_role_renders() {
        let guard = RouteGuard::new([Role::Admin]);
        let session = session_with(Some("tok"), Some(Role::Admin));
        assert_eq!(guard.check(&session), GuardDecision::Allow);
    }

    #[test]
    fn test_token_without_role_is_allowed() {
        let guard = RouteGuard::new([Role::Admin]);
        let session = session_with(Some("tok"), None);
        assert_eq!(guard.check(&session), GuardDecision::Allow);
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(
            GuardDecision::RedirectToLogin.redirect_target(),
            Some("/login")
        );
        assert_eq!(
            GuardDecision::RedirectTo("/manager").redirect_target(),
            Some("/manager")
        );
        assert_eq!(GuardDecision::Allow.redirect_target(), None);
    }
}
