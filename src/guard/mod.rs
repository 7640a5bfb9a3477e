//! Route guard.
//!
//! One authorization decision for every navigation: given the session and the
//! requested path, either let it through or name the redirect target. The
//! guard improves navigation only; the backend still checks every token.

use crate::models::{Role, User};
use crate::session::SessionState;

pub const HOME_ROUTE: &str = "/";
pub const LOGIN_ROUTE: &str = "/login";
pub const SIGNUP_ROUTE: &str = "/signup";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const SUPERADMIN_ROUTE: &str = "/superadmin";

/// Citizen-facing pages that never require a session.
const PUBLIC_PREFIXES: &[&str] = &[
    LOGIN_ROUTE,
    SIGNUP_ROUTE,
    "/services",
    "/feedback",
    "/complaint",
    "/track",
    "/rate",
    "/employees",
];

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// What to do with an unauthenticated visitor on a protected page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnauthenticatedPolicy {
    /// Let the page load; its data requests fail on their own.
    #[default]
    PassThrough,
    RedirectToLogin,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GuardPolicy {
    pub unauthenticated: UnauthenticatedPolicy,
}

/// Landing page for a role after sign-in.
pub fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => SUPERADMIN_ROUTE,
        _ => DASHBOARD_ROUTE,
    }
}

/// Where the login form sends a freshly signed-in user.
pub fn login_redirect(user: &User) -> &'static str {
    dashboard_for(user.role)
}

/// Whether `path` equals `route` or lies beneath it.
fn is_under(path: &str, route: &str) -> bool {
    match path.strip_prefix(route) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Path without query string, fragment or trailing slash.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_ROUTE
    } else {
        trimmed
    }
}

pub fn is_public(path: &str) -> bool {
    let path = normalize(path);
    path == HOME_ROUTE || PUBLIC_PREFIXES.iter().any(|route| is_under(path, route))
}

/// Decide whether navigation to `path` may proceed.
pub fn authorize(session: &SessionState, path: &str, policy: &GuardPolicy) -> GuardDecision {
    let path = normalize(path);

    if session.is_loading {
        return GuardDecision::Allow;
    }

    let user = match (&session.user, session.is_authenticated) {
        (Some(user), true) => user,
        _ => {
            if is_public(path) {
                return GuardDecision::Allow;
            }
            return match policy.unauthenticated {
                UnauthenticatedPolicy::PassThrough => {
                    tracing::debug!("Unauthenticated visit to {} left to the page", path);
                    GuardDecision::Allow
                }
                UnauthenticatedPolicy::RedirectToLogin => {
                    GuardDecision::Redirect(LOGIN_ROUTE.to_string())
                }
            };
        }
    };

    if is_under(path, LOGIN_ROUTE) || is_under(path, SIGNUP_ROUTE) {
        let target = login_redirect(user);
        tracing::debug!("Signed-in {} sent from {} to {}", user.role.as_str(), path, target);
        return GuardDecision::Redirect(target.to_string());
    }

    if is_under(path, SUPERADMIN_ROUTE) && !user.is_super_admin() {
        tracing::debug!("{} denied {}", user.role.as_str(), path);
        return GuardDecision::Redirect(DASHBOARD_ROUTE.to_string());
    }

    GuardDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in(role: Role) -> SessionState {
        SessionState {
            token: Some("tok".into()),
            user: Some(User {
                id: "u1".into(),
                name: "Dawit".into(),
                email: "dawit@example.gov".into(),
                role,
                subcity_id: None,
                subcity: None,
                phone: None,
            }),
            is_authenticated: true,
            is_loading: false,
            error: None,
        }
    }

    fn redirect(target: &str) -> GuardDecision {
        GuardDecision::Redirect(target.to_string())
    }

    #[test]
    fn test_public_routes_allowed_without_session() {
        let anonymous = SessionState::default();
        let policy = GuardPolicy::default();
        for path in ["/", "/login", "/signup", "/services/licensing", "/feedback", "/track?id=7"] {
            assert_eq!(authorize(&anonymous, path, &policy), GuardDecision::Allow, "{}", path);
        }
    }

    #[test]
    fn test_login_redirects_by_role() {
        let policy = GuardPolicy::default();
        assert_eq!(
            authorize(&signed_in(Role::SuperAdmin), "/login", &policy),
            redirect("/superadmin")
        );
        for role in [Role::SubCityAdmin, Role::Admin, Role::Editor, Role::Viewer] {
            assert_eq!(authorize(&signed_in(role), "/login", &policy), redirect("/dashboard"));
            assert_eq!(authorize(&signed_in(role), "/signup/", &policy), redirect("/dashboard"));
        }
    }

    #[test]
    fn test_superadmin_area_is_restricted() {
        let policy = GuardPolicy::default();
        assert_eq!(
            authorize(&signed_in(Role::Admin), "/superadmin/subcities", &policy),
            redirect("/dashboard")
        );
        assert_eq!(
            authorize(&signed_in(Role::SuperAdmin), "/superadmin/subcities", &policy),
            GuardDecision::Allow
        );
        // Prefix match must respect segment boundaries.
        assert_eq!(
            authorize(&signed_in(Role::Editor), "/superadministration", &policy),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_unauthenticated_policy() {
        let anonymous = SessionState::default();
        assert_eq!(
            authorize(&anonymous, "/dashboard/complaints", &GuardPolicy::default()),
            GuardDecision::Allow
        );
        let strict = GuardPolicy {
            unauthenticated: UnauthenticatedPolicy::RedirectToLogin,
        };
        assert_eq!(authorize(&anonymous, "/dashboard/complaints", &strict), redirect("/login"));
        assert_eq!(authorize(&anonymous, "/feedback", &strict), GuardDecision::Allow);
    }

    #[test]
    fn test_loading_session_is_never_redirected() {
        let mut session = signed_in(Role::Viewer);
        session.is_loading = true;
        assert_eq!(
            authorize(&session, "/superadmin", &GuardPolicy::default()),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_login_redirect_for_user() {
        let session = signed_in(Role::SuperAdmin);
        assert_eq!(login_redirect(session.user.as_ref().unwrap()), "/superadmin");
    }
}
