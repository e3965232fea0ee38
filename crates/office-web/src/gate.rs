//! Session and profile gate.
//!
//! Every page visit and API call resolves the caller's session token to a
//! profile and checks the profile's role against the roles the route allows.

use std::time::Duration;

use askama::Template;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use database::{DatabaseError, Profile, Role};

use crate::error::OfficeError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "office_session";

/// Roles allowed to use the office API and pages.
pub const STAFF_ROLES: &[Role] = &[Role::Psychologist, Role::Admin];

/// The authenticated caller, attached to API requests.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

/// Outcome of checking a navigation against the session.
#[derive(Debug)]
pub enum GateDecision {
    /// No usable session; send the visitor to the login portal.
    RedirectToLogin(String),
    /// Signed in, but the role (or an inactive account) is not allowed.
    Forbidden(Profile),
    /// Render the page for this profile.
    Allow(Profile),
    /// The lookup itself failed; nothing conclusive can be shown.
    Undetermined,
}

/// Resolve a session lookup into a gate decision.
pub fn decide(
    lookup: Result<Option<Profile>, DatabaseError>,
    allowed: &[Role],
    portal_url: &str,
    return_path: &str,
) -> GateDecision {
    match lookup {
        Ok(None) => GateDecision::RedirectToLogin(login_redirect(portal_url, return_path)),
        Ok(Some(profile)) if is_allowed(&profile, allowed) => GateDecision::Allow(profile),
        Ok(Some(profile)) => GateDecision::Forbidden(profile),
        Err(err) => {
            tracing::warn!(error = %err, "Session lookup failed");
            GateDecision::Undetermined
        }
    }
}

/// Whether an active profile's normalized role is in `allowed`.
pub fn is_allowed(profile: &Profile, allowed: &[Role]) -> bool {
    profile.is_active && profile.role().is_some_and(|role| allowed.contains(&role))
}

/// Build the portal URL carrying the path to return to after login.
pub fn login_redirect(portal_url: &str, return_path: &str) -> String {
    let separator = if portal_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}redirect_to={}",
        portal_url,
        separator,
        urlencoding::encode(return_path)
    )
}

/// Extract the session token from the cookie or an `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string());

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|v| v.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value for a new session.
pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl.as_secs()
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Check a page visit.
pub async fn check_page(state: &AppState, headers: &HeaderMap, uri: &Uri, allowed: &[Role]) -> GateDecision {
    let return_path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let lookup = match session_token(headers) {
        Some(token) => database::session::get_session_profile(state.db.pool(), &token).await,
        None => Ok(None),
    };

    decide(lookup, allowed, &state.portal_url, return_path)
}

/// 403 view.
#[derive(Template)]
#[template(path = "forbidden.html")]
pub struct ForbiddenTemplate {
    pub full_name: String,
    pub role: String,
}

impl GateDecision {
    /// The allowed profile, or the response to send instead of the page.
    pub fn into_profile(self) -> Result<Profile, Response> {
        match self {
            GateDecision::Allow(profile) => Ok(profile),
            GateDecision::RedirectToLogin(url) => Err(Redirect::to(&url).into_response()),
            GateDecision::Forbidden(profile) => Err((
                StatusCode::FORBIDDEN,
                ForbiddenTemplate {
                    full_name: profile.full_name,
                    role: profile.role.trim().to_string(),
                },
            )
                .into_response()),
            GateDecision::Undetermined => Err(StatusCode::SERVICE_UNAVAILABLE.into_response()),
        }
    }
}

/// API middleware: require a session whose profile has a staff role.
///
/// Attaches [`CurrentProfile`] for handlers.
pub async fn require_api_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(req.headers()) else {
        return OfficeError::Unauthorized.into_response();
    };

    match database::session::get_session_profile(state.db.pool(), &token).await {
        Ok(Some(profile)) if is_allowed(&profile, STAFF_ROLES) => {
            req.extensions_mut().insert(CurrentProfile(profile));
            next.run(req).await
        }
        Ok(Some(profile)) => {
            tracing::warn!(profile_id = %profile.id, role = %profile.role, "API access refused");
            OfficeError::Forbidden.into_response()
        }
        Ok(None) => OfficeError::Unauthorized.into_response(),
        Err(err) => OfficeError::from(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn profile(role: &str, is_active: bool) -> Profile {
        Profile {
            id: "p1".to_string(),
            email: "psy@school.test".to_string(),
            full_name: "Maria Lopez".to_string(),
            role: role.to_string(),
            is_active,
        }
    }

    #[test]
    fn test_missing_session_redirects_with_return_path() {
        let decision = decide(Ok(None), STAFF_ROLES, "/login", "/?tab=history");
        match decision {
            GateDecision::RedirectToLogin(url) => {
                assert_eq!(url, "/login?redirect_to=%2F%3Ftab%3Dhistory");
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_role_is_normalized() {
        let decision = decide(Ok(Some(profile("  PSYCHOLOGIST ", true))), STAFF_ROLES, "/login", "/");
        assert!(matches!(decision, GateDecision::Allow(_)));
    }

    #[test]
    fn test_other_roles_and_inactive_profiles_are_forbidden() {
        let decision = decide(Ok(Some(profile("assistant", true))), STAFF_ROLES, "/login", "/");
        assert!(matches!(decision, GateDecision::Forbidden(_)));

        let decision = decide(Ok(Some(profile("unknown", true))), STAFF_ROLES, "/login", "/");
        assert!(matches!(decision, GateDecision::Forbidden(_)));

        let decision = decide(Ok(Some(profile("admin", false))), STAFF_ROLES, "/login", "/");
        assert!(matches!(decision, GateDecision::Forbidden(_)));
    }

    #[test]
    fn test_lookup_failure_is_undetermined() {
        let err = DatabaseError::Validation(database::ValidationError::Empty("token".to_string()));
        let decision = decide(Err(err), STAFF_ROLES, "/login", "/");
        assert!(matches!(decision, GateDecision::Undetermined));
    }

    #[test]
    fn test_login_redirect_appends_to_existing_query() {
        assert_eq!(
            login_redirect("https://portal.school.test/login?app=office", "/"),
            "https://portal.school.test/login?app=office&redirect_to=%2F"
        );
    }

    #[test]
    fn test_session_token_from_cookie_or_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; office_session=abc123"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("office_session="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("abc", Duration::from_secs(3600));
        assert_eq!(
            cookie,
            "office_session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
