//! Login and logout.

use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use database::{profile, session, DatabaseError, Profile};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{OfficeError, Result};
use crate::gate::{self, CurrentProfile};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub redirect_to: String,
    pub error: Option<String>,
}

/// Credentials posted to the JSON login endpoint.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub profile: Profile,
}

/// Login page query.
#[derive(Deserialize)]
pub struct LoginQuery {
    pub redirect_to: Option<String>,
}

/// Credentials posted by the login form.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub redirect_to: Option<String>,
}

/// Check credentials against the stored digest.
async fn authenticate(state: &AppState, email: &str, password: &str) -> Result<Profile> {
    let pool = state.db.pool();

    let profile = match profile::get_profile_by_email(pool, email).await {
        Ok(profile) => profile,
        Err(DatabaseError::NotFound { .. }) => {
            warn!(email, "Login for unknown email");
            return Err(OfficeError::Unauthorized);
        }
        Err(err) => return Err(err.into()),
    };

    let verified = profile::get_password_hash(pool, &profile.id)
        .await?
        .is_some_and(|hash| database::password::verify_password(password, &hash));
    if !verified {
        warn!(profile_id = %profile.id, "Login with wrong password");
        return Err(OfficeError::Unauthorized);
    }

    if !profile.is_active {
        warn!(profile_id = %profile.id, "Login for inactive profile");
        return Err(OfficeError::Forbidden);
    }

    Ok(profile)
}

/// Only same-site absolute paths are followed after login.
fn safe_redirect(target: Option<&str>) -> String {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

/// JSON login: returns the session token and sets the session cookie.
pub async fn login_api(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let profile = authenticate(&state, &req.email, &req.password).await?;
    let session = session::create_session(state.db.pool(), &profile.id, state.session_ttl).await?;

    info!(profile_id = %profile.id, "Signed in");

    let cookie = gate::session_cookie(&session.token, state.session_ttl);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse {
            token: session.token,
            expires_at: session.expires_at,
            profile,
        }),
    ))
}

/// Drop the caller's session.
pub async fn logout_api(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    end_session(&state, &headers).await?;
    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, gate::clear_session_cookie())]),
    ))
}

/// The caller's profile.
pub async fn me_api(Extension(CurrentProfile(profile)): Extension<CurrentProfile>) -> Json<Profile> {
    Json(profile)
}

/// Render the login form.
pub async fn login_page(Query(query): Query<LoginQuery>) -> LoginTemplate {
    LoginTemplate {
        redirect_to: safe_redirect(query.redirect_to.as_deref()),
        error: None,
    }
}

/// Form login: sets the session cookie and returns to the requested page.
pub async fn login_form(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response> {
    let redirect_to = safe_redirect(form.redirect_to.as_deref());

    let profile = match authenticate(&state, &form.email, &form.password).await {
        Ok(profile) => profile,
        Err(OfficeError::Unauthorized) | Err(OfficeError::Forbidden) => {
            let page = LoginTemplate {
                redirect_to,
                error: Some("Invalid email or password".to_string()),
            };
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
        Err(err) => return Err(err),
    };

    let session = session::create_session(state.db.pool(), &profile.id, state.session_ttl).await?;
    info!(profile_id = %profile.id, "Signed in");

    let cookie = gate::session_cookie(&session.token, state.session_ttl);
    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Redirect::to(&redirect_to)).into_response())
}

/// Sign out from a page and return to the portal.
pub async fn logout_page(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    end_session(&state, &headers).await?;
    Ok((
        AppendHeaders([(header::SET_COOKIE, gate::clear_session_cookie())]),
        Redirect::to(&gate::login_redirect(&state.portal_url, "/")),
    ))
}

async fn end_session(state: &AppState, headers: &HeaderMap) -> Result<()> {
    if let Some(token) = gate::session_token(headers) {
        match session::delete_session(state.db.pool(), &token).await {
            Ok(()) => info!("Signed out"),
            Err(DatabaseError::NotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_redirect() {
        assert_eq!(safe_redirect(Some("/?tab=history")), "/?tab=history");
        assert_eq!(safe_redirect(Some("//evil.test")), "/");
        assert_eq!(safe_redirect(Some("https://evil.test")), "/");
        assert_eq!(safe_redirect(Some("/\\evil.test")), "/");
        assert_eq!(safe_redirect(None), "/");
    }
}
