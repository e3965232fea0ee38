//! Route handlers for the office web server.

pub mod appointments;
pub mod attentions;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod reminders;
pub mod students;

use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::gate;
use crate::state::AppState;

/// Build the router with all routes.
///
/// Everything under `/api` except login and logout requires a staff session.
pub fn router(state: &AppState) -> Router<AppState> {
    let api = Router::new()
        .route("/api/me", get(auth::me_api))
        .route("/api/stats", get(dashboard::stats_api))
        .route(
            "/api/appointments",
            get(appointments::list_api).post(appointments::create_api),
        )
        .route("/api/appointments/:id", get(appointments::get_api))
        .route(
            "/api/appointments/:id/status",
            patch(appointments::update_status_api),
        )
        .route(
            "/api/reminders",
            get(reminders::list_api).post(reminders::create_api),
        )
        .route(
            "/api/reminders/:id",
            patch(reminders::update_api).delete(reminders::delete_api),
        )
        .route("/api/reminders/:id/toggle", patch(reminders::toggle_api))
        .route(
            "/api/attentions",
            get(attentions::list_api).post(attentions::create_api),
        )
        .route(
            "/api/attentions/:id",
            get(attentions::get_api).delete(attentions::delete_api),
        )
        .route("/api/attentions/:id/pdf", get(attentions::pdf_api))
        .route("/api/students/search", get(students::search_api))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_api_session,
        ));

    Router::new()
        // HTML pages
        .route("/", get(dashboard::dashboard_page))
        .route("/login", get(auth::login_page).post(auth::login_form))
        .route("/logout", get(auth::logout_page))
        // Health check
        .route("/health", get(health::health))
        // Session endpoints
        .route("/api/login", post(auth::login_api))
        .route("/api/logout", post(auth::logout_api))
        .merge(api)
}
