//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
}

/// Reports whether the database answers.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match database_ready(&state).await {
        true => (
            StatusCode::OK,
            Json(Health {
                status: "ok",
                database: "ok",
            }),
        ),
        false => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Health {
                status: "degraded",
                database: "unavailable",
            }),
        ),
    }
}

async fn database_ready(state: &AppState) -> bool {
    match database::profile::count_profiles(state.db.pool()).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check query failed");
            false
        }
    }
}
