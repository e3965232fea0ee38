//! Reminder endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use database::{reminder, NewReminder, Reminder, ReminderUpdate};
use serde::Deserialize;

use crate::error::Result;
use crate::gate::CurrentProfile;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub completed: Option<bool>,
}

pub async fn list_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Reminder>>> {
    let reminders = reminder::list_reminders(state.db.pool(), &profile.id, query.completed).await?;
    Ok(Json(reminders))
}

pub async fn create_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Json(new): Json<NewReminder>,
) -> Result<(StatusCode, Json<Reminder>)> {
    let created = reminder::create_reminder(state.db.pool(), &profile.id, &new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partial edit; absent fields are left unchanged.
pub async fn update_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<String>,
    Json(update): Json<ReminderUpdate>,
) -> Result<Json<Reminder>> {
    let updated = reminder::update_reminder(state.db.pool(), &profile.id, &id, &update).await?;
    Ok(Json(updated))
}

pub async fn toggle_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<String>,
) -> Result<Json<Reminder>> {
    let updated = reminder::toggle_completed(state.db.pool(), &profile.id, &id).await?;
    Ok(Json(updated))
}

pub async fn delete_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    reminder::delete_reminder(state.db.pool(), &profile.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
