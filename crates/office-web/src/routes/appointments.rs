//! Appointment endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use database::appointment::{self, AppointmentFilter};
use database::{Appointment, AppointmentStatus, NewAppointment};
use serde::Deserialize;

use crate::error::Result;
use crate::gate::CurrentProfile;
use crate::state::AppState;

/// Query parameters for listing appointments.
#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<AppointmentStatus>,
    pub date: Option<String>,
}

/// Body of a status change.
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

pub async fn list_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Appointment>>> {
    let filter = AppointmentFilter {
        status: query.status,
        date: query.date,
        limit: None,
    };
    let appointments = appointment::list_appointments(state.db.pool(), &profile.id, &filter).await?;
    Ok(Json(appointments))
}

pub async fn create_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Json(new): Json<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>)> {
    let created = appointment::create_appointment(state.db.pool(), &profile.id, &new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>> {
    let found = appointment::get_appointment(state.db.pool(), &profile.id, &id).await?;
    Ok(Json(found))
}

/// Complete or cancel a pending appointment.
pub async fn update_status_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Appointment>> {
    let updated = appointment::update_status(state.db.pool(), &profile.id, &id, update.status).await?;
    Ok(Json(updated))
}
