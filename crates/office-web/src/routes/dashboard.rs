//! Dashboard and statistics.

use askama::Template;
use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Local;
use database::appointment::{self, AppointmentFilter};
use database::{reminder, stats, Appointment, AppointmentStatus, OfficeStats, Profile, Reminder};

use crate::error::Result;
use crate::gate::{self, CurrentProfile, STAFF_ROLES};
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub profile: Profile,
    pub today: String,
    pub stats: OfficeStats,
    pub appointments: Vec<Appointment>,
    pub reminders: Vec<Reminder>,
}

/// Render the dashboard for a signed-in psychologist or admin.
pub async fn dashboard_page(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Result<Response> {
    let decision = gate::check_page(&state, &headers, &uri, STAFF_ROLES).await;
    let profile = match decision.into_profile() {
        Ok(profile) => profile,
        Err(response) => return Ok(response),
    };

    let pool = state.db.pool();
    let today = Local::now().date_naive();
    let today_str = today.format("%Y-%m-%d").to_string();

    let stats = stats::office_stats(pool, &profile.id, today).await?;
    let filter = AppointmentFilter {
        status: Some(AppointmentStatus::Pending),
        date: Some(today_str.clone()),
        limit: None,
    };
    let appointments = appointment::list_appointments(pool, &profile.id, &filter).await?;
    let reminders = reminder::list_reminders(pool, &profile.id, Some(false)).await?;

    Ok(DashboardTemplate {
        profile,
        today: today_str,
        stats,
        appointments,
        reminders,
    }
    .into_response())
}

/// Dashboard statistics as JSON.
pub async fn stats_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
) -> Result<Json<OfficeStats>> {
    let today = Local::now().date_naive();
    let stats = stats::office_stats(state.db.pool(), &profile.id, today).await?;
    Ok(Json(stats))
}
