//! Attention records and their PDF export.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Local;
use database::attention::{self, AttentionFilter};
use database::{Attention, NewAttention, Profile};
use report::AttentionReport;
use serde::Deserialize;
use tracing::info;

use crate::error::{OfficeError, Result};
use crate::gate::CurrentProfile;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// A new record, optionally closing the appointment it came from.
#[derive(Deserialize)]
pub struct CreateAttention {
    #[serde(flatten)]
    pub attention: NewAttention,
    pub appointment_id: Option<String>,
}

pub async fn list_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Attention>>> {
    if query.limit.is_some_and(|limit| limit <= 0) {
        return Err(OfficeError::BadRequest("limit must be positive".to_string()));
    }

    let filter = AttentionFilter {
        date: query.date,
        search: query.search,
        limit: query.limit,
    };
    let attentions = attention::list_attentions(state.db.pool(), &profile.id, &filter).await?;
    Ok(Json(attentions))
}

pub async fn create_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Json(body): Json<CreateAttention>,
) -> Result<(StatusCode, Json<Attention>)> {
    let pool = state.db.pool();
    let created = match body.appointment_id.as_deref() {
        Some(appointment_id) => {
            attention::log_session(pool, &profile.id, &body.attention, appointment_id).await?
        }
        None => attention::create_attention(pool, &profile.id, &body.attention).await?,
    };
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<String>,
) -> Result<Json<Attention>> {
    let found = attention::get_attention(state.db.pool(), &profile.id, &id).await?;
    Ok(Json(found))
}

pub async fn delete_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    attention::delete_attention(state.db.pool(), &profile.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Owned export input, detached from the stored row.
pub(crate) fn report_for(record: Attention, psychologist: &Profile) -> AttentionReport {
    AttentionReport {
        student_name: record.student_name,
        grade: record.grade,
        date: record.date,
        time: record.time,
        reason: record.reason,
        observations: record.observations,
        recommendations: record.recommendations,
        psychologist_name: psychologist.full_name.clone(),
    }
}

/// Download a record as a PDF attachment.
pub async fn pdf_api(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let record = attention::get_attention(state.db.pool(), &profile.id, &id).await?;
    let report = report_for(record, &profile);
    let generated_at = Local::now().naive_local();

    // Layout and encoding are CPU-bound.
    let exported = tokio::task::spawn_blocking(move || report::export_attention(&report, generated_at))
        .await
        .map_err(|e| OfficeError::Internal(format!("Export task failed: {}", e)))??;

    info!(id, pages = exported.page_count, file = %exported.file_name, "Exported attention PDF");

    let disposition = format!("attachment; filename=\"{}\"", exported.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.bytes,
    ))
}
