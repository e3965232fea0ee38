//! Student lookup.

use axum::extract::{Query, State};
use axum::Json;
use database::student::{self, DEFAULT_SEARCH_LIMIT};
use database::Student;
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Match students by any word of `q` against first or last name.
pub async fn search_api(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Student>>> {
    let students = student::search_students(state.db.pool(), &query.q, DEFAULT_SEARCH_LIMIT).await?;
    Ok(Json(students))
}
