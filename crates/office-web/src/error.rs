//! Error types for the office web server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum OfficeError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Document export error.
    #[error("Export error: {0}")]
    Report(#[from] report::ReportError),

    /// No valid session.
    #[error("Authentication required")]
    Unauthorized,

    /// Session valid but the role is not allowed.
    #[error("Forbidden")]
    Forbidden,

    /// Malformed request input.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OfficeError {
    fn status(&self) -> StatusCode {
        match self {
            OfficeError::Database(err) => match err {
                DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
                DatabaseError::AlreadyExists { .. } | DatabaseError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
                DatabaseError::Validation(_) => StatusCode::BAD_REQUEST,
                DatabaseError::Sqlx(_)
                | DatabaseError::Migration(_)
                | DatabaseError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            OfficeError::Unauthorized => StatusCode::UNAUTHORIZED,
            OfficeError::Forbidden => StatusCode::FORBIDDEN,
            OfficeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            OfficeError::Report(_) | OfficeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OfficeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Do not leak SQL details to clients.
            OfficeError::Database(DatabaseError::Sqlx(_) | DatabaseError::Migration(_)) => {
                tracing::error!("Database error: {}", self);
                "Database error".to_string()
            }
            _ if status.is_server_error() => {
                tracing::error!("{}", self);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for office handlers.
pub type Result<T> = std::result::Result<T, OfficeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use database::ValidationError;

    #[test]
    fn test_status_mapping() {
        let not_found = OfficeError::from(DatabaseError::NotFound {
            entity: "Reminder",
            id: "x".to_string(),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let transition = OfficeError::from(DatabaseError::InvalidTransition {
            entity: "Appointment",
            id: "x".to_string(),
            from: "completed".to_string(),
            to: "cancelled".to_string(),
        });
        assert_eq!(transition.status(), StatusCode::CONFLICT);

        let invalid = OfficeError::from(DatabaseError::Validation(ValidationError::Empty(
            "title".to_string(),
        )));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let hashing = OfficeError::from(DatabaseError::PasswordHash("bad salt".to_string()));
        assert_eq!(hashing.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(OfficeError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(OfficeError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
