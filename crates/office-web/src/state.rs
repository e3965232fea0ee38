//! Application state shared across handlers.

use std::time::Duration;

use database::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Login portal URL for unauthenticated page visits.
    pub portal_url: String,
    /// Lifetime of new login sessions.
    pub session_ttl: Duration,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, portal_url: impl Into<String>, session_ttl: Duration) -> Self {
        Self {
            db,
            portal_url: portal_url.into(),
            session_ttl,
        }
    }
}
