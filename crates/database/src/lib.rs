//! SQLite persistence layer for the school psychology office.
//!
//! This crate provides async database operations for profiles, login
//! sessions, counseling session records (attentions), appointments,
//! reminders and the student lookup, using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{appointment, models::NewAppointment, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:office.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Schedule an appointment
//!     let new = NewAppointment {
//!         student_name: "Ana Garcia".to_string(),
//!         grade: "5th A".to_string(),
//!         date: "2024-05-14".to_string(),
//!         time: "09:00".to_string(),
//!     };
//!     appointment::create_appointment(db.pool(), "psychologist-id", &new).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod appointment;
pub mod attention;
pub mod error;
pub mod models;
pub mod password;
pub mod profile;
pub mod reminder;
pub mod search;
pub mod seed;
pub mod session;
pub mod stats;
pub mod student;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    Appointment, AppointmentStatus, Attention, NewAppointment, NewAttention, NewReminder,
    Profile, Reminder, ReminderCategory, ReminderUpdate, Role, Session, Student,
};
pub use stats::OfficeStats;
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/office.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing; use a single connection)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_profile};
    use std::time::Duration;

    #[tokio::test]
    async fn test_profile_lookup() {
        let db = test_db().await;
        let created = test_profile(db.pool(), "Psy@School.test").await;

        let fetched = profile::get_profile(db.pool(), &created.id).await.unwrap();
        assert_eq!(fetched, created);

        let by_email = profile::get_profile_by_email(db.pool(), " psy@school.test ").await.unwrap();
        assert_eq!(by_email.id, created.id);

        let duplicate = profile::create_profile(db.pool(), &created, None).await;
        assert!(matches!(duplicate, Err(DatabaseError::AlreadyExists { .. })));

        let missing = profile::get_profile(db.pool(), "nope").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));

        assert_eq!(profile::list_profiles(db.pool()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;

        let session = session::create_session(db.pool(), &owner.id, Duration::from_secs(3600))
            .await
            .unwrap();
        let resolved = session::get_session_profile(db.pool(), &session.token).await.unwrap();
        assert_eq!(resolved.map(|p| p.id), Some(owner.id.clone()));

        session::delete_session(db.pool(), &session.token).await.unwrap();
        let resolved = session::get_session_profile(db.pool(), &session.token).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_do_not_resolve() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;

        let session = session::create_session(db.pool(), &owner.id, Duration::ZERO)
            .await
            .unwrap();
        let resolved = session::get_session_profile(db.pool(), &session.token).await.unwrap();
        assert!(resolved.is_none());

        assert_eq!(session::prune_expired(db.pool()).await.unwrap(), 1);
    }

    #[test]
    fn test_role_parse_normalizes() {
        assert_eq!(Role::parse("  Psychologist "), Some(Role::Psychologist));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("teacher"), None);
    }

    #[test]
    fn test_appointment_transitions() {
        use AppointmentStatus::*;
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }
}
