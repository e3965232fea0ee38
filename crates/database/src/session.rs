//! Login session persistence.

use std::time::Duration;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Profile, Session};

/// Create a session for a profile that expires after `ttl`.
pub async fn create_session(pool: &SqlitePool, profile_id: &str, ttl: Duration) -> Result<Session> {
    let token = Uuid::new_v4().simple().to_string();
    let modifier = format!("+{} seconds", ttl.as_secs());

    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (token, profile_id, expires_at)
        VALUES (?, ?, datetime('now', ?))
        RETURNING token, profile_id, created_at, expires_at
        "#,
    )
    .bind(&token)
    .bind(profile_id)
    .bind(modifier)
    .fetch_one(pool)
    .await?;

    tracing::debug!(profile_id, expires_at = %session.expires_at, "Session created");
    Ok(session)
}

/// Resolve an unexpired session token to its profile.
///
/// Unknown and expired tokens resolve to `None`.
pub async fn get_session_profile(pool: &SqlitePool, token: &str) -> Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT p.id, p.email, p.full_name, p.role, p.is_active
        FROM sessions s
        JOIN profiles p ON p.id = s.profile_id
        WHERE s.token = ? AND s.expires_at > datetime('now')
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Delete a session (logout).
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Session",
            id: token.to_string(),
        });
    }

    Ok(())
}

/// Delete every expired session.
pub async fn prune_expired(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE expires_at <= datetime('now')
        "#,
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
