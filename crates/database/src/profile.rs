//! Profile lookups.
//!
//! Profiles belong to the identity provider; the application only reads them.
//! [`create_profile`] exists for the local demo seed and tests.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Profile;

/// Create a profile with an optional local password digest.
pub async fn create_profile(
    pool: &SqlitePool,
    profile: &Profile,
    password_hash: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, email, full_name, role, is_active, password_hash)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.email)
    .bind(&profile.full_name)
    .bind(&profile.role)
    .bind(profile.is_active)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Profile",
                    id: profile.email.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a profile by ID.
pub async fn get_profile(pool: &SqlitePool, id: &str) -> Result<Profile> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, email, full_name, role, is_active
        FROM profiles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Profile",
        id: id.to_string(),
    })
}

/// Get a profile by login email (case-insensitive).
pub async fn get_profile_by_email(pool: &SqlitePool, email: &str) -> Result<Profile> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, email, full_name, role, is_active
        FROM profiles
        WHERE email = ? COLLATE NOCASE
        "#,
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Profile",
        id: email.to_string(),
    })
}

/// Get the stored password digest for a profile, if it has one.
pub async fn get_password_hash(pool: &SqlitePool, profile_id: &str) -> Result<Option<String>> {
    let hash = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT password_hash
        FROM profiles
        WHERE id = ?
        "#,
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .await?;

    Ok(hash.flatten())
}

/// List all profiles.
pub async fn list_profiles(pool: &SqlitePool) -> Result<Vec<Profile>> {
    let profiles = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, email, full_name, role, is_active
        FROM profiles
        ORDER BY full_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}

/// Count total profiles.
pub async fn count_profiles(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM profiles
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
