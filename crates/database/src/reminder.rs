//! Staff reminders.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{NewReminder, Reminder, ReminderUpdate};
use crate::validation;

/// Create a reminder.
pub async fn create_reminder(
    pool: &SqlitePool,
    psychologist_id: &str,
    reminder: &NewReminder,
) -> Result<Reminder> {
    validation::validate_new_reminder(reminder)?;

    let id = Uuid::new_v4().to_string();
    let created = sqlx::query_as::<_, Reminder>(
        r#"
        INSERT INTO reminders (id, title, description, category, completed, psychologist_id)
        VALUES (?, ?, ?, ?, 0, ?)
        RETURNING id, title, description, category, completed, psychologist_id, created_at
        "#,
    )
    .bind(&id)
    .bind(reminder.title.trim())
    .bind(&reminder.description)
    .bind(reminder.category)
    .bind(psychologist_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(id = %created.id, "Reminder created");
    Ok(created)
}

/// Get one of a psychologist's reminders by ID.
pub async fn get_reminder(pool: &SqlitePool, psychologist_id: &str, id: &str) -> Result<Reminder> {
    sqlx::query_as::<_, Reminder>(
        r#"
        SELECT id, title, description, category, completed, psychologist_id, created_at
        FROM reminders
        WHERE id = ? AND psychologist_id = ?
        "#,
    )
    .bind(id)
    .bind(psychologist_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Reminder",
        id: id.to_string(),
    })
}

/// List a psychologist's reminders, newest first.
pub async fn list_reminders(
    pool: &SqlitePool,
    psychologist_id: &str,
    completed: Option<bool>,
) -> Result<Vec<Reminder>> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT id, title, description, category, completed, psychologist_id, created_at
        FROM reminders
        WHERE psychologist_id = "#,
    );
    builder.push_bind(psychologist_id.to_string());

    if let Some(completed) = completed {
        builder.push(" AND completed = ").push_bind(completed);
    }

    builder.push(" ORDER BY created_at DESC, rowid DESC");

    let reminders = builder.build_query_as::<Reminder>().fetch_all(pool).await?;
    Ok(reminders)
}

/// Apply a partial edit to a reminder.
pub async fn update_reminder(
    pool: &SqlitePool,
    psychologist_id: &str,
    id: &str,
    update: &ReminderUpdate,
) -> Result<Reminder> {
    validation::validate_reminder_update(update)?;

    let updated = sqlx::query_as::<_, Reminder>(
        r#"
        UPDATE reminders
        SET title = COALESCE(?, title),
            description = COALESCE(?, description),
            category = COALESCE(?, category),
            completed = COALESCE(?, completed)
        WHERE id = ? AND psychologist_id = ?
        RETURNING id, title, description, category, completed, psychologist_id, created_at
        "#,
    )
    .bind(update.title.as_deref().map(str::trim))
    .bind(update.description.as_deref())
    .bind(update.category)
    .bind(update.completed)
    .bind(id)
    .bind(psychologist_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Reminder",
        id: id.to_string(),
    })?;

    Ok(updated)
}

/// Set a reminder's completion flag.
pub async fn set_completed(
    pool: &SqlitePool,
    psychologist_id: &str,
    id: &str,
    completed: bool,
) -> Result<Reminder> {
    update_reminder(
        pool,
        psychologist_id,
        id,
        &ReminderUpdate {
            completed: Some(completed),
            ..Default::default()
        },
    )
    .await
}

/// Flip a reminder's completion flag.
pub async fn toggle_completed(pool: &SqlitePool, psychologist_id: &str, id: &str) -> Result<Reminder> {
    sqlx::query_as::<_, Reminder>(
        r#"
        UPDATE reminders
        SET completed = NOT completed
        WHERE id = ? AND psychologist_id = ?
        RETURNING id, title, description, category, completed, psychologist_id, created_at
        "#,
    )
    .bind(id)
    .bind(psychologist_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Reminder",
        id: id.to_string(),
    })
}

/// Delete a reminder.
pub async fn delete_reminder(pool: &SqlitePool, psychologist_id: &str, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM reminders
        WHERE id = ? AND psychologist_id = ?
        "#,
    )
    .bind(id)
    .bind(psychologist_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Reminder",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count a psychologist's reminders that are not completed.
pub async fn count_open(pool: &SqlitePool, psychologist_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM reminders
        WHERE psychologist_id = ? AND completed = 0
        "#,
    )
    .bind(psychologist_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
