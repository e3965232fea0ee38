//! Counseling session records.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Attention, AppointmentStatus, NewAttention};
use crate::search;
use crate::validation;

/// Filters for a psychologist's session history.
#[derive(Debug, Clone, Default)]
pub struct AttentionFilter {
    /// Exact `YYYY-MM-DD` date, padded before comparison.
    pub date: Option<String>,
    /// Student name search (tokens combined with OR).
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// Log a session.
pub async fn create_attention(
    pool: &SqlitePool,
    psychologist_id: &str,
    attention: &NewAttention,
) -> Result<Attention> {
    let attention = validation::validate_new_attention(attention)?;

    let mut conn = pool.acquire().await?;
    let created = insert_attention(&mut conn, psychologist_id, &attention).await?;

    tracing::info!(id = %created.id, date = %created.date, "Attention logged");
    Ok(created)
}

/// Log a session that closes a pending appointment.
///
/// The appointment is marked completed and the attention inserted in one
/// transaction. If the appointment is missing or not pending, nothing is
/// written.
pub async fn log_session(
    pool: &SqlitePool,
    psychologist_id: &str,
    attention: &NewAttention,
    appointment_id: &str,
) -> Result<Attention> {
    let attention = validation::validate_new_attention(attention)?;

    let mut tx = pool.begin().await?;

    let completed = sqlx::query(
        r#"
        UPDATE appointments
        SET status = ?
        WHERE id = ? AND psychologist_id = ? AND status = ?
        "#,
    )
    .bind(AppointmentStatus::Completed)
    .bind(appointment_id)
    .bind(psychologist_id)
    .bind(AppointmentStatus::Pending)
    .execute(&mut *tx)
    .await?;

    if completed.rows_affected() == 0 {
        let status = sqlx::query_scalar::<_, AppointmentStatus>(
            r#"
            SELECT status FROM appointments
            WHERE id = ? AND psychologist_id = ?
            "#,
        )
        .bind(appointment_id)
        .bind(psychologist_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back.
        return Err(match status {
            Some(status) => DatabaseError::InvalidTransition {
                entity: "Appointment",
                id: appointment_id.to_string(),
                from: status.to_string(),
                to: AppointmentStatus::Completed.to_string(),
            },
            None => DatabaseError::NotFound {
                entity: "Appointment",
                id: appointment_id.to_string(),
            },
        });
    }

    let created = insert_attention(&mut tx, psychologist_id, &attention).await?;
    tx.commit().await?;

    tracing::info!(
        id = %created.id,
        appointment_id,
        "Attention logged and appointment completed"
    );
    Ok(created)
}

/// `attention` must already be in stored form.
async fn insert_attention(
    conn: &mut SqliteConnection,
    psychologist_id: &str,
    attention: &NewAttention,
) -> Result<Attention> {
    let id = Uuid::new_v4().to_string();
    let created = sqlx::query_as::<_, Attention>(
        r#"
        INSERT INTO attentions
            (id, student_name, student_name_folded, grade, date, time, reason, observations,
             recommendations, psychologist_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, student_name, grade, date, time, reason, observations, recommendations,
            psychologist_id, created_at
        "#,
    )
    .bind(&id)
    .bind(&attention.student_name)
    .bind(search::fold(&attention.student_name))
    .bind(&attention.grade)
    .bind(&attention.date)
    .bind(&attention.time)
    .bind(&attention.reason)
    .bind(&attention.observations)
    .bind(&attention.recommendations)
    .bind(psychologist_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(created)
}

/// Get one of a psychologist's session records by ID.
pub async fn get_attention(pool: &SqlitePool, psychologist_id: &str, id: &str) -> Result<Attention> {
    sqlx::query_as::<_, Attention>(
        r#"
        SELECT id, student_name, grade, date, time, reason, observations, recommendations,
            psychologist_id, created_at
        FROM attentions
        WHERE id = ? AND psychologist_id = ?
        "#,
    )
    .bind(id)
    .bind(psychologist_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Attention",
        id: id.to_string(),
    })
}

/// List a psychologist's session history, most recent first.
pub async fn list_attentions(
    pool: &SqlitePool,
    psychologist_id: &str,
    filter: &AttentionFilter,
) -> Result<Vec<Attention>> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT id, student_name, grade, date, time, reason, observations, recommendations,
            psychologist_id, created_at
        FROM attentions
        WHERE psychologist_id = "#,
    );
    builder.push_bind(psychologist_id.to_string());

    if let Some(date) = &filter.date {
        builder
            .push(" AND date = ")
            .push_bind(validation::normalize_date(date)?);
    }

    let tokens = filter
        .search
        .as_deref()
        .map(search::tokenize)
        .unwrap_or_default();
    if !tokens.is_empty() {
        builder.push(" AND ");
        search::push_token_filter(&mut builder, &tokens, &["student_name_folded"]);
    }

    builder.push(" ORDER BY date DESC, time DESC, created_at DESC");

    if let Some(limit) = filter.limit {
        builder.push(" LIMIT ").push_bind(limit);
    }

    let attentions = builder.build_query_as::<Attention>().fetch_all(pool).await?;
    Ok(attentions)
}

/// Delete one of a psychologist's session records.
pub async fn delete_attention(pool: &SqlitePool, psychologist_id: &str, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM attentions
        WHERE id = ? AND psychologist_id = ?
        "#,
    )
    .bind(id)
    .bind(psychologist_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Attention",
            id: id.to_string(),
        });
    }

    tracing::info!(id, "Attention deleted");
    Ok(())
}

/// Count a psychologist's sessions dated on or after `since` (`YYYY-MM-DD`).
pub async fn count_since(pool: &SqlitePool, psychologist_id: &str, since: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM attentions
        WHERE psychologist_id = ? AND date >= ?
        "#,
    )
    .bind(psychologist_id)
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
