//! Appointment scheduling.
//!
//! Appointments are created pending and move once: to completed when the
//! session is logged, or to cancelled by staff.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::validation;

/// Equality filters for listing a psychologist's appointments.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    /// Exact `YYYY-MM-DD` date, padded before comparison.
    pub date: Option<String>,
    pub limit: Option<i64>,
}

/// Schedule a new pending appointment.
pub async fn create_appointment(
    pool: &SqlitePool,
    psychologist_id: &str,
    appointment: &NewAppointment,
) -> Result<Appointment> {
    let appointment = validation::validate_new_appointment(appointment)?;

    let id = Uuid::new_v4().to_string();
    let created = sqlx::query_as::<_, Appointment>(
        r#"
        INSERT INTO appointments (id, student_name, grade, date, time, status, psychologist_id)
        VALUES (?, ?, ?, ?, ?, 'pending', ?)
        RETURNING id, student_name, grade, date, time, status, psychologist_id, created_at
        "#,
    )
    .bind(&id)
    .bind(&appointment.student_name)
    .bind(&appointment.grade)
    .bind(&appointment.date)
    .bind(&appointment.time)
    .bind(psychologist_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(id = %created.id, date = %created.date, "Appointment scheduled");
    Ok(created)
}

/// Get one of a psychologist's appointments by ID, whatever its status.
pub async fn get_appointment(pool: &SqlitePool, psychologist_id: &str, id: &str) -> Result<Appointment> {
    sqlx::query_as::<_, Appointment>(
        r#"
        SELECT id, student_name, grade, date, time, status, psychologist_id, created_at
        FROM appointments
        WHERE id = ? AND psychologist_id = ?
        "#,
    )
    .bind(id)
    .bind(psychologist_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Appointment",
        id: id.to_string(),
    })
}

/// List a psychologist's appointments ordered by date, then time.
pub async fn list_appointments(
    pool: &SqlitePool,
    psychologist_id: &str,
    filter: &AppointmentFilter,
) -> Result<Vec<Appointment>> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT id, student_name, grade, date, time, status, psychologist_id, created_at
        FROM appointments
        WHERE psychologist_id = "#,
    );
    builder.push_bind(psychologist_id.to_string());

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(date) = &filter.date {
        builder
            .push(" AND date = ")
            .push_bind(validation::normalize_date(date)?);
    }

    builder.push(" ORDER BY date, time");

    if let Some(limit) = filter.limit {
        builder.push(" LIMIT ").push_bind(limit);
    }

    let appointments = builder.build_query_as::<Appointment>().fetch_all(pool).await?;
    Ok(appointments)
}

/// Move an appointment to a new status.
///
/// Fails with [`DatabaseError::InvalidTransition`] unless the appointment is
/// pending and `status` is completed or cancelled.
pub async fn update_status(
    pool: &SqlitePool,
    psychologist_id: &str,
    id: &str,
    status: AppointmentStatus,
) -> Result<Appointment> {
    let current = get_appointment(pool, psychologist_id, id).await?;
    if !current.status.can_transition_to(status) {
        return Err(DatabaseError::InvalidTransition {
            entity: "Appointment",
            id: id.to_string(),
            from: current.status.to_string(),
            to: status.to_string(),
        });
    }

    // The status guard keeps a concurrent transition from being overwritten.
    let updated = sqlx::query_as::<_, Appointment>(
        r#"
        UPDATE appointments
        SET status = ?
        WHERE id = ? AND psychologist_id = ? AND status = 'pending'
        RETURNING id, student_name, grade, date, time, status, psychologist_id, created_at
        "#,
    )
    .bind(status)
    .bind(id)
    .bind(psychologist_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::InvalidTransition {
        entity: "Appointment",
        id: id.to_string(),
        from: "non-pending".to_string(),
        to: status.to_string(),
    })?;

    tracing::info!(id, status = %status, "Appointment status changed");
    Ok(updated)
}

/// Count a psychologist's appointments with a given status.
pub async fn count_by_status(
    pool: &SqlitePool,
    psychologist_id: &str,
    status: AppointmentStatus,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM appointments
        WHERE psychologist_id = ? AND status = ?
        "#,
    )
    .bind(psychologist_id)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_profile};

    fn new_appointment(date: &str, time: &str) -> NewAppointment {
        NewAppointment {
            student_name: "Ana Torres".to_string(),
            grade: "5th A".to_string(),
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_time() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;

        create_appointment(db.pool(), &owner.id, &new_appointment("2024-05-02", "08:00"))
            .await
            .unwrap();
        create_appointment(db.pool(), &owner.id, &new_appointment("2024-05-01", "15:00"))
            .await
            .unwrap();
        create_appointment(db.pool(), &owner.id, &new_appointment("2024-05-01", "09:00"))
            .await
            .unwrap();

        let all = list_appointments(db.pool(), &owner.id, &AppointmentFilter::default())
            .await
            .unwrap();
        let slots: Vec<(&str, &str)> = all.iter().map(|a| (a.date.as_str(), a.time.as_str())).collect();
        assert_eq!(
            slots,
            vec![("2024-05-01", "09:00"), ("2024-05-01", "15:00"), ("2024-05-02", "08:00")]
        );

        let on_day = list_appointments(
            db.pool(),
            &owner.id,
            &AppointmentFilter {
                date: Some("2024-05-01".to_string()),
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].time, "09:00");
    }

    #[tokio::test]
    async fn test_unpadded_input_is_stored_padded() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;

        let created = create_appointment(db.pool(), &owner.id, &new_appointment("2024-5-1", "9:30"))
            .await
            .unwrap();
        assert_eq!(created.date, "2024-05-01");
        assert_eq!(created.time, "09:30");

        create_appointment(db.pool(), &owner.id, &new_appointment("2024-05-01", "10:00"))
            .await
            .unwrap();

        let on_day = list_appointments(
            db.pool(),
            &owner.id,
            &AppointmentFilter {
                date: Some("2024-5-1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let times: Vec<&str> = on_day.iter().map(|a| a.time.as_str()).collect();
        assert_eq!(times, vec!["09:30", "10:00"]);

        let bad_filter = list_appointments(
            db.pool(),
            &owner.id,
            &AppointmentFilter {
                date: Some("May 1".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad_filter, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cancelled_leaves_pending_view_but_stays_retrievable() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;

        let appt = create_appointment(db.pool(), &owner.id, &new_appointment("2024-05-01", "09:00"))
            .await
            .unwrap();
        assert_eq!(appt.status, AppointmentStatus::Pending);

        update_status(db.pool(), &owner.id, &appt.id, AppointmentStatus::Cancelled)
            .await
            .unwrap();

        let pending = list_appointments(
            db.pool(),
            &owner.id,
            &AppointmentFilter {
                status: Some(AppointmentStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(pending.is_empty());

        let fetched = get_appointment(db.pool(), &owner.id, &appt.id).await.unwrap();
        assert_eq!(fetched.status, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_only_pending_appointments_transition() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;

        let appt = create_appointment(db.pool(), &owner.id, &new_appointment("2024-05-01", "09:00"))
            .await
            .unwrap();
        update_status(db.pool(), &owner.id, &appt.id, AppointmentStatus::Completed)
            .await
            .unwrap();

        let result = update_status(db.pool(), &owner.id, &appt.id, AppointmentStatus::Cancelled).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTransition { .. })));

        let result = update_status(db.pool(), &owner.id, &appt.id, AppointmentStatus::Pending).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_appointments_are_scoped_to_owner() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;
        let other = test_profile(db.pool(), "other@school.test").await;

        let appt = create_appointment(db.pool(), &owner.id, &new_appointment("2024-05-01", "09:00"))
            .await
            .unwrap();

        let result = get_appointment(db.pool(), &other.id, &appt.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert_eq!(
            count_by_status(db.pool(), &owner.id, AppointmentStatus::Pending).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_invalid_date_rejected() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;

        let result = create_appointment(db.pool(), &owner.id, &new_appointment("tomorrow", "09:00")).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
