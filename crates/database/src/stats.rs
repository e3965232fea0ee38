//! Dashboard counters for one psychologist.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::AppointmentStatus;
use crate::{appointment, attention, reminder, Result};

/// Counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OfficeStats {
    pub attentions_total: i64,
    pub attentions_this_month: i64,
    pub appointments_pending: i64,
    pub appointments_today: i64,
    pub reminders_open: i64,
}

/// Compute dashboard counters relative to `today`.
pub async fn office_stats(pool: &SqlitePool, psychologist_id: &str, today: NaiveDate) -> Result<OfficeStats> {
    let attentions_total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM attentions
        WHERE psychologist_id = ?
        "#,
    )
    .bind(psychologist_id)
    .fetch_one(pool)
    .await?;

    let month_start = today.with_day(1).unwrap_or(today);
    let attentions_this_month =
        attention::count_since(pool, psychologist_id, &month_start.format("%Y-%m-%d").to_string()).await?;

    let appointments_pending =
        appointment::count_by_status(pool, psychologist_id, AppointmentStatus::Pending).await?;

    let appointments_today = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM appointments
        WHERE psychologist_id = ? AND date = ? AND status = ?
        "#,
    )
    .bind(psychologist_id)
    .bind(today.format("%Y-%m-%d").to_string())
    .bind(AppointmentStatus::Pending)
    .fetch_one(pool)
    .await?;

    let reminders_open = reminder::count_open(pool, psychologist_id).await?;

    Ok(OfficeStats {
        attentions_total,
        attentions_this_month,
        appointments_pending,
        appointments_today,
        reminders_open,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAppointment, NewAttention, NewReminder};
    use crate::test_support::{test_db, test_profile};

    #[tokio::test]
    async fn test_office_stats() {
        let db = test_db().await;
        let owner = test_profile(db.pool(), "psy@school.test").await;
        let today = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();

        for date in ["2024-04-30", "2024-05-02"] {
            attention::create_attention(
                db.pool(),
                &owner.id,
                &NewAttention {
                    student_name: "Ana Torres".to_string(),
                    grade: "5th A".to_string(),
                    date: date.to_string(),
                    time: "10:00".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        for date in ["2024-05-14", "2024-05-20"] {
            appointment::create_appointment(
                db.pool(),
                &owner.id,
                &NewAppointment {
                    student_name: "Luis Garcia".to_string(),
                    grade: "3rd B".to_string(),
                    date: date.to_string(),
                    time: "11:00".to_string(),
                },
            )
            .await
            .unwrap();
        }

        reminder::create_reminder(
            db.pool(),
            &owner.id,
            &NewReminder {
                title: "Send report".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stats = office_stats(db.pool(), &owner.id, today).await.unwrap();
        assert_eq!(
            stats,
            OfficeStats {
                attentions_total: 2,
                attentions_this_month: 1,
                appointments_pending: 2,
                appointments_today: 1,
                reminders_open: 1,
            }
        );
    }
}
