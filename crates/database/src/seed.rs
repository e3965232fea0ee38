//! Demo data for a fresh local database.

use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewAppointment, NewAttention, NewReminder, Profile, ReminderCategory, Role};
use crate::{appointment, attention, password, profile, reminder, student, Result};

/// Password shared by the demo accounts.
pub const DEMO_PASSWORD: &str = "demo1234";

/// Email of the demo psychologist account.
pub const DEMO_PSYCHOLOGIST_EMAIL: &str = "psychologist@school.test";

/// Email of the demo administrator account.
pub const DEMO_ADMIN_EMAIL: &str = "admin@school.test";

const CLASSROOMS: &[(&str, &str, &str, &[(&str, &str)])] = &[
    (
        "Primary",
        "5th",
        "A",
        &[("Ana", "Garcia"), ("Luis", "Fernandez"), ("Mariana", "Castro")],
    ),
    (
        "Primary",
        "6th",
        "B",
        &[("Diego", "Morales"), ("Lucia", "Garcia"), ("Tomas", "Rivera")],
    ),
    (
        "Secondary",
        "1st",
        "A",
        &[("Valeria", "Rojas"), ("Mateo", "Vargas"), ("Camila", "Torres")],
    ),
];

/// Insert demo rows when the database has no profiles yet.
///
/// Returns `true` when data was inserted. Appointment dates are placed
/// relative to `today`.
pub async fn seed_demo_data(pool: &SqlitePool, today: NaiveDate) -> Result<bool> {
    if profile::count_profiles(pool).await? > 0 {
        return Ok(false);
    }

    tracing::info!("Seeding demo data");

    let psychologist = Profile {
        id: Uuid::new_v4().to_string(),
        email: DEMO_PSYCHOLOGIST_EMAIL.to_string(),
        full_name: "Maria Lopez".to_string(),
        role: "Psychologist".to_string(),
        is_active: true,
    };
    let admin = Profile {
        id: Uuid::new_v4().to_string(),
        email: DEMO_ADMIN_EMAIL.to_string(),
        full_name: "Office Administrator".to_string(),
        role: Role::Admin.to_string(),
        is_active: true,
    };
    for p in [&psychologist, &admin] {
        let hash = password::hash_password(DEMO_PASSWORD)?;
        profile::create_profile(pool, p, Some(&hash)).await?;
    }

    for (level, grade, section, students) in CLASSROOMS {
        let classroom_id = student::create_classroom(pool, level, grade, section).await?;
        for (first, last) in *students {
            student::create_student(pool, first, last, classroom_id).await?;
        }
    }

    let day = |offset: i64| (today + Duration::days(offset)).format("%Y-%m-%d").to_string();

    for (name, grade, offset, time) in [
        ("Ana Garcia", "5th A", 0, "09:00"),
        ("Diego Morales", "6th B", 0, "11:30"),
        ("Valeria Rojas", "1st A", 2, "10:00"),
    ] {
        appointment::create_appointment(
            pool,
            &psychologist.id,
            &NewAppointment {
                student_name: name.to_string(),
                grade: grade.to_string(),
                date: day(offset),
                time: time.to_string(),
            },
        )
        .await?;
    }

    attention::create_attention(
        pool,
        &psychologist.id,
        &NewAttention {
            student_name: "Luis Fernandez".to_string(),
            grade: "5th A".to_string(),
            date: day(-3),
            time: "10:15".to_string(),
            reason: "Teacher reports frequent distraction and unfinished classwork.".to_string(),
            observations: "Student was cooperative and described trouble sleeping.".to_string(),
            recommendations: "Follow up in two weeks; meet with parents about routines.".to_string(),
        },
    )
    .await?;

    attention::create_attention(
        pool,
        &psychologist.id,
        &NewAttention {
            student_name: "Camila Torres".to_string(),
            grade: "1st A".to_string(),
            date: day(-1),
            time: "12:00".to_string(),
            reason: "Conflict with classmates during recess.".to_string(),
            ..Default::default()
        },
    )
    .await?;

    for (title, description, category) in [
        (
            "Send monthly report",
            "Summary of sessions for the principal",
            ReminderCategory::Info,
        ),
        (
            "Parent meeting: Fernandez",
            "Confirm date with homeroom teacher",
            ReminderCategory::Warning,
        ),
    ] {
        reminder::create_reminder(
            pool,
            &psychologist.id,
            &NewReminder {
                title: title.to_string(),
                description: description.to_string(),
                category,
            },
        )
        .await?;
    }

    tracing::info!("Demo data seeded");
    Ok(true)
}
