//! Database models.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Staff roles known to the office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Psychologist,
    Assistant,
}

impl Role {
    /// Parse a role as stored by the identity provider.
    ///
    /// Surrounding whitespace and letter case are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "psychologist" => Some(Role::Psychologist),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Psychologist => "psychologist",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated staff member's identity and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Identity provider user ID.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name, printed on exported documents.
    pub full_name: String,
    /// Raw role text (see [`Role::parse`]).
    pub role: String,
    /// Whether the account may use the application.
    pub is_active: bool,
}

impl Profile {
    /// The normalized role, if the stored text names a known one.
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// A login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    /// Owning profile.
    pub profile_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Expiry timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub expires_at: String,
}

/// A logged counseling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Attention {
    pub id: String,
    pub student_name: String,
    /// Grade and section label (e.g., "3rd B").
    pub grade: String,
    /// Session date, `YYYY-MM-DD`.
    pub date: String,
    /// Session time, `HH:MM`.
    pub time: String,
    pub reason: String,
    pub observations: String,
    pub recommendations: String,
    /// Owning psychologist profile ID.
    pub psychologist_id: String,
    pub created_at: String,
}

/// Fields supplied when logging a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttention {
    pub student_name: String,
    pub grade: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub recommendations: String,
}

/// Appointment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Whether an appointment in this state may move to `next`.
    ///
    /// Only pending appointments change state.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Pending, AppointmentStatus::Completed)
                | (AppointmentStatus::Pending, AppointmentStatus::Cancelled)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: String,
    pub student_name: String,
    pub grade: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub psychologist_id: String,
    pub created_at: String,
}

/// Fields supplied when scheduling an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub student_name: String,
    pub grade: String,
    pub date: String,
    pub time: String,
}

/// Reminder category tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReminderCategory {
    #[default]
    Info,
    Warning,
    Success,
}

impl ReminderCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderCategory::Info => "info",
            ReminderCategory::Warning => "warning",
            ReminderCategory::Success => "success",
        }
    }
}

impl fmt::Display for ReminderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free-form staff note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ReminderCategory,
    pub completed: bool,
    pub psychologist_id: String,
    pub created_at: String,
}

/// Fields supplied when creating a reminder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReminder {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ReminderCategory,
}

/// Partial reminder edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ReminderCategory>,
    pub completed: Option<bool>,
}

/// A student joined with their classroom, as returned by name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Classroom level (e.g., "Primary").
    pub level: String,
    pub grade: String,
    pub section: String,
}

impl Student {
    /// Full name as typed into session forms.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Grade and section label used to autofill forms.
    pub fn grade_label(&self) -> String {
        format!("{} {}", self.grade, self.section)
    }
}
