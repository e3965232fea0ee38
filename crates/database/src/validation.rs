//! Input validation for records written by staff forms.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use crate::models::{NewAppointment, NewAttention, NewReminder, ReminderUpdate};

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    /// Not an `HH:MM` time of day.
    InvalidTime(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::InvalidDate(value) => {
                write!(f, "Invalid date '{}' (expected YYYY-MM-DD)", value)
            }
            ValidationError::InvalidTime(value) => {
                write!(f, "Invalid time '{}' (expected HH:MM)", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum length for names, grades and titles.
pub const MAX_SHORT_LENGTH: usize = 120;

/// Maximum length for free-text notes.
pub const MAX_TEXT_LENGTH: usize = 20_000;

/// Require a non-blank value no longer than `max` characters.
pub fn validate_required(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    validate_max_length(field, value, max)
}

/// Reject values longer than `max` characters.
pub fn validate_max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

/// Stored date format. Zero padding keeps text ordering chronological.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored time format.
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse a `YYYY-MM-DD` date. Unpadded months and days are accepted.
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Parse an `HH:MM` time (seconds are tolerated).
pub fn validate_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// A date in its stored form, e.g. `2024-5-1` becomes `2024-05-01`.
pub fn normalize_date(value: &str) -> Result<String, ValidationError> {
    validate_date(value).map(|date| date.format(DATE_FORMAT).to_string())
}

/// A time in its stored form, e.g. `9:30` becomes `09:30`.
pub fn normalize_time(value: &str) -> Result<String, ValidationError> {
    validate_time(value).map(|time| time.format(TIME_FORMAT).to_string())
}

/// Validate a session record and return it in stored form.
pub fn validate_new_attention(attention: &NewAttention) -> Result<NewAttention, ValidationError> {
    validate_required("student_name", &attention.student_name, MAX_SHORT_LENGTH)?;
    validate_required("grade", &attention.grade, MAX_SHORT_LENGTH)?;
    let date = normalize_date(&attention.date)?;
    let time = normalize_time(&attention.time)?;
    validate_max_length("reason", &attention.reason, MAX_TEXT_LENGTH)?;
    validate_max_length("observations", &attention.observations, MAX_TEXT_LENGTH)?;
    validate_max_length("recommendations", &attention.recommendations, MAX_TEXT_LENGTH)?;

    Ok(NewAttention {
        student_name: attention.student_name.trim().to_string(),
        grade: attention.grade.trim().to_string(),
        date,
        time,
        ..attention.clone()
    })
}

/// Validate an appointment and return it in stored form.
pub fn validate_new_appointment(appointment: &NewAppointment) -> Result<NewAppointment, ValidationError> {
    validate_required("student_name", &appointment.student_name, MAX_SHORT_LENGTH)?;
    validate_required("grade", &appointment.grade, MAX_SHORT_LENGTH)?;

    Ok(NewAppointment {
        student_name: appointment.student_name.trim().to_string(),
        grade: appointment.grade.trim().to_string(),
        date: normalize_date(&appointment.date)?,
        time: normalize_time(&appointment.time)?,
    })
}

/// Validate a reminder before insert.
pub fn validate_new_reminder(reminder: &NewReminder) -> Result<(), ValidationError> {
    validate_required("title", &reminder.title, MAX_SHORT_LENGTH)?;
    validate_max_length("description", &reminder.description, MAX_TEXT_LENGTH)?;
    Ok(())
}

/// Validate the fields present in a reminder edit.
pub fn validate_reminder_update(update: &ReminderUpdate) -> Result<(), ValidationError> {
    if let Some(title) = &update.title {
        validate_required("title", title, MAX_SHORT_LENGTH)?;
    }
    if let Some(description) = &update.description {
        validate_max_length("description", description, MAX_TEXT_LENGTH)?;
    }
    Ok(())
}
