// ABOUTME: Appointment models covering booking, rescheduling and status transitions
// ABOUTME: Appointment, AppointmentStatus, BookedInterval and validated request bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::appointments::{MAX_NOTES_LENGTH, MAX_REASON_LENGTH};
use crate::constants::calendar::MAX_YEAR;
use crate::constants::slots::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::utils::datetime::require_local_datetime;
use crate::utils::uuid::parse_uuid_field;

/// Appointment lifecycle status
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    /// Booked and upcoming
    Scheduled,
    /// Took place
    Completed,
    /// Called off; frees the slot
    Cancelled,
    /// Client did not attend
    NoShow,
    /// Moved to a new time; still occupies its slot
    Rescheduled,
}

impl AppointmentStatus {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
            Self::Rescheduled => "rescheduled",
        }
    }

    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Whether moving from `self` to `next` is a legal transition
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        !self.is_terminal() && !matches!(next, Self::Scheduled)
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no-show" => Ok(Self::NoShow),
            "rescheduled" => Ok(Self::Rescheduled),
            _ => Err(AppError::invalid_input(format!(
                "Invalid appointment status: {s}"
            ))),
        }
    }
}

/// Half-open `[start, end)` interval occupied by a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    /// Inclusive start
    pub start: NaiveDateTime,
    /// Exclusive end
    pub end: NaiveDateTime,
}

impl BookedInterval {
    /// Whether `[start, end)` intersects this interval; touching endpoints do not
    #[must_use]
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end && end > self.start
    }
}

/// A booked session between a coach and a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Unique identifier
    pub id: Uuid,
    /// Coach running the session
    pub coach_id: Uuid,
    /// Client attending the session
    pub client_id: Uuid,
    /// Local start time
    pub scheduled_at: NaiveDateTime,
    /// Local end time, `scheduled_at + duration_minutes`
    pub end_time: NaiveDateTime,
    /// Session length
    pub duration_minutes: u32,
    /// Lifecycle status
    pub status: AppointmentStatus,
    /// Reason given on cancellation
    pub cancellation_reason: Option<String>,
    /// Free-form booking notes
    pub notes: Option<String>,
    /// Whether the reminder for the current time has gone out
    pub reminder_sent: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Interval this appointment occupies
    #[must_use]
    pub const fn interval(&self) -> BookedInterval {
        BookedInterval {
            start: self.scheduled_at,
            end: self.end_time,
        }
    }
}

fn validate_duration(raw: Option<i64>, errors: &mut ValidationErrors) -> Option<u32> {
    let Some(raw) = raw else {
        errors.add("durationMinutes", "The durationMinutes field is required.");
        return None;
    };
    match u32::try_from(raw) {
        Ok(minutes) if (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) => {
            Some(minutes)
        }
        _ => {
            errors.add(
                "durationMinutes",
                format!(
                    "The durationMinutes must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES}."
                ),
            );
            None
        }
    }
}

fn validate_text(raw: Option<&str>, field: &str, max: usize, errors: &mut ValidationErrors) {
    if raw.is_some_and(|text| text.chars().count() > max) {
        errors.add(
            field,
            format!("The {field} may not be greater than {max} characters."),
        );
    }
}

/// End of a session starting at `start` and lasting `minutes`
///
/// # Errors
///
/// Returns `ValidationFailed` on `scheduledAt` when the session would end after
/// the last supported year
pub fn end_of(start: NaiveDateTime, minutes: u32) -> AppResult<NaiveDateTime> {
    start
        .checked_add_signed(Duration::minutes(i64::from(minutes)))
        .filter(|end| end.year() <= MAX_YEAR)
        .ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add(
                "scheduledAt",
                format!("The session must end no later than the year {MAX_YEAR}."),
            );
            AppError::validation(errors)
        })
}

/// Request body for booking an appointment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    /// Coach id
    pub coach_id: Option<String>,
    /// Client id
    pub client_id: Option<String>,
    /// Local start datetime
    pub scheduled_at: Option<String>,
    /// Session length in minutes
    pub duration_minutes: Option<i64>,
    /// Optional notes
    pub notes: Option<String>,
}

/// Validated booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    /// Coach id
    pub coach_id: Uuid,
    /// Client id
    pub client_id: Uuid,
    /// Local start
    pub scheduled_at: NaiveDateTime,
    /// Session length
    pub duration_minutes: u32,
    /// Notes
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Interval the booking would occupy
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the session would end outside the calendar
    pub fn interval(&self) -> AppResult<BookedInterval> {
        Ok(BookedInterval {
            start: self.scheduled_at,
            end: end_of(self.scheduled_at, self.duration_minutes)?,
        })
    }
}

impl BookAppointmentRequest {
    /// Validate the booking request
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` listing every offending field
    pub fn validate(&self) -> AppResult<NewAppointment> {
        let mut errors = ValidationErrors::new();
        let coach_id = parse_uuid_field(self.coach_id.as_deref(), "coachId", &mut errors);
        let client_id = parse_uuid_field(self.client_id.as_deref(), "clientId", &mut errors);
        let scheduled_at =
            require_local_datetime(self.scheduled_at.as_deref(), "scheduledAt", &mut errors);
        let duration_minutes = validate_duration(self.duration_minutes, &mut errors);
        validate_text(self.notes.as_deref(), "notes", MAX_NOTES_LENGTH, &mut errors);

        match (coach_id, client_id, scheduled_at, duration_minutes) {
            (Some(coach_id), Some(client_id), Some(scheduled_at), Some(duration_minutes))
                if errors.is_empty() =>
            {
                Ok(NewAppointment {
                    coach_id,
                    client_id,
                    scheduled_at,
                    duration_minutes,
                    notes: self.notes.clone(),
                })
            }
            _ => Err(AppError::validation(errors)),
        }
    }
}

/// Request body for cancelling an appointment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAppointmentRequest {
    /// Optional cancellation reason
    pub reason: Option<String>,
}

impl CancelAppointmentRequest {
    /// Validate and return the trimmed reason
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` if the reason is too long
    pub fn validate(&self) -> AppResult<Option<String>> {
        let mut errors = ValidationErrors::new();
        validate_text(self.reason.as_deref(), "reason", MAX_REASON_LENGTH, &mut errors);
        errors.into_result()?;
        Ok(self
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .map(str::to_owned))
    }
}

/// Request body for moving an appointment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleAppointmentRequest {
    /// New local start datetime
    pub scheduled_at: Option<String>,
    /// New length; keeps the current length when omitted
    pub duration_minutes: Option<i64>,
}

/// Validated reschedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reschedule {
    /// New local start
    pub scheduled_at: NaiveDateTime,
    /// New length when changed
    pub duration_minutes: Option<u32>,
}

impl RescheduleAppointmentRequest {
    /// Validate the reschedule request
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` listing every offending field
    pub fn validate(&self) -> AppResult<Reschedule> {
        let mut errors = ValidationErrors::new();
        let scheduled_at =
            require_local_datetime(self.scheduled_at.as_deref(), "scheduledAt", &mut errors);
        let duration_minutes = self
            .duration_minutes
            .and_then(|raw| validate_duration(Some(raw), &mut errors));

        match scheduled_at {
            Some(scheduled_at) if errors.is_empty() => Ok(Reschedule {
                scheduled_at,
                duration_minutes,
            }),
            _ => Err(AppError::validation(errors)),
        }
    }
}

/// Request body for recording the outcome of an appointment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// `completed` or `no-show`
    pub status: Option<String>,
}

impl UpdateStatusRequest {
    /// Validate the outcome status
    ///
    /// Cancellation and rescheduling have dedicated endpoints because they carry
    /// extra data, so only outcome statuses are accepted here.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for a missing or unsupported status
    pub fn validate(&self) -> AppResult<AppointmentStatus> {
        let mut errors = ValidationErrors::new();
        match self.status.as_deref().map(str::parse::<AppointmentStatus>) {
            Some(Ok(status @ (AppointmentStatus::Completed | AppointmentStatus::NoShow))) => {
                return Ok(status);
            }
            None => errors.add("status", "The status field is required."),
            Some(_) => errors.add("status", "The selected status is invalid."),
        }
        Err(AppError::validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        let booked = BookedInterval {
            start: at(9, 30),
            end: at(10, 0),
        };
        assert!(!booked.overlaps(at(9, 0), at(9, 30)));
        assert!(!booked.overlaps(at(10, 0), at(10, 30)));
        assert!(booked.overlaps(at(9, 15), at(9, 45)));
    }

    #[test]
    fn test_terminal_statuses_cannot_transition() {
        assert!(AppointmentStatus::Scheduled.can_transition_to(AppointmentStatus::Cancelled));
        assert!(AppointmentStatus::Rescheduled.can_transition_to(AppointmentStatus::Completed));
        assert!(!AppointmentStatus::Completed.can_transition_to(AppointmentStatus::NoShow));
        assert!(!AppointmentStatus::Cancelled.can_transition_to(AppointmentStatus::Rescheduled));
        assert!(!AppointmentStatus::Scheduled.can_transition_to(AppointmentStatus::Scheduled));
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no-show\"");
        assert_eq!(
            "no-show".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::NoShow
        );
    }

    #[test]
    fn test_booking_validation_collects_all_fields() {
        let request = BookAppointmentRequest {
            coach_id: Some("not-a-uuid".to_owned()),
            duration_minutes: Some(5),
            ..Default::default()
        };
        let error = request.validate().unwrap_err();
        let fields = &error.details["fields"];
        assert!(fields["coachId"].is_array());
        assert!(fields["clientId"].is_array());
        assert!(fields["scheduledAt"].is_array());
        assert!(fields["durationMinutes"].is_array());
    }

    #[test]
    fn test_booking_interval_uses_duration() {
        let request = BookAppointmentRequest {
            coach_id: Some(Uuid::new_v4().to_string()),
            client_id: Some(Uuid::new_v4().to_string()),
            scheduled_at: Some("2025-01-06T09:00".to_owned()),
            duration_minutes: Some(45),
            notes: None,
        };
        let booking = request.validate().unwrap();
        assert_eq!(booking.interval().unwrap().end, at(9, 45));
    }

    #[test]
    fn test_session_ending_after_last_year_is_rejected() {
        let start = NaiveDateTime::parse_from_str("9999-12-31 23:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let error = end_of(start, 120).unwrap_err();
        assert_eq!(error.code, crate::errors::ErrorCode::ValidationFailed);
        assert!(error.details["fields"]["scheduledAt"].is_array());
        assert!(end_of(start, 59).is_ok());
    }

    #[test]
    fn test_update_status_only_accepts_outcomes() {
        let ok = UpdateStatusRequest {
            status: Some("completed".to_owned()),
        };
        assert_eq!(ok.validate().unwrap(), AppointmentStatus::Completed);

        let cancelled = UpdateStatusRequest {
            status: Some("cancelled".to_owned()),
        };
        assert!(cancelled.validate().is_err());
    }
}
