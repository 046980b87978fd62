// ABOUTME: Coach availability block models with recurring and one-time windows
// ABOUTME: Stored block representation, wire request body and its validation into a window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::utils::datetime::{optional_date, require_time};

/// Day-of-week number used by availability blocks (0 = Sunday … 6 = Saturday)
#[must_use]
pub fn day_of_week(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always in 0..=6
    date.weekday().num_days_from_sunday() as u8
}

/// A coach-defined window of bookable time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBlock {
    /// Unique identifier
    pub id: Uuid,
    /// Coach that owns this block
    pub coach_id: Uuid,
    /// First date the block is valid
    pub start_date: Option<NaiveDate>,
    /// Last date the block is valid; `None` means open-ended
    pub end_date: Option<NaiveDate>,
    /// Start of the window
    pub start_time: NaiveTime,
    /// End of the window, strictly after `start_time`
    pub end_time: NaiveTime,
    /// Matching weekday for recurring blocks
    pub day_of_week: Option<u8>,
    /// Whether the block repeats weekly
    pub is_recurring: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityBlock {
    /// Whether this block contributes slots on `date`
    ///
    /// Recurring blocks match on weekday alone. One-time blocks match when
    /// `start_date <= date <= end_date`, with a missing `end_date` treated as `date`.
    #[must_use]
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if self.is_recurring {
            return self.day_of_week == Some(day_of_week(date));
        }
        self.start_date
            .is_some_and(|start| start <= date && self.end_date.unwrap_or(date) >= date)
    }

    /// Build a block from a validated window
    #[must_use]
    pub fn from_window(coach_id: Uuid, window: &AvailabilityWindow) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            coach_id,
            start_date: window.start_date,
            end_date: window.end_date,
            start_time: window.start_time,
            end_time: window.end_time,
            day_of_week: window.day_of_week,
            is_recurring: window.is_recurring,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated block attributes, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityWindow {
    /// First valid date
    pub start_date: Option<NaiveDate>,
    /// Last valid date
    pub end_date: Option<NaiveDate>,
    /// Window start
    pub start_time: NaiveTime,
    /// Window end
    pub end_time: NaiveTime,
    /// Weekday for recurring blocks
    pub day_of_week: Option<u8>,
    /// Weekly repetition flag
    pub is_recurring: bool,
}

/// Request body for creating or replacing an availability block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBlockRequest {
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`
    pub start_time: Option<String>,
    /// `HH:MM` or `HH:MM:SS`
    pub end_time: Option<String>,
    /// 0 (Sunday) through 6 (Saturday)
    pub day_of_week: Option<i64>,
    /// Defaults to false
    pub is_recurring: Option<bool>,
}

impl AvailabilityBlockRequest {
    /// Validate every field and produce a window
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` listing every offending field
    pub fn validate(&self) -> AppResult<AvailabilityWindow> {
        let mut errors = ValidationErrors::new();
        let is_recurring = self.is_recurring.unwrap_or(false);

        let start_time = require_time(self.start_time.as_deref(), "startTime", &mut errors);
        let end_time = require_time(self.end_time.as_deref(), "endTime", &mut errors);
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end <= start {
                errors.add("endTime", "The endTime must be a time after startTime.");
            }
        }

        let start_date = optional_date(self.start_date.as_deref(), "startDate", &mut errors);
        let end_date = optional_date(self.end_date.as_deref(), "endDate", &mut errors);
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.add(
                    "endDate",
                    "The endDate must be a date after or equal to startDate.",
                );
            }
        }

        let day_of_week = self.validate_day_of_week(is_recurring, &mut errors);

        if !is_recurring && start_date.is_none() && !errors.has("startDate") {
            errors.add(
                "startDate",
                "The startDate field is required when isRecurring is false.",
            );
        }

        match (start_time, end_time) {
            (Some(start_time), Some(end_time)) if errors.is_empty() => Ok(AvailabilityWindow {
                start_date,
                end_date,
                start_time,
                end_time,
                day_of_week,
                is_recurring,
            }),
            _ => Err(AppError::validation(errors)),
        }
    }

    fn validate_day_of_week(&self, is_recurring: bool, errors: &mut ValidationErrors) -> Option<u8> {
        match (is_recurring, self.day_of_week) {
            (true, None) => {
                errors.add(
                    "dayOfWeek",
                    "The dayOfWeek field is required when isRecurring is true.",
                );
                None
            }
            (true, Some(day)) => match u8::try_from(day) {
                Ok(day) if day <= 6 => Some(day),
                _ => {
                    errors.add("dayOfWeek", "The dayOfWeek must be between 0 and 6.");
                    None
                }
            },
            (false, Some(_)) => {
                errors.add(
                    "dayOfWeek",
                    "The dayOfWeek field is prohibited unless isRecurring is true.",
                );
                None
            }
            (false, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn one_time(start: NaiveDate, end: Option<NaiveDate>) -> AvailabilityBlock {
        AvailabilityBlock::from_window(
            Uuid::new_v4(),
            &AvailabilityWindow {
                start_date: Some(start),
                end_date: end,
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                day_of_week: None,
                is_recurring: false,
            },
        )
    }

    #[test]
    fn test_day_of_week_counts_from_sunday() {
        // 2025-01-05 is a Sunday
        assert_eq!(day_of_week(date(2025, 1, 5)), 0);
        assert_eq!(day_of_week(date(2025, 1, 11)), 6);
    }

    #[test]
    fn test_one_time_block_without_end_date_is_open_ended() {
        let block = one_time(date(2025, 1, 6), None);
        assert!(block.applies_on(date(2025, 1, 6)));
        assert!(block.applies_on(date(2025, 1, 20)));
        assert!(!block.applies_on(date(2025, 1, 5)));
    }

    #[test]
    fn test_one_time_block_respects_end_date() {
        let block = one_time(date(2025, 1, 6), Some(date(2025, 1, 8)));
        assert!(block.applies_on(date(2025, 1, 8)));
        assert!(!block.applies_on(date(2025, 1, 9)));
    }

    #[test]
    fn test_recurring_requires_day_of_week() {
        let request = AvailabilityBlockRequest {
            start_time: Some("09:00".to_owned()),
            end_time: Some("10:00".to_owned()),
            is_recurring: Some(true),
            ..Default::default()
        };
        let error = request.validate().unwrap_err();
        assert!(error.details["fields"]["dayOfWeek"].is_array());
    }

    #[test]
    fn test_end_time_must_follow_start_time() {
        let request = AvailabilityBlockRequest {
            start_date: Some("2025-01-06".to_owned()),
            start_time: Some("10:00".to_owned()),
            end_time: Some("10:00".to_owned()),
            ..Default::default()
        };
        let error = request.validate().unwrap_err();
        assert!(error.details["fields"]["endTime"].is_array());
    }

    #[test]
    fn test_non_recurring_requires_start_date_and_rejects_weekday() {
        let request = AvailabilityBlockRequest {
            start_time: Some("09:00".to_owned()),
            end_time: Some("12:00".to_owned()),
            day_of_week: Some(2),
            ..Default::default()
        };
        let error = request.validate().unwrap_err();
        assert!(error.details["fields"]["startDate"].is_array());
        assert!(error.details["fields"]["dayOfWeek"].is_array());
    }

    #[test]
    fn test_valid_recurring_window() {
        let request = AvailabilityBlockRequest {
            start_time: Some("09:00".to_owned()),
            end_time: Some("17:30".to_owned()),
            day_of_week: Some(1),
            is_recurring: Some(true),
            ..Default::default()
        };
        let window = request.validate().unwrap();
        assert_eq!(window.day_of_week, Some(1));
        assert_eq!(window.end_time, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
    }
}
