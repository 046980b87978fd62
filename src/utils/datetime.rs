// ABOUTME: Parsing helpers for calendar dates, clock times and local datetimes
// ABOUTME: Accepts the wire formats used by the REST API and records field-level errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::constants::calendar::{MAX_YEAR, MIN_YEAR};
use crate::constants::slots::DATE_FORMAT;
use crate::errors::ValidationErrors;

/// Storage format for local datetimes; sorts lexically in chronological order
pub const STORAGE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for clock times
pub const STORAGE_TIME_FORMAT: &str = "%H:%M:%S";

const LOCAL_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn in_supported_range<T: Datelike>(value: T) -> Option<T> {
    (MIN_YEAR..=MAX_YEAR).contains(&value.year()).then_some(value)
}

/// Parse a strict `YYYY-MM-DD` calendar date within years 1 to 9999
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .and_then(in_supported_range)
}

/// Parse a clock time as `HH:MM` or `HH:MM:SS`
#[must_use]
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, STORAGE_TIME_FORMAT))
        .ok()
}

/// Parse a local (zone-less) datetime in any accepted wire format
#[must_use]
pub fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(in_supported_range)
}

/// Parse an RFC 3339 instant, or a local datetime interpreted as UTC
#[must_use]
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .and_then(in_supported_range)
        .or_else(|| parse_local_datetime(raw).map(|naive| naive.and_utc()))
}

/// Parse a required date field, recording a validation message on failure
pub fn require_date(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        errors.add(field, format!("The {field} field is required."));
        return None;
    };
    optional_date(Some(raw), field, errors)
}

/// Parse an optional date field, recording a validation message when malformed
pub fn optional_date(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.add(
            field,
            format!("The {field} does not match the format YYYY-MM-DD."),
        );
    }
    parsed
}

/// Parse a required clock time field, recording a validation message on failure
pub fn require_time(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveTime> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        errors.add(field, format!("The {field} field is required."));
        return None;
    };
    let parsed = parse_time(raw);
    if parsed.is_none() {
        errors.add(field, format!("The {field} does not match the format HH:MM."));
    }
    parsed
}

/// Parse a required local datetime field, recording a validation message on failure
pub fn require_local_datetime(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDateTime> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        errors.add(field, format!("The {field} field is required."));
        return None;
    };
    let parsed = parse_local_datetime(raw);
    if parsed.is_none() {
        errors.add(field, format!("The {field} is not a valid datetime."));
    }
    parsed
}

/// Parse an optional instant field, recording a validation message when malformed
pub fn optional_instant(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<DateTime<Utc>> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    let parsed = parse_instant(raw);
    if parsed.is_none() {
        errors.add(field, format!("The {field} is not a valid datetime."));
    }
    parsed
}

/// Format a local datetime for storage
#[must_use]
pub fn to_storage(datetime: NaiveDateTime) -> String {
    datetime.format(STORAGE_DATETIME_FORMAT).to_string()
}
