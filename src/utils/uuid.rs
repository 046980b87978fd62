// ABOUTME: UUID parsing and validation utilities to eliminate duplication across the codebase
// ABOUTME: Provides safe UUID parsing that reports failures against a request field
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use uuid::Uuid;

use crate::errors::{AppError, AppResult, ValidationErrors};

/// Parse a path identifier, mapping a malformed value to "not found"
///
/// A malformed id can never name an existing row, so callers see the same
/// response as for a well-formed id that does not exist.
///
/// # Errors
///
/// Returns `ResourceNotFound` naming the resource if the string is not a UUID
pub fn parse_path_id(raw: &str, resource: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(format!("{resource} {raw}")))
}

/// Parse a required UUID field, recording a validation message on failure
pub fn parse_uuid_field(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<Uuid> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        errors.add(field, format!("The {field} field is required."));
        return None;
    };
    parse_optional_uuid_field(Some(raw), field, errors)
}

/// Parse an optional UUID field, recording a validation message when present but malformed
pub fn parse_optional_uuid_field(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<Uuid> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, format!("The {field} must be a valid UUID."));
            None
        }
    }
}

/// Parse every entry of a UUID list, recording the index of each malformed entry
pub fn parse_uuid_list(raw: &[String], field: &str, errors: &mut ValidationErrors) -> Vec<Uuid> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, value)| match Uuid::parse_str(value.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(
                    &format!("{field}.{index}"),
                    format!("The {field}.{index} must be a valid UUID."),
                );
                None
            }
        })
        .collect()
}
