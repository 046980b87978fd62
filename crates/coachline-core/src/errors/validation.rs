// ABOUTME: Field-level validation error accumulator used by request validators
// ABOUTME: Collects messages per field and converts into AppError::validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use super::{AppError, AppResult};

/// Accumulates validation messages keyed by request field name
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Whether no messages have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether the given field has at least one message
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Consume into the underlying map
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }

    /// `Ok(())` when empty, otherwise a validation `AppError`
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` when any message was recorded
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self))
        }
    }
}
