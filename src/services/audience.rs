// ABOUTME: Audience resolution for notification broadcasts
// ABOUTME: Maps a target selector to the deduplicated list of active recipients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::config::AudienceConfig;
use crate::database::{AudienceQuery, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{AudienceSpec, Recipient};

/// Resolves audience selectors against the user directory
#[derive(Clone)]
pub struct AudienceResolver {
    database: Database,
    windows: AudienceConfig,
}

impl AudienceResolver {
    /// Create a resolver with the configured login windows
    #[must_use]
    pub const fn new(database: Database, windows: AudienceConfig) -> Self {
        Self { database, windows }
    }

    /// Resolve `spec` relative to `now`
    ///
    /// Only active users are returned and each user appears once. `active`
    /// means a login within the active window; `inactive` means a login older
    /// than the inactive threshold or no login at all.
    ///
    /// # Errors
    ///
    /// Returns `EmptyAudience` when nobody matches, or a database error
    pub async fn resolve(&self, spec: &AudienceSpec, now: DateTime<Utc>) -> AppResult<Vec<Recipient>> {
        let query = AudienceQuery {
            target_type: spec.target_type,
            target_ids: &spec.target_ids,
            role_filter: spec.role_filter,
            active_since: days_before(now, self.windows.active_window_days)?,
            inactive_before: days_before(now, self.windows.inactive_threshold_days)?,
        };

        let mut seen = HashSet::new();
        let recipients: Vec<Recipient> = self
            .database
            .users()
            .find_audience(&query)
            .await?
            .into_iter()
            .filter(|recipient| seen.insert(recipient.id))
            .collect();

        debug!(
            target_type = %spec.target_type,
            recipients = recipients.len(),
            "Audience resolved"
        );

        if recipients.is_empty() {
            return Err(AppError::empty_audience(format!(
                "No active recipients match target type {}",
                spec.target_type
            )));
        }
        Ok(recipients)
    }
}

fn days_before(now: DateTime<Utc>, days: i64) -> AppResult<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| AppError::internal(format!("Audience window of {days} days is out of range")))
}
