// ABOUTME: Availability service combining coach blocks and bookings into daily slots
// ABOUTME: Also owns validation and CRUD for availability blocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use super::slots::{slots_for_blocks, Slot};
use crate::config::SlotConfig;
use crate::constants::slots::DATE_FORMAT;
use crate::database::Database;
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::models::{AvailabilityBlock, AvailabilityBlockRequest};
use crate::utils::datetime::require_date;

/// Validated slot query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotQuery {
    /// Calendar date to expand
    pub date: NaiveDate,
    /// Slot length
    pub duration_minutes: u32,
}

/// Slots of a coach on one date
#[derive(Debug, Clone, Serialize)]
pub struct AvailableSlots {
    /// Echoed date, `YYYY-MM-DD`
    pub date: String,
    /// Slots ordered by start time
    pub slots: Vec<Slot>,
}

/// Availability reads and writes for coaches
#[derive(Clone)]
pub struct AvailabilityService {
    database: Database,
    limits: SlotConfig,
}

impl AvailabilityService {
    /// Create a service over `database` with the configured duration limits
    #[must_use]
    pub const fn new(database: Database, limits: SlotConfig) -> Self {
        Self { database, limits }
    }

    /// Validate raw `date` and `duration` query values
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for a missing or malformed date, or a
    /// duration that is not an integer within the configured limits
    pub fn parse_query(&self, date: Option<&str>, duration: Option<&str>) -> AppResult<SlotQuery> {
        let mut errors = ValidationErrors::new();
        let date = require_date(date, "date", &mut errors);

        let SlotConfig {
            default_duration_minutes,
            min_duration_minutes: min,
            max_duration_minutes: max,
        } = self.limits;
        let duration_minutes = match duration.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => Some(default_duration_minutes),
            Some(raw) => match raw.parse::<u32>() {
                Ok(minutes) if (min..=max).contains(&minutes) => Some(minutes),
                Ok(_) => {
                    errors.add(
                        "duration",
                        format!("The duration must be between {min} and {max}."),
                    );
                    None
                }
                Err(_) => {
                    errors.add("duration", "The duration must be an integer.");
                    None
                }
            },
        };

        match (date, duration_minutes) {
            (Some(date), Some(duration_minutes)) if errors.is_empty() => Ok(SlotQuery {
                date,
                duration_minutes,
            }),
            _ => Err(AppError::validation(errors)),
        }
    }

    /// Slots for a coach on the queried date
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown coach, or a database error
    pub async fn available_slots(&self, coach_id: Uuid, query: SlotQuery) -> AppResult<AvailableSlots> {
        self.require_coach(coach_id).await?;

        let result = self.collect_slots(coach_id, query).await;
        if let Err(ref e) = result {
            error!(
                operation = "available_slots",
                coach_id = %coach_id,
                date = %query.date,
                error = %e,
                "Failed to compute available slots"
            );
        }
        result
    }

    async fn collect_slots(&self, coach_id: Uuid, query: SlotQuery) -> AppResult<AvailableSlots> {
        let blocks = self
            .database
            .availability()
            .list_applicable(coach_id, query.date)
            .await?;
        let booked = self
            .database
            .appointments()
            .booked_intervals_on(coach_id, query.date)
            .await?;

        let slots = slots_for_blocks(
            query.date,
            &blocks,
            i64::from(query.duration_minutes),
            &booked,
        );

        Ok(AvailableSlots {
            date: query.date.format(DATE_FORMAT).to_string(),
            slots,
        })
    }

    /// All blocks of a coach
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown coach, or a database error
    pub async fn list_blocks(&self, coach_id: Uuid) -> AppResult<Vec<AvailabilityBlock>> {
        self.require_coach(coach_id).await?;
        self.database.availability().list_for_coach(coach_id).await
    }

    /// Validate and store a new block for a coach
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`, `ResourceNotFound` for an unknown coach, or a
    /// database error
    pub async fn create_block(
        &self,
        actor: Uuid,
        coach_id: Uuid,
        request: &AvailabilityBlockRequest,
    ) -> AppResult<AvailabilityBlock> {
        let window = request.validate()?;
        self.require_coach(coach_id).await?;

        let block = AvailabilityBlock::from_window(coach_id, &window);
        self.database.availability().create(&block).await?;

        info!(
            actor = %actor,
            coach_id = %coach_id,
            block_id = %block.id,
            recurring = block.is_recurring,
            "Availability block created"
        );
        Ok(block)
    }

    /// Replace the attributes of an existing block
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`, `ResourceNotFound` for an unknown block, or a
    /// database error
    pub async fn update_block(
        &self,
        actor: Uuid,
        block_id: Uuid,
        request: &AvailabilityBlockRequest,
    ) -> AppResult<AvailabilityBlock> {
        let window = request.validate()?;
        let block = self.database.availability().update(block_id, &window).await?;
        info!(actor = %actor, block_id = %block_id, "Availability block updated");
        Ok(block)
    }

    /// Delete a block
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown block, or a database error
    pub async fn delete_block(&self, actor: Uuid, block_id: Uuid) -> AppResult<()> {
        self.database.availability().delete(block_id).await?;
        info!(actor = %actor, block_id = %block_id, "Availability block deleted");
        Ok(())
    }

    async fn require_coach(&self, coach_id: Uuid) -> AppResult<()> {
        if self.database.users().is_coach(coach_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Coach {coach_id}")))
        }
    }
}
