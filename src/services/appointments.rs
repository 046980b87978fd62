// ABOUTME: Appointment booking and lifecycle business logic
// ABOUTME: Overlap checks on booking and reschedule, cancellation and outcome transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::appointment::end_of;
use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookedInterval,
    CancelAppointmentRequest, RescheduleAppointmentRequest, UpdateStatusRequest,
};

/// Appointment operations
#[derive(Clone)]
pub struct AppointmentService {
    database: Database,
}

impl AppointmentService {
    /// Create a service over `database`
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Get an appointment
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown appointment, or a database error
    pub async fn get(&self, appointment_id: Uuid) -> AppResult<Appointment> {
        self.database
            .appointments()
            .get(appointment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Appointment {appointment_id}")))
    }

    /// Book a new appointment
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`, `ResourceNotFound` for an unknown coach or
    /// client, `ResourceConflict` when the coach is already booked, or a
    /// database error
    pub async fn book(&self, actor: Uuid, request: &BookAppointmentRequest) -> AppResult<Appointment> {
        let booking = request.validate()?;

        let users = self.database.users();
        if !users.is_coach(booking.coach_id).await? {
            return Err(AppError::not_found(format!("Coach {}", booking.coach_id)));
        }
        if users.get(booking.client_id).await?.is_none() {
            return Err(AppError::not_found(format!("Client {}", booking.client_id)));
        }

        let interval = booking.interval()?;
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            coach_id: booking.coach_id,
            client_id: booking.client_id,
            scheduled_at: interval.start,
            end_time: interval.end,
            duration_minutes: booking.duration_minutes,
            status: AppointmentStatus::Scheduled,
            cancellation_reason: None,
            notes: booking.notes,
            reminder_sent: false,
            created_at: now,
            updated_at: now,
        };
        if !self.database.appointments().create_if_free(&appointment).await? {
            return Err(overlap_conflict(appointment.coach_id, interval));
        }

        info!(
            actor = %actor,
            appointment_id = %appointment.id,
            coach_id = %appointment.coach_id,
            scheduled_at = %appointment.scheduled_at,
            "Appointment booked"
        );
        Ok(appointment)
    }

    /// Cancel an appointment, freeing its slot
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`, `ResourceNotFound`, `ResourceConflict` for a
    /// terminal appointment, or a database error
    pub async fn cancel(
        &self,
        actor: Uuid,
        appointment_id: Uuid,
        request: &CancelAppointmentRequest,
    ) -> AppResult<Appointment> {
        let reason = request.validate()?;
        let current = self.get(appointment_id).await?;
        ensure_transition(&current, AppointmentStatus::Cancelled)?;

        self.database
            .appointments()
            .update_status(appointment_id, AppointmentStatus::Cancelled, reason.as_deref())
            .await?;

        info!(actor = %actor, appointment_id = %appointment_id, "Appointment cancelled");
        self.get(appointment_id).await
    }

    /// Move an appointment to a new time
    ///
    /// The appointment keeps its id, becomes `rescheduled` and its reminder
    /// flag is reset.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`, `ResourceNotFound`, `ResourceConflict` for a
    /// terminal appointment or an occupied target time, or a database error
    pub async fn reschedule(
        &self,
        actor: Uuid,
        appointment_id: Uuid,
        request: &RescheduleAppointmentRequest,
    ) -> AppResult<Appointment> {
        let target = request.validate()?;
        let current = self.get(appointment_id).await?;
        ensure_transition(&current, AppointmentStatus::Rescheduled)?;

        let duration_minutes = target.duration_minutes.unwrap_or(current.duration_minutes);
        let interval = BookedInterval {
            start: target.scheduled_at,
            end: end_of(target.scheduled_at, duration_minutes)?,
        };
        if !self
            .database
            .appointments()
            .reschedule_if_free(appointment_id, interval, duration_minutes)
            .await?
        {
            return Err(overlap_conflict(current.coach_id, interval));
        }

        info!(
            actor = %actor,
            appointment_id = %appointment_id,
            from = %current.scheduled_at,
            to = %interval.start,
            "Appointment rescheduled"
        );
        self.get(appointment_id).await
    }

    /// Record the outcome of an appointment
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`, `ResourceNotFound`, `ResourceConflict` for a
    /// terminal appointment, or a database error
    pub async fn update_status(
        &self,
        actor: Uuid,
        appointment_id: Uuid,
        request: &UpdateStatusRequest,
    ) -> AppResult<Appointment> {
        let status = request.validate()?;
        let current = self.get(appointment_id).await?;
        ensure_transition(&current, status)?;

        self.database
            .appointments()
            .update_status(appointment_id, status, None)
            .await?;

        info!(
            actor = %actor,
            appointment_id = %appointment_id,
            status = %status,
            "Appointment status updated"
        );
        self.get(appointment_id).await
    }
}

fn overlap_conflict(coach_id: Uuid, interval: BookedInterval) -> AppError {
    warn!(coach_id = %coach_id, start = %interval.start, "Booking overlaps an existing appointment");
    AppError::conflict("The coach already has an appointment at that time")
}

fn ensure_transition(current: &Appointment, next: AppointmentStatus) -> AppResult<()> {
    if current.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::conflict(format!(
            "Cannot change appointment from {} to {next}",
            current.status
        )))
    }
}
