// ABOUTME: Appointment database operations
// ABOUTME: Booking rows, per-day occupancy lookups, overlap checks and status updates

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{
    execute_ddl, instant_to_storage, parse_stored_instant, parse_stored_local, parse_stored_uuid,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Appointment, AppointmentStatus, BookedInterval};
use crate::utils::datetime::to_storage;

/// Appointment database operations manager
pub struct AppointmentsManager {
    pool: SqlitePool,
}

impl AppointmentsManager {
    /// Create a new appointments manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the appointments table and its indexes
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        execute_ddl(
            &self.pool,
            &[
                r"
                CREATE TABLE IF NOT EXISTS appointments (
                    id TEXT PRIMARY KEY,
                    coach_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    client_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    scheduled_at TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    duration_minutes INTEGER NOT NULL,
                    status TEXT NOT NULL DEFAULT 'scheduled'
                        CHECK (status IN ('scheduled', 'completed', 'cancelled', 'no-show', 'rescheduled')),
                    cancellation_reason TEXT,
                    notes TEXT,
                    reminder_sent BOOLEAN NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    CHECK (end_time > scheduled_at)
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_appointments_coach_time ON appointments(coach_id, scheduled_at)",
                "CREATE INDEX IF NOT EXISTS idx_appointments_client ON appointments(client_id)",
            ],
        )
        .await
    }

    /// Insert an appointment unless the coach is already booked over its interval
    ///
    /// The overlap check and the insert run as one statement, so concurrent
    /// bookings of the same time cannot both succeed. Returns `false` when a
    /// non-cancelled appointment of the coach overlaps.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_if_free(&self, appointment: &Appointment) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO appointments (
                id, coach_id, client_id, scheduled_at, end_time, duration_minutes,
                status, cancellation_reason, notes, reminder_sent, created_at, updated_at
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12
            WHERE NOT EXISTS (
                SELECT 1 FROM appointments
                WHERE coach_id = $2
                  AND status != 'cancelled'
                  AND scheduled_at < $5
                  AND end_time > $4
            )
            ",
        )
        .bind(appointment.id.to_string())
        .bind(appointment.coach_id.to_string())
        .bind(appointment.client_id.to_string())
        .bind(to_storage(appointment.scheduled_at))
        .bind(to_storage(appointment.end_time))
        .bind(i64::from(appointment.duration_minutes))
        .bind(appointment.status.as_str())
        .bind(&appointment.cancellation_reason)
        .bind(&appointment.notes)
        .bind(appointment.reminder_sent)
        .bind(instant_to_storage(appointment.created_at))
        .bind(instant_to_storage(appointment.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create appointment: {e}")))?;

        Ok(result.rows_affected() == 1)
    }

    /// Get an appointment by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, appointment_id: Uuid) -> AppResult<Option<Appointment>> {
        let row = sqlx::query("SELECT * FROM appointments WHERE id = $1")
            .bind(appointment_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get appointment: {e}")))?;

        row.as_ref().map(row_to_appointment).transpose()
    }

    /// Intervals occupied by a coach's non-cancelled appointments starting on `date`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn booked_intervals_on(
        &self,
        coach_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<BookedInterval>> {
        // Stored times have whole seconds, so the last second closes the day
        let day_start = date.and_time(NaiveTime::MIN);
        let day_end = date.and_hms_opt(23, 59, 59).unwrap_or(day_start);

        let rows = sqlx::query(
            r"
            SELECT scheduled_at, end_time FROM appointments
            WHERE coach_id = $1
              AND scheduled_at >= $2
              AND scheduled_at <= $3
              AND status != 'cancelled'
            ORDER BY scheduled_at
            ",
        )
        .bind(coach_id.to_string())
        .bind(to_storage(day_start))
        .bind(to_storage(day_end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query appointments: {e}")))?;

        rows.iter().map(row_to_interval).collect()
    }

    /// Set the status and cancellation reason
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown appointment, or a database error
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<&str>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE appointments
            SET status = $1, cancellation_reason = COALESCE($2, cancellation_reason), updated_at = $3
            WHERE id = $4
            ",
        )
        .bind(status.as_str())
        .bind(cancellation_reason)
        .bind(instant_to_storage(Utc::now()))
        .bind(appointment_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update appointment status: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Appointment {appointment_id}")));
        }
        Ok(())
    }

    /// Move an appointment in place and mark it rescheduled
    ///
    /// Nothing is written when another non-cancelled appointment of the same
    /// coach overlaps `interval`; the check and the update are one statement.
    /// Returns `false` in that case.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown appointment, or a database error
    pub async fn reschedule_if_free(
        &self,
        appointment_id: Uuid,
        interval: BookedInterval,
        duration_minutes: u32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE appointments
            SET scheduled_at = $1, end_time = $2, duration_minutes = $3,
                status = 'rescheduled', reminder_sent = 0, updated_at = $4
            WHERE id = $5
              AND NOT EXISTS (
                SELECT 1 FROM appointments AS other
                WHERE other.coach_id = appointments.coach_id
                  AND other.id != appointments.id
                  AND other.status != 'cancelled'
                  AND other.scheduled_at < $2
                  AND other.end_time > $1
              )
            ",
        )
        .bind(to_storage(interval.start))
        .bind(to_storage(interval.end))
        .bind(i64::from(duration_minutes))
        .bind(instant_to_storage(Utc::now()))
        .bind(appointment_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to reschedule appointment: {e}")))?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }
        if self.get(appointment_id).await?.is_none() {
            return Err(AppError::not_found(format!("Appointment {appointment_id}")));
        }
        Ok(false)
    }
}

fn row_to_interval(row: &SqliteRow) -> AppResult<BookedInterval> {
    let start: String = row.try_get("scheduled_at")?;
    let end: String = row.try_get("end_time")?;
    Ok(BookedInterval {
        start: parse_stored_local(&start)?,
        end: parse_stored_local(&end)?,
    })
}

fn row_to_appointment(row: &SqliteRow) -> AppResult<Appointment> {
    let id: String = row.try_get("id")?;
    let coach_id: String = row.try_get("coach_id")?;
    let client_id: String = row.try_get("client_id")?;
    let scheduled_at: String = row.try_get("scheduled_at")?;
    let end_time: String = row.try_get("end_time")?;
    let duration: i64 = row.try_get("duration_minutes")?;
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Appointment {
        id: parse_stored_uuid(&id)?,
        coach_id: parse_stored_uuid(&coach_id)?,
        client_id: parse_stored_uuid(&client_id)?,
        scheduled_at: parse_stored_local(&scheduled_at)?,
        end_time: parse_stored_local(&end_time)?,
        duration_minutes: u32::try_from(duration)
            .map_err(|_| AppError::internal(format!("Invalid stored duration {duration}")))?,
        status: status.parse()?,
        cancellation_reason: row.try_get("cancellation_reason")?,
        notes: row.try_get("notes")?,
        reminder_sent: row.try_get("reminder_sent")?,
        created_at: parse_stored_instant(&created_at)?,
        updated_at: parse_stored_instant(&updated_at)?,
    })
}
