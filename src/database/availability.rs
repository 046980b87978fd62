// ABOUTME: Availability block database operations
// ABOUTME: CRUD for coach availability and the per-date applicability query

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{
    date_to_storage, execute_ddl, instant_to_storage, parse_stored_date, parse_stored_instant,
    parse_stored_time, parse_stored_uuid, time_to_storage,
};
use crate::errors::{AppError, AppResult};
use crate::models::{day_of_week, AvailabilityBlock, AvailabilityWindow};

/// Availability block database operations manager
pub struct AvailabilityManager {
    pool: SqlitePool,
}

impl AvailabilityManager {
    /// Create a new availability manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `availability_blocks` table and its indexes
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        execute_ddl(
            &self.pool,
            &[
                r"
                CREATE TABLE IF NOT EXISTS availability_blocks (
                    id TEXT PRIMARY KEY,
                    coach_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    start_date TEXT,
                    end_date TEXT,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    day_of_week INTEGER CHECK (day_of_week BETWEEN 0 AND 6),
                    is_recurring BOOLEAN NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    CHECK (end_time > start_time),
                    CHECK (is_recurring = 0 OR day_of_week IS NOT NULL),
                    CHECK (is_recurring = 1 OR start_date IS NOT NULL)
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_availability_coach ON availability_blocks(coach_id)",
                "CREATE INDEX IF NOT EXISTS idx_availability_coach_day ON availability_blocks(coach_id, day_of_week)",
            ],
        )
        .await
    }

    /// Insert a block
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create(&self, block: &AvailabilityBlock) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO availability_blocks (
                id, coach_id, start_date, end_date, start_time, end_time,
                day_of_week, is_recurring, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(block.id.to_string())
        .bind(block.coach_id.to_string())
        .bind(block.start_date.map(date_to_storage))
        .bind(block.end_date.map(date_to_storage))
        .bind(time_to_storage(block.start_time))
        .bind(time_to_storage(block.end_time))
        .bind(block.day_of_week.map(i64::from))
        .bind(block.is_recurring)
        .bind(instant_to_storage(block.created_at))
        .bind(instant_to_storage(block.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create availability block: {e}")))?;

        Ok(())
    }

    /// Get a block by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, block_id: Uuid) -> AppResult<Option<AvailabilityBlock>> {
        let row = sqlx::query("SELECT * FROM availability_blocks WHERE id = $1")
            .bind(block_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get availability block: {e}")))?;

        row.as_ref().map(row_to_block).transpose()
    }

    /// List every block of a coach
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_for_coach(&self, coach_id: Uuid) -> AppResult<Vec<AvailabilityBlock>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM availability_blocks
            WHERE coach_id = $1
            ORDER BY is_recurring DESC, day_of_week, start_date, start_time
            ",
        )
        .bind(coach_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list availability blocks: {e}")))?;

        rows.iter().map(row_to_block).collect()
    }

    /// Blocks of a coach that apply on `date`
    ///
    /// One-time blocks match when `start_date <= date` and `end_date` is null
    /// or not before `date`. Recurring blocks match on weekday.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_applicable(
        &self,
        coach_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<AvailabilityBlock>> {
        let day = date_to_storage(date);
        let rows = sqlx::query(
            r"
            SELECT * FROM availability_blocks
            WHERE coach_id = $1
              AND (
                (is_recurring = 0 AND start_date <= $2 AND (end_date IS NULL OR end_date >= $2))
                OR (is_recurring = 1 AND day_of_week = $3)
              )
            ORDER BY start_time
            ",
        )
        .bind(coach_id.to_string())
        .bind(&day)
        .bind(i64::from(day_of_week(date)))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query availability blocks: {e}")))?;

        rows.iter().map(row_to_block).collect()
    }

    /// Replace the attributes of a block
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown block, or a database error
    pub async fn update(
        &self,
        block_id: Uuid,
        window: &AvailabilityWindow,
    ) -> AppResult<AvailabilityBlock> {
        let now = Utc::now();
        let result = sqlx::query(
            r"
            UPDATE availability_blocks
            SET start_date = $1, end_date = $2, start_time = $3, end_time = $4,
                day_of_week = $5, is_recurring = $6, updated_at = $7
            WHERE id = $8
            ",
        )
        .bind(window.start_date.map(date_to_storage))
        .bind(window.end_date.map(date_to_storage))
        .bind(time_to_storage(window.start_time))
        .bind(time_to_storage(window.end_time))
        .bind(window.day_of_week.map(i64::from))
        .bind(window.is_recurring)
        .bind(instant_to_storage(now))
        .bind(block_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update availability block: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Availability block {block_id}")));
        }

        self.get(block_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Availability block {block_id}")))
    }

    /// Delete a block
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown block, or a database error
    pub async fn delete(&self, block_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM availability_blocks WHERE id = $1")
            .bind(block_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete availability block: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Availability block {block_id}")));
        }
        Ok(())
    }
}

fn row_to_block(row: &SqliteRow) -> AppResult<AvailabilityBlock> {
    let id: String = row.try_get("id")?;
    let coach_id: String = row.try_get("coach_id")?;
    let start_date: Option<String> = row.try_get("start_date")?;
    let end_date: Option<String> = row.try_get("end_date")?;
    let start_time: String = row.try_get("start_time")?;
    let end_time: String = row.try_get("end_time")?;
    let day: Option<i64> = row.try_get("day_of_week")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(AvailabilityBlock {
        id: parse_stored_uuid(&id)?,
        coach_id: parse_stored_uuid(&coach_id)?,
        start_date: start_date.as_deref().map(parse_stored_date).transpose()?,
        end_date: end_date.as_deref().map(parse_stored_date).transpose()?,
        start_time: parse_stored_time(&start_time)?,
        end_time: parse_stored_time(&end_time)?,
        day_of_week: day
            .map(|d| {
                u8::try_from(d).map_err(|_| AppError::internal(format!("Invalid stored weekday {d}")))
            })
            .transpose()?,
        is_recurring: row.try_get("is_recurring")?,
        created_at: parse_stored_instant(&created_at)?,
        updated_at: parse_stored_instant(&updated_at)?,
    })
}
