// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Database Management
//!
//! `SQLite` storage for the user directory, coach availability, appointments
//! and notification rows. Each table has a manager that owns a clone of the
//! pool; [`Database`] hands them out and owns the schema.
//!
//! Storage formats:
//! - ids are hyphenated UUID text
//! - instants are RFC 3339 UTC with microseconds, which sort lexically
//! - local datetimes are `YYYY-MM-DD HH:MM:SS`, local times `HH:MM:SS`

mod appointments;
mod availability;
mod notifications;
mod users;

pub use appointments::AppointmentsManager;
pub use availability::AvailabilityManager;
pub use notifications::NotificationsManager;
pub use users::{AudienceQuery, UsersManager};

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::constants::slots::DATE_FORMAT;
use crate::errors::{AppError, AppResult};
use crate::utils::datetime::{STORAGE_DATETIME_FORMAT, STORAGE_TIME_FORMAT};

/// Database handle shared by every request
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool and create the schema
    ///
    /// In-memory URLs get a single long-lived connection so every query sees
    /// the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or the
    /// schema cannot be created
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(in_memory, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// User directory operations
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Availability block operations
    #[must_use]
    pub fn availability(&self) -> AvailabilityManager {
        AvailabilityManager::new(self.pool.clone())
    }

    /// Appointment operations
    #[must_use]
    pub fn appointments(&self) -> AppointmentsManager {
        AppointmentsManager::new(self.pool.clone())
    }

    /// Notification row operations
    #[must_use]
    pub fn notifications(&self) -> NotificationsManager {
        NotificationsManager::new(self.pool.clone())
    }

    /// Round-trip a trivial query, used by the readiness probe
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        self.users().migrate().await?;
        self.availability().migrate().await?;
        self.appointments().migrate().await?;
        self.notifications().migrate().await?;
        Ok(())
    }
}

/// Run each DDL statement against the pool
pub(crate) async fn execute_ddl(pool: &SqlitePool, statements: &[&str]) -> AppResult<()> {
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
    }
    Ok(())
}

/// Format an instant for storage
pub(crate) fn instant_to_storage(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Format a calendar date for storage
pub(crate) fn date_to_storage(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a clock time for storage
pub(crate) fn time_to_storage(time: NaiveTime) -> String {
    time.format(STORAGE_TIME_FORMAT).to_string()
}

pub(crate) fn parse_stored_uuid(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
}

pub(crate) fn parse_stored_instant(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid stored timestamp {raw}: {e}")))
}

pub(crate) fn parse_stored_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| AppError::internal(format!("Invalid stored date {raw}: {e}")))
}

pub(crate) fn parse_stored_time(raw: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, STORAGE_TIME_FORMAT)
        .map_err(|e| AppError::internal(format!("Invalid stored time {raw}: {e}")))
}

pub(crate) fn parse_stored_local(raw: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, STORAGE_DATETIME_FORMAT)
        .map_err(|e| AppError::internal(format!("Invalid stored datetime {raw}: {e}")))
}
