// ABOUTME: Notification row database operations
// ABOUTME: Transactional multi-row batch insert and per-user listing

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{execute_ddl, instant_to_storage, parse_stored_instant, parse_stored_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::Notification;

/// Rows per INSERT statement; 14 binds each keeps a statement under `SQLite`'s
/// 32766 host parameter limit
const ROWS_PER_STATEMENT: usize = 2000;

/// Notification database operations manager
pub struct NotificationsManager {
    pool: SqlitePool,
}

impl NotificationsManager {
    /// Create a new notifications manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the notifications table and its indexes
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        execute_ddl(
            &self.pool,
            &[
                r"
                CREATE TABLE IF NOT EXISTS notifications (
                    id TEXT PRIMARY KEY,
                    batch_id TEXT NOT NULL,
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    message TEXT NOT NULL,
                    type TEXT NOT NULL,
                    priority TEXT NOT NULL,
                    action_url TEXT,
                    action_label TEXT,
                    scheduled_for TEXT NOT NULL,
                    expires_at TEXT,
                    sent_by TEXT NOT NULL,
                    is_read BOOLEAN NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    UNIQUE (batch_id, user_id)
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at)",
                "CREATE INDEX IF NOT EXISTS idx_notifications_batch ON notifications(batch_id)",
            ],
        )
        .await
    }

    /// Insert every row of a batch atomically
    ///
    /// Either all rows are committed or none are.
    ///
    /// # Errors
    ///
    /// Returns a database error if any row fails; nothing is persisted then
    pub async fn insert_batch(&self, rows: &[Notification]) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let mut inserted = 0;
        for chunk in rows.chunks(ROWS_PER_STATEMENT) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO notifications (id, batch_id, user_id, title, message, type, priority, \
                 action_url, action_label, scheduled_for, expires_at, sent_by, is_read, created_at) ",
            );
            builder.push_values(chunk, |mut values, row| {
                values
                    .push_bind(row.id.to_string())
                    .push_bind(row.batch_id.to_string())
                    .push_bind(row.user_id.to_string())
                    .push_bind(row.title.clone())
                    .push_bind(row.message.clone())
                    .push_bind(row.notification_type.as_str())
                    .push_bind(row.priority.as_str())
                    .push_bind(row.action_url.clone())
                    .push_bind(row.action_label.clone())
                    .push_bind(instant_to_storage(row.scheduled_for))
                    .push_bind(row.expires_at.map(instant_to_storage))
                    .push_bind(row.sent_by.to_string())
                    .push_bind(row.is_read)
                    .push_bind(instant_to_storage(row.created_at));
            });

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to insert notifications: {e}")))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit notifications: {e}")))?;

        Ok(inserted)
    }

    /// Notifications of a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_for_user(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list notifications: {e}")))?;

        rows.iter().map(row_to_notification).collect()
    }

    /// Rows persisted for a batch
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_batch(&self, batch_id: Uuid) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query("SELECT * FROM notifications WHERE batch_id = $1 ORDER BY user_id")
            .bind(batch_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list batch: {e}")))?;

        rows.iter().map(row_to_notification).collect()
    }
}

fn row_to_notification(row: &SqliteRow) -> AppResult<Notification> {
    let id: String = row.try_get("id")?;
    let batch_id: String = row.try_get("batch_id")?;
    let user_id: String = row.try_get("user_id")?;
    let notification_type: String = row.try_get("type")?;
    let priority: String = row.try_get("priority")?;
    let scheduled_for: String = row.try_get("scheduled_for")?;
    let expires_at: Option<String> = row.try_get("expires_at")?;
    let sent_by: String = row.try_get("sent_by")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Notification {
        id: parse_stored_uuid(&id)?,
        batch_id: parse_stored_uuid(&batch_id)?,
        user_id: parse_stored_uuid(&user_id)?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        notification_type: notification_type.parse()?,
        priority: priority.parse()?,
        action_url: row.try_get("action_url")?,
        action_label: row.try_get("action_label")?,
        scheduled_for: parse_stored_instant(&scheduled_for)?,
        expires_at: expires_at.as_deref().map(parse_stored_instant).transpose()?,
        sent_by: parse_stored_uuid(&sent_by)?,
        is_read: row.try_get("is_read")?,
        created_at: parse_stored_instant(&created_at)?,
    })
}
