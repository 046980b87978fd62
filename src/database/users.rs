// ABOUTME: User directory database operations
// ABOUTME: Stores coaches, clients and admins and resolves notification audiences

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{execute_ddl, instant_to_storage, parse_stored_instant, parse_stored_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{Recipient, TargetType, User, UserRole, UserStatus};

/// Audience selection with the activity cutoffs already computed
#[derive(Debug, Clone)]
pub struct AudienceQuery<'a> {
    /// Selection strategy
    pub target_type: TargetType,
    /// Ids interpreted by `target_type`
    pub target_ids: &'a [Uuid],
    /// Role restriction
    pub role_filter: Option<UserRole>,
    /// Logins at or after this instant count as active
    pub active_since: DateTime<Utc>,
    /// Logins before this instant count as inactive
    pub inactive_before: DateTime<Utc>,
}

/// User database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the users table and its indexes
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        execute_ddl(
            &self.pool,
            &[
                r"
                CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    phone TEXT,
                    push_token TEXT,
                    role TEXT NOT NULL DEFAULT 'client' CHECK (role IN ('client', 'coach', 'admin')),
                    status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive', 'suspended')),
                    organization_id TEXT,
                    department_id TEXT,
                    last_login_at TEXT,
                    created_at TEXT NOT NULL
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_users_status ON users(status)",
                "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
                "CREATE INDEX IF NOT EXISTS idx_users_organization ON users(organization_id)",
                "CREATE INDEX IF NOT EXISTS idx_users_department ON users(department_id)",
                "CREATE INDEX IF NOT EXISTS idx_users_last_login ON users(last_login_at)",
            ],
        )
        .await
    }

    /// Insert a user
    ///
    /// # Errors
    ///
    /// Returns `ResourceConflict` if the email is taken, or a database error
    pub async fn create(&self, user: &User) -> AppResult<()> {
        if self.get_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("Email already in use by another user"));
        }

        sqlx::query(
            r"
            INSERT INTO users (
                id, name, email, phone, push_token, role, status,
                organization_id, department_id, last_login_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.push_token)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.organization_id.map(|id| id.to_string()))
        .bind(user.department_id.map(|id| id.to_string()))
        .bind(user.last_login_at.map(instant_to_storage))
        .bind(instant_to_storage(user.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(())
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Whether `coach_id` names a user with the coach role
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn is_coach(&self, coach_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE id = $1 AND role = 'coach'")
            .bind(coach_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up coach: {e}")))?;
        Ok(row.is_some())
    }

    /// Record a login at `at`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown user, or a database error
    pub async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
            .bind(instant_to_storage(at))
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to record login: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id}")));
        }
        Ok(())
    }

    /// Select the active users matching an audience, one row per user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_audience(&self, query: &AudienceQuery<'_>) -> AppResult<Vec<Recipient>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, name, email, phone, push_token FROM users WHERE status = 'active'",
        );

        match query.target_type {
            TargetType::All => {}
            TargetType::Specific => push_id_filter(&mut builder, "id", query.target_ids),
            TargetType::Organization => {
                push_id_filter(&mut builder, "organization_id", query.target_ids);
            }
            TargetType::Department => {
                push_id_filter(&mut builder, "department_id", query.target_ids);
            }
            TargetType::Role => {
                // A role selector without a role matches nobody
                match query.role_filter {
                    Some(role) => {
                        builder.push(" AND role = ").push_bind(role.as_str());
                    }
                    None => {
                        builder.push(" AND 0");
                    }
                }
            }
            TargetType::Active => {
                builder
                    .push(" AND last_login_at IS NOT NULL AND last_login_at >= ")
                    .push_bind(instant_to_storage(query.active_since));
            }
            TargetType::Inactive => {
                builder
                    .push(" AND (last_login_at IS NULL OR last_login_at < ")
                    .push_bind(instant_to_storage(query.inactive_before))
                    .push(")");
            }
        }

        if query.target_type != TargetType::Role {
            if let Some(role) = query.role_filter {
                builder.push(" AND role = ").push_bind(role.as_str());
            }
        }

        builder.push(" ORDER BY created_at, id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to resolve audience: {e}")))?;

        rows.iter().map(row_to_recipient).collect()
    }
}

fn push_id_filter(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, ids: &[Uuid]) {
    if ids.is_empty() {
        builder.push(" AND 0");
        return;
    }
    builder.push(format!(" AND {column} IN ("));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");
}

fn parse_optional_uuid(raw: Option<String>) -> AppResult<Option<Uuid>> {
    raw.as_deref().map(parse_stored_uuid).transpose()
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.try_get("id")?;
    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;
    let last_login_at: Option<String> = row.try_get("last_login_at")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(User {
        id: parse_stored_uuid(&id)?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        push_token: row.try_get("push_token")?,
        role: role.parse::<UserRole>()?,
        status: status.parse::<UserStatus>()?,
        organization_id: parse_optional_uuid(row.try_get("organization_id")?)?,
        department_id: parse_optional_uuid(row.try_get("department_id")?)?,
        last_login_at: last_login_at
            .as_deref()
            .map(parse_stored_instant)
            .transpose()?,
        created_at: parse_stored_instant(&created_at)?,
    })
}

fn row_to_recipient(row: &SqliteRow) -> AppResult<Recipient> {
    let id: String = row.try_get("id")?;
    Ok(Recipient {
        id: parse_stored_uuid(&id)?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        push_token: row.try_get("push_token")?,
    })
}
