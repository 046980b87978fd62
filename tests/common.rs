// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, user fixtures, recording delivery queues and server resources
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `coachline_server`

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coachline_server::{
    config::ServerConfig,
    database::Database,
    errors::{AppError, AppResult},
    models::{AvailabilityBlock, AvailabilityBlockRequest, User, UserRole, UserStatus},
    notifications::{DeliveryJob, DeliveryQueue},
    resources::ServerResources,
};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

/// Insert an active user with `role`
pub async fn create_user(database: &Database, name: &str, role: UserRole) -> User {
    let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4().simple());
    let user = User::new(name, email, role);
    database.users().create(&user).await.unwrap();
    user
}

/// Insert a user after letting `customize` adjust it
pub async fn create_user_with(
    database: &Database,
    name: &str,
    role: UserRole,
    customize: impl FnOnce(&mut User),
) -> User {
    let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4().simple());
    let mut user = User::new(name, email, role);
    customize(&mut user);
    database.users().create(&user).await.unwrap();
    user
}

/// Insert a suspended user
pub async fn create_suspended_user(database: &Database, name: &str) -> User {
    create_user_with(database, name, UserRole::Client, |user| {
        user.status = UserStatus::Suspended;
    })
    .await
}

/// Insert a user whose last login was at `at`
pub async fn create_user_last_seen(
    database: &Database,
    name: &str,
    at: Option<DateTime<Utc>>,
) -> User {
    create_user_with(database, name, UserRole::Client, |user| {
        user.last_login_at = at;
    })
    .await
}

/// Store a weekly block for `coach_id`
pub async fn create_weekly_block(
    database: &Database,
    coach_id: Uuid,
    day_of_week: i64,
    start: &str,
    end: &str,
) -> AvailabilityBlock {
    let window = AvailabilityBlockRequest {
        start_time: Some(start.to_owned()),
        end_time: Some(end.to_owned()),
        day_of_week: Some(day_of_week),
        is_recurring: Some(true),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let block = AvailabilityBlock::from_window(coach_id, &window);
    database.availability().create(&block).await.unwrap();
    block
}

/// Delivery queue that keeps every accepted job
#[derive(Default)]
pub struct RecordingQueue {
    jobs: Mutex<Vec<DeliveryJob>>,
}

impl RecordingQueue {
    /// Jobs accepted so far
    pub fn jobs(&self) -> Vec<DeliveryJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryQueue for RecordingQueue {
    async fn enqueue(&self, job: DeliveryJob) -> AppResult<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

/// Delivery queue that rejects every job
pub struct FailingQueue;

#[async_trait]
impl DeliveryQueue for FailingQueue {
    async fn enqueue(&self, job: DeliveryJob) -> AppResult<()> {
        Err(AppError::internal(format!(
            "{} delivery queue is closed",
            job.channel
        )))
    }
}

/// Resources over `database` with default configuration
pub fn create_test_resources(
    database: Database,
    queue: Arc<dyn DeliveryQueue>,
) -> Arc<ServerResources> {
    Arc::new(ServerResources::new(
        database,
        Arc::new(ServerConfig::default()),
        queue,
    ))
}
