// ABOUTME: Notification send and listing service
// ABOUTME: Validates a broadcast, resolves its audience and hands it to the dispatcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::audience::AudienceResolver;
use crate::constants::notifications::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Notification, NotificationSummary, SendNotificationRequest};
use crate::notifications::NotificationDispatcher;

/// Broadcast entry point
#[derive(Clone)]
pub struct NotificationService {
    database: Database,
    resolver: AudienceResolver,
    dispatcher: NotificationDispatcher,
}

impl NotificationService {
    /// Create a service
    #[must_use]
    pub const fn new(
        database: Database,
        resolver: AudienceResolver,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            database,
            resolver,
            dispatcher,
        }
    }

    /// Validate, resolve and dispatch a broadcast on behalf of `actor`
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`, `EmptyAudience` when nobody matches, or a
    /// database error when the rows cannot be written
    pub async fn send(
        &self,
        actor: Uuid,
        request: &SendNotificationRequest,
        now: DateTime<Utc>,
    ) -> AppResult<NotificationSummary> {
        let (payload, audience) = request.validate(now)?;
        info!(
            actor = %actor,
            target_type = %audience.target_type,
            targets = audience.target_ids.len(),
            "Notification send requested"
        );

        let recipients = self.resolver.resolve(&audience, now).await?;
        self.dispatcher
            .dispatch(actor, &payload, &recipients, now)
            .await
    }

    /// A user's notifications, newest first
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown user, or a database error
    pub async fn list_for_user(&self, user_id: Uuid, limit: Option<u32>) -> AppResult<Vec<Notification>> {
        if self.database.users().get(user_id).await?.is_none() {
            return Err(AppError::not_found(format!("User {user_id}")));
        }
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.database
            .notifications()
            .list_for_user(user_id, limit)
            .await
    }
}
