// ABOUTME: Route handlers for notification broadcasts and per-user listing
// ABOUTME: POST /notifications/send and GET /users/:user_id/notifications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::errors::{AppError, ValidationErrors};
use crate::middleware::CurrentActor;
use crate::models::{Notification, SendNotificationRequest, SendNotificationResponse};
use crate::resources::ServerResources;
use crate::utils::uuid::parse_path_id;

/// Query parameters for listing notifications
#[derive(Debug, Deserialize, Default)]
pub struct ListNotificationsQuery {
    /// Page size
    pub limit: Option<String>,
}

/// Response for listing notifications
#[derive(Debug, Serialize)]
pub struct ListNotificationsResponse {
    /// Notifications, newest first
    pub notifications: Vec<Notification>,
}

/// Notification routes handler
pub struct NotificationRoutes;

impl NotificationRoutes {
    /// Create all notification routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/notifications/send", post(Self::handle_send))
            .route("/users/:user_id/notifications", get(Self::handle_list))
            .with_state(resources)
    }

    /// Handle POST /notifications/send
    async fn handle_send(
        State(resources): State<Arc<ServerResources>>,
        CurrentActor(actor): CurrentActor,
        body: Result<Json<SendNotificationRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(body)?;
        let summary = resources
            .notifications
            .send(actor, &request, Utc::now())
            .await?;
        let response = SendNotificationResponse {
            success: true,
            summary,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /users/:user_id/notifications
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Query(query): Query<ListNotificationsQuery>,
    ) -> Result<Response, AppError> {
        let user_id = parse_path_id(&user_id, "User")?;
        let limit = parse_limit(query.limit.as_deref())?;
        let notifications = resources
            .notifications
            .list_for_user(user_id, limit)
            .await?;
        Ok((StatusCode::OK, Json(ListNotificationsResponse { notifications })).into_response())
    }
}

fn parse_limit(raw: Option<&str>) -> Result<Option<u32>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(limit) if limit > 0 => Ok(Some(limit)),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.add("limit", "The limit must be a positive integer.");
            Err(AppError::validation(errors))
        }
    }
}
