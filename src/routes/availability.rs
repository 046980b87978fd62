// ABOUTME: Route handlers for coach availability and the daily slot query
// ABOUTME: Availability block CRUD plus GET /coaches/:coach_id/available-slots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Availability routes
//!
//! Reads are open; writes require an `x-actor-id` header.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::errors::AppError;
use crate::middleware::CurrentActor;
use crate::models::{AvailabilityBlock, AvailabilityBlockRequest};
use crate::resources::ServerResources;
use crate::utils::uuid::parse_path_id;

/// Raw query of the slot endpoint; validated by the service
#[derive(Debug, Deserialize, Default)]
pub struct SlotParams {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// Slot length in minutes
    pub duration: Option<String>,
}

/// Response for listing blocks
#[derive(Debug, Serialize)]
pub struct ListBlocksResponse {
    /// Blocks of the coach
    pub availability: Vec<AvailabilityBlock>,
}

/// Availability routes handler
pub struct AvailabilityRoutes;

impl AvailabilityRoutes {
    /// Create all availability routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/coaches/:coach_id/available-slots",
                get(Self::handle_available_slots),
            )
            .route(
                "/coaches/:coach_id/availability",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/availability/:id",
                put(Self::handle_update).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /coaches/:coach_id/available-slots
    async fn handle_available_slots(
        State(resources): State<Arc<ServerResources>>,
        Path(coach_id): Path<String>,
        Query(params): Query<SlotParams>,
    ) -> Result<Response, AppError> {
        let coach_id = parse_path_id(&coach_id, "Coach")?;
        let query = resources
            .availability
            .parse_query(params.date.as_deref(), params.duration.as_deref())?;
        let slots = resources
            .availability
            .available_slots(coach_id, query)
            .await?;
        Ok((StatusCode::OK, Json(slots)).into_response())
    }

    /// Handle GET /coaches/:coach_id/availability
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(coach_id): Path<String>,
    ) -> Result<Response, AppError> {
        let coach_id = parse_path_id(&coach_id, "Coach")?;
        let availability = resources.availability.list_blocks(coach_id).await?;
        Ok((StatusCode::OK, Json(ListBlocksResponse { availability })).into_response())
    }

    /// Handle POST /coaches/:coach_id/availability
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        CurrentActor(actor): CurrentActor,
        Path(coach_id): Path<String>,
        body: Result<Json<AvailabilityBlockRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let coach_id = parse_path_id(&coach_id, "Coach")?;
        let request = json_body(body)?;
        let block = resources
            .availability
            .create_block(actor, coach_id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(block)).into_response())
    }

    /// Handle PUT /availability/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        CurrentActor(actor): CurrentActor,
        Path(id): Path<String>,
        body: Result<Json<AvailabilityBlockRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let block_id = parse_path_id(&id, "Availability block")?;
        let request = json_body(body)?;
        let block = resources
            .availability
            .update_block(actor, block_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(block)).into_response())
    }

    /// Handle DELETE /availability/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        CurrentActor(actor): CurrentActor,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let block_id = parse_path_id(&id, "Availability block")?;
        resources.availability.delete_block(actor, block_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
