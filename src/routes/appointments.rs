// ABOUTME: Route handlers for appointment booking and lifecycle changes
// ABOUTME: Book, fetch, cancel, reschedule and record outcomes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

use super::json_body;
use crate::errors::AppError;
use crate::middleware::CurrentActor;
use crate::models::{
    BookAppointmentRequest, CancelAppointmentRequest, RescheduleAppointmentRequest,
    UpdateStatusRequest,
};
use crate::resources::ServerResources;
use crate::utils::uuid::parse_path_id;

/// Appointment routes handler
pub struct AppointmentRoutes;

impl AppointmentRoutes {
    /// Create all appointment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/appointments", post(Self::handle_book))
            .route("/appointments/:id", get(Self::handle_get))
            .route("/appointments/:id/cancel", post(Self::handle_cancel))
            .route("/appointments/:id/reschedule", post(Self::handle_reschedule))
            .route("/appointments/:id/status", put(Self::handle_update_status))
            .with_state(resources)
    }

    /// Handle POST /appointments
    async fn handle_book(
        State(resources): State<Arc<ServerResources>>,
        CurrentActor(actor): CurrentActor,
        body: Result<Json<BookAppointmentRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(body)?;
        let appointment = resources.appointments.book(actor, &request).await?;
        Ok((StatusCode::CREATED, Json(appointment)).into_response())
    }

    /// Handle GET /appointments/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let appointment_id = parse_path_id(&id, "Appointment")?;
        let appointment = resources.appointments.get(appointment_id).await?;
        Ok((StatusCode::OK, Json(appointment)).into_response())
    }

    /// Handle POST /appointments/:id/cancel
    async fn handle_cancel(
        State(resources): State<Arc<ServerResources>>,
        CurrentActor(actor): CurrentActor,
        Path(id): Path<String>,
        body: Option<Json<CancelAppointmentRequest>>,
    ) -> Result<Response, AppError> {
        let appointment_id = parse_path_id(&id, "Appointment")?;
        let request = body.map(|Json(request)| request).unwrap_or_default();
        let appointment = resources
            .appointments
            .cancel(actor, appointment_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(appointment)).into_response())
    }

    /// Handle POST /appointments/:id/reschedule
    async fn handle_reschedule(
        State(resources): State<Arc<ServerResources>>,
        CurrentActor(actor): CurrentActor,
        Path(id): Path<String>,
        body: Result<Json<RescheduleAppointmentRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let appointment_id = parse_path_id(&id, "Appointment")?;
        let request = json_body(body)?;
        let appointment = resources
            .appointments
            .reschedule(actor, appointment_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(appointment)).into_response())
    }

    /// Handle PUT /appointments/:id/status
    async fn handle_update_status(
        State(resources): State<Arc<ServerResources>>,
        CurrentActor(actor): CurrentActor,
        Path(id): Path<String>,
        body: Result<Json<UpdateStatusRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let appointment_id = parse_path_id(&id, "Appointment")?;
        let request = json_body(body)?;
        let appointment = resources
            .appointments
            .update_status(actor, appointment_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(appointment)).into_response())
    }
}
