// ABOUTME: Route module organization for Coachline server HTTP endpoints
// ABOUTME: Route definitions per domain with thin handlers delegating to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Coachline server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::errors::{AppError, ErrorCode};

/// Appointment booking and lifecycle routes
pub mod appointments;
/// Availability CRUD and slot query routes
pub mod availability;
/// Health check and readiness routes
pub mod health;
/// Notification send and listing routes
pub mod notifications;

/// Appointment route handlers
pub use appointments::AppointmentRoutes;
/// Availability route handlers
pub use availability::AvailabilityRoutes;
/// Health check route handlers
pub use health::HealthRoutes;
/// Notification route handlers
pub use notifications::NotificationRoutes;

/// Unwrap a JSON body, reporting unreadable bodies as validation failures
///
/// # Errors
///
/// Returns `ValidationFailed` carrying the extractor's explanation
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        AppError::new(
            ErrorCode::ValidationFailed,
            format!("Invalid request body: {}", rejection.body_text()),
        )
    })
}
