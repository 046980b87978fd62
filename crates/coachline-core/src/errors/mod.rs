// ABOUTME: Unified error handling with standard error codes and HTTP status mapping
// ABOUTME: Defines ErrorCode, AppError, AppResult and the JSON error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the server returns [`AppResult`]. The error
//! carries an [`ErrorCode`] which decides the HTTP status, a human readable
//! message, and optional structured details (field-level validation messages,
//! identifiers involved in a failure).

/// Field-level validation error collection
pub mod validation;

#[cfg(feature = "http-response")]
mod http_response;

use std::error::Error;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use validation::ValidationErrors;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication (1000-1999)
    /// No acting user was supplied with a write request
    AuthRequired = 1000,
    /// The supplied actor could not be parsed
    AuthInvalid = 1001,

    // Validation (3000-3999)
    /// Generic malformed input
    InvalidInput = 3000,
    /// One or more request fields failed validation
    ValidationFailed = 3001,
    /// The resolved notification audience is empty
    EmptyAudience = 3002,

    // Resource Management (4000-4999)
    /// Referenced resource does not exist
    ResourceNotFound = 4000,
    /// The request conflicts with the current state of a resource
    ResourceConflict = 4001,

    // External Services (5000-5999)
    /// An external collaborator (delivery transport) failed
    ExternalServiceError = 5000,
    /// An external collaborator could not be reached
    ExternalServiceUnavailable = 5001,

    // Configuration (6000-6999)
    /// Configuration is missing or invalid
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    InternalError = 9000,
    /// The data store failed
    DatabaseError = 9001,
    /// Serialization or deserialization failed
    SerializationError = 9002,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::EmptyAudience => 400,
            Self::AuthRequired | Self::AuthInvalid => 401,
            Self::ResourceNotFound => 404,
            Self::ResourceConflict => 409,
            Self::ValidationFailed => 422,
            Self::ExternalServiceError | Self::ExternalServiceUnavailable => 502,
            Self::ConfigError
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "An acting user is required for this request",
            Self::AuthInvalid => "The acting user identifier is invalid",
            Self::InvalidInput => "The provided input is invalid",
            Self::ValidationFailed => "The request failed validation",
            Self::EmptyAudience => "No recipients matched the requested audience",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceConflict => "The request conflicts with the resource state",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether this code represents a server-side dependency failure
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

/// Unified error type for the application
#[derive(Debug, thiserror::Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured details (`null` when absent)
    pub details: Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Value::Null,
            source: None,
        }
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Actor header missing
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Missing x-actor-id header")
    }

    /// Actor header malformed
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Field-level validation failure
    #[must_use]
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::new(ErrorCode::ValidationFailed, "The given data was invalid")
            .with_details(serde_json::json!({ "fields": errors.into_map() }))
    }

    /// Resolved audience is empty
    pub fn empty_audience(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmptyAudience, message)
    }

    /// Conflict with the current resource state
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceConflict, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::not_found("Row"),
            other => Self::database(other.to_string()).with_source(other),
        }
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Error payload inside the response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine readable error code
    pub code: ErrorCode,
    /// Human readable message
    pub message: String,
    /// Structured details, omitted when null
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        // Dependency failures are reported generically; the specifics go to logs
        let message = if error.code.is_server_error() {
            error.code.description().to_owned()
        } else {
            error.message.clone()
        };
        let details = if error.code.is_server_error() {
            Value::Null
        } else {
            error.details.clone()
        };
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message,
                details,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), 422);
        assert_eq!(ErrorCode::EmptyAudience.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::ResourceConflict.http_status(), 409);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_validation_error_carries_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("date", "The date field is required.");
        let error = AppError::validation(errors);

        assert_eq!(error.code, ErrorCode::ValidationFailed);
        assert_eq!(
            error.details["fields"]["date"][0],
            "The date field is required."
        );
    }

    #[test]
    fn test_server_errors_are_reported_generically() {
        let error = AppError::database("connection refused on /var/run/db.sock");
        let response = ErrorResponse::from(&error);

        assert_eq!(response.error.message, "Database operation failed");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("DATABASE_ERROR"));
        assert!(!json.contains("db.sock"));
    }
}
