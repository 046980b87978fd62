// ABOUTME: Main library entry point for the Coachline coaching backend
// ABOUTME: Coach availability slots, appointments and notification fan-out over a REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coachline Server
//!
//! Backend slice of a fitness-coaching platform.
//!
//! ## Features
//!
//! - **Availability slots**: open appointment slots of a coach on a date,
//!   computed from recurring and one-time availability blocks minus bookings
//! - **Appointments**: booking with overlap protection, cancellation,
//!   rescheduling and outcome tracking
//! - **Notification fan-out**: audience resolution by id, organization,
//!   department, role or login recency, one stored row per recipient and
//!   asynchronous email, push and SMS delivery
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers per domain
//! - **Services**: validation and business rules
//! - **Database**: one `SQLite` manager per table
//! - **Notifications**: dispatcher, delivery queue and channel transports
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use coachline_server::config::ServerConfig;
//! use coachline_server::database::Database;
//! use coachline_server::notifications::{ChannelSenders, MpscDeliveryQueue};
//! use coachline_server::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(ServerConfig::from_env()?);
//!     let database = Database::new(&config.database_url).await?;
//!     let senders = ChannelSenders::from_config(&config.delivery);
//!     let (queue, _worker) = MpscDeliveryQueue::spawn(config.delivery.queue_capacity, senders);
//!     let resources = Arc::new(ServerResources::new(database, config, Arc::new(queue)));
//!     coachline_server::server::run_http_server(resources, 8081).await
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` persistence, one manager per table
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware for request tracing, actor extraction and CORS
pub mod middleware;

/// Domain models and request bodies
pub mod models;

/// Notification dispatch, delivery queue and channel transports
pub mod notifications;

/// Shared server state
pub mod resources;

/// `HTTP` routes grouped by domain
pub mod routes;

/// HTTP server assembly and lifecycle
pub mod server;

/// Domain service layer
pub mod services;

/// Utility functions and helpers
pub mod utils;
