// ABOUTME: Centralized resource container shared by every HTTP handler
// ABOUTME: Owns the database handle, configuration and the domain services built on them
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Server Resources
//!
//! Services are built once at startup and shared through `Arc<ServerResources>`
//! as router state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::notifications::{DeliveryQueue, NotificationDispatcher};
use crate::services::{AppointmentService, AudienceResolver, AvailabilityService, NotificationService};

/// Shared server state
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Availability blocks and slot queries
    pub availability: AvailabilityService,
    /// Appointment lifecycle
    pub appointments: AppointmentService,
    /// Notification sends and listings
    pub notifications: NotificationService,
}

impl ServerResources {
    /// Wire services over `database`, handing deliveries to `queue`
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>, queue: Arc<dyn DeliveryQueue>) -> Self {
        let availability = AvailabilityService::new(database.clone(), config.slots);
        let appointments = AppointmentService::new(database.clone());
        let resolver = AudienceResolver::new(database.clone(), config.audience);
        let dispatcher = NotificationDispatcher::new(database.clone(), queue);
        let notifications = NotificationService::new(database.clone(), resolver, dispatcher);

        Self {
            database,
            config,
            availability,
            appointments,
            notifications,
        }
    }
}
