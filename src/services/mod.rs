// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Slot generation, availability, appointments, audiences and notification sends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers parse and authenticate; everything else lives here so the
//! rules are the same whichever entry point calls them.

/// Appointment booking, cancellation, rescheduling and outcomes
pub mod appointments;

/// Notification audience resolution
pub mod audience;

/// Availability blocks and the daily slot query
pub mod availability;

/// Notification sends and per-user listing
pub mod notifications;

/// Pure slot generation
pub mod slots;

pub use appointments::AppointmentService;
pub use audience::AudienceResolver;
pub use availability::{AvailabilityService, AvailableSlots, SlotQuery};
pub use notifications::NotificationService;
pub use slots::{generate_slots, slots_for_blocks, Slot};
