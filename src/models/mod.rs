// ABOUTME: Domain data models for scheduling, users and notifications
// ABOUTME: Re-exports availability, appointment, notification and user types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Stored records, request bodies and their validated forms. Request bodies
//! keep every field optional and loosely typed so that validation can report
//! all offending fields at once instead of failing on the first.

/// Appointments and their lifecycle
pub mod appointment;
/// Coach availability blocks
pub mod availability;
/// Notification rows and the broadcast request
pub mod notification;
/// User directory
pub mod user;

pub use appointment::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookedInterval,
    CancelAppointmentRequest, NewAppointment, Reschedule, RescheduleAppointmentRequest,
    UpdateStatusRequest,
};
pub use availability::{
    day_of_week, AvailabilityBlock, AvailabilityBlockRequest, AvailabilityWindow,
};
pub use notification::{
    AudienceSpec, Channel, ChannelFlags, Notification, NotificationPayload,
    NotificationPriority, NotificationSummary, NotificationType, SendNotificationRequest,
    SendNotificationResponse, TargetType,
};
pub use user::{Recipient, User, UserRole, UserStatus};
