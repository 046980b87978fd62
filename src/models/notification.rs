// ABOUTME: Notification models for per-recipient rows and the broadcast send request
// ABOUTME: Type, priority, audience targeting, delivery channels and the send summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Notification data types
//!
//! A broadcast is submitted as a [`SendNotificationRequest`], validated into a
//! [`NotificationPayload`] plus an [`AudienceSpec`], and persisted as one
//! [`Notification`] row per resolved recipient.

use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::user::UserRole;
use crate::constants::notifications::{
    MAX_ACTION_LABEL_LENGTH, MAX_MESSAGE_LENGTH, MAX_TARGET_IDS, MAX_TITLE_LENGTH,
};
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::utils::datetime::optional_instant;
use crate::utils::uuid::parse_uuid_list;

/// Visual category of a notification
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Neutral information
    Info,
    /// Positive outcome
    Success,
    /// Needs attention
    Warning,
    /// Something failed
    Error,
    /// Platform-wide announcement
    Announcement,
}

impl NotificationType {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Announcement => "announcement",
        }
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "announcement" => Ok(Self::Announcement),
            _ => Err(AppError::invalid_input(format!(
                "Invalid notification type: {s}"
            ))),
        }
    }
}

/// Delivery urgency
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
    /// Urgent
    Urgent,
}

impl NotificationPriority {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl FromStr for NotificationPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(AppError::invalid_input(format!(
                "Invalid notification priority: {s}"
            ))),
        }
    }
}

/// How the audience of a broadcast is selected
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Every active user
    All,
    /// Users listed by id
    Specific,
    /// Users in the listed organizations
    Organization,
    /// Users in the listed departments
    Department,
    /// Users holding the role filter
    Role,
    /// Users who logged in recently
    Active,
    /// Users who have not logged in for a long time, or ever
    Inactive,
}

impl TargetType {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Specific => "specific",
            Self::Organization => "organization",
            Self::Department => "department",
            Self::Role => "role",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Whether `targetIds` must be supplied
    #[must_use]
    pub const fn requires_target_ids(&self) -> bool {
        matches!(self, Self::Specific | Self::Organization | Self::Department)
    }
}

impl Display for TargetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "specific" => Ok(Self::Specific),
            "organization" => Ok(Self::Organization),
            "department" => Ok(Self::Department),
            "role" => Ok(Self::Role),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::invalid_input(format!("Invalid target type: {s}"))),
        }
    }
}

/// Out-of-app delivery channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Email to `Recipient::email`
    Email,
    /// Push to `Recipient::push_token`
    Push,
    /// SMS to `Recipient::phone`
    Sms,
}

impl Channel {
    /// All channels in partition order
    pub const ALL: [Self; 3] = [Self::Email, Self::Push, Self::Sms];

    /// Channel name used in logs and webhook payloads
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Push => "push",
            Self::Sms => "sms",
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Stored per-recipient notification row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier
    pub id: Uuid,
    /// Send this row belongs to
    pub batch_id: Uuid,
    /// Recipient
    pub user_id: Uuid,
    /// Title
    pub title: String,
    /// Body
    pub message: String,
    /// Category
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Urgency
    pub priority: NotificationPriority,
    /// Call-to-action link
    pub action_url: Option<String>,
    /// Call-to-action label
    pub action_label: Option<String>,
    /// Intended delivery time (informational)
    pub scheduled_for: DateTime<Utc>,
    /// Hide after this instant
    pub expires_at: Option<DateTime<Utc>>,
    /// Acting user who submitted the send
    pub sent_by: Uuid,
    /// Read flag, false at creation
    pub is_read: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Audience selection after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudienceSpec {
    /// Selection strategy
    pub target_type: TargetType,
    /// Ids interpreted according to `target_type`
    pub target_ids: Vec<Uuid>,
    /// Extra role restriction (the selector itself for `TargetType::Role`)
    pub role_filter: Option<UserRole>,
}

/// Requested out-of-app channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelFlags {
    /// Email requested
    pub email: bool,
    /// Push requested
    pub push: bool,
    /// SMS requested
    pub sms: bool,
}

impl ChannelFlags {
    /// Whether `channel` was requested
    #[must_use]
    pub const fn requested(&self, channel: Channel) -> bool {
        match channel {
            Channel::Email => self.email,
            Channel::Push => self.push,
            Channel::Sms => self.sms,
        }
    }
}

/// Validated notification content shared by every row of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Title
    pub title: String,
    /// Body
    pub message: String,
    /// Category
    pub notification_type: NotificationType,
    /// Urgency
    pub priority: NotificationPriority,
    /// Call-to-action link
    pub action_url: Option<String>,
    /// Call-to-action label
    pub action_label: Option<String>,
    /// Intended delivery time
    pub scheduled_for: DateTime<Utc>,
    /// Expiry
    pub expires_at: Option<DateTime<Utc>>,
    /// Requested channels
    pub channels: ChannelFlags,
}

/// Request body for `POST /notifications/send`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    /// Title, at most 255 characters
    pub title: Option<String>,
    /// Body
    pub message: Option<String>,
    /// `info|success|warning|error|announcement`
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    /// `low|medium|high|urgent`
    pub priority: Option<String>,
    /// Audience selector
    pub target_type: Option<String>,
    /// Ids for `specific`, `organization` and `department`
    pub target_ids: Option<Vec<String>>,
    /// `client|coach|admin`
    pub role_filter: Option<String>,
    /// Defaults to now
    pub scheduled_for: Option<String>,
    /// Must follow `scheduled_for`
    pub expires_at: Option<String>,
    /// Absolute URL
    pub action_url: Option<String>,
    /// At most 50 characters
    pub action_label: Option<String>,
    /// Queue email delivery
    pub send_email: Option<bool>,
    /// Queue push delivery
    pub send_push: Option<bool>,
    /// Queue SMS delivery
    pub send_sms: Option<bool>,
}

fn required_text(
    raw: Option<&str>,
    field: &str,
    max: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        errors.add(field, format!("The {field} field is required."));
        return None;
    };
    if text.chars().count() > max {
        errors.add(
            field,
            format!("The {field} may not be greater than {max} characters."),
        );
        return None;
    }
    Some(text.to_owned())
}

fn required_enum<T: FromStr>(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        errors.add(field, format!("The {field} field is required."));
        return None;
    };
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        errors.add(field, format!("The selected {field} is invalid."));
    }
    parsed
}

impl SendNotificationRequest {
    /// Validate the request against `now`
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` listing every offending field
    pub fn validate(&self, now: DateTime<Utc>) -> AppResult<(NotificationPayload, AudienceSpec)> {
        let mut errors = ValidationErrors::new();

        let title = required_text(self.title.as_deref(), "title", MAX_TITLE_LENGTH, &mut errors);
        let message = required_text(
            self.message.as_deref(),
            "message",
            MAX_MESSAGE_LENGTH,
            &mut errors,
        );
        let notification_type: Option<NotificationType> =
            required_enum(self.notification_type.as_deref(), "type", &mut errors);
        let priority: Option<NotificationPriority> =
            required_enum(self.priority.as_deref(), "priority", &mut errors);
        let target_type: Option<TargetType> =
            required_enum(self.target_type.as_deref(), "targetType", &mut errors);

        let target_ids = self.validate_target_ids(target_type, &mut errors);
        let role_filter = self.validate_role_filter(target_type, &mut errors);

        let scheduled_for =
            optional_instant(self.scheduled_for.as_deref(), "scheduledFor", &mut errors);
        let expires_at = optional_instant(self.expires_at.as_deref(), "expiresAt", &mut errors);
        let effective_schedule = scheduled_for.unwrap_or(now);
        if expires_at.is_some_and(|expiry| expiry <= effective_schedule) {
            errors.add("expiresAt", "The expiresAt must be a date after scheduledFor.");
        }

        let action_url = self.validate_action_url(&mut errors);
        let action_label = self
            .action_label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        if action_label
            .as_deref()
            .is_some_and(|label| label.chars().count() > MAX_ACTION_LABEL_LENGTH)
        {
            errors.add(
                "actionLabel",
                format!(
                    "The actionLabel may not be greater than {MAX_ACTION_LABEL_LENGTH} characters."
                ),
            );
        }

        match (title, message, notification_type, priority, target_type) {
            (
                Some(title),
                Some(message),
                Some(notification_type),
                Some(priority),
                Some(target_type),
            ) if errors.is_empty() => Ok((
                NotificationPayload {
                    title,
                    message,
                    notification_type,
                    priority,
                    action_url,
                    action_label,
                    scheduled_for: effective_schedule,
                    expires_at,
                    channels: ChannelFlags {
                        email: self.send_email.unwrap_or(false),
                        push: self.send_push.unwrap_or(false),
                        sms: self.send_sms.unwrap_or(false),
                    },
                },
                AudienceSpec {
                    target_type,
                    target_ids,
                    role_filter,
                },
            )),
            _ => Err(AppError::validation(errors)),
        }
    }

    fn validate_target_ids(
        &self,
        target_type: Option<TargetType>,
        errors: &mut ValidationErrors,
    ) -> Vec<Uuid> {
        let raw = self.target_ids.as_deref().unwrap_or_default();
        if target_type.is_some_and(|t| t.requires_target_ids()) && raw.is_empty() {
            errors.add(
                "targetIds",
                "The targetIds field is required when targetType is specific, organization or department.",
            );
        }
        let mut seen = HashSet::new();
        let mut ids = parse_uuid_list(raw, "targetIds", errors);
        ids.retain(|id| seen.insert(*id));
        if ids.len() > MAX_TARGET_IDS {
            errors.add(
                "targetIds",
                format!("The targetIds may not have more than {MAX_TARGET_IDS} distinct items."),
            );
        }
        ids
    }

    fn validate_role_filter(
        &self,
        target_type: Option<TargetType>,
        errors: &mut ValidationErrors,
    ) -> Option<UserRole> {
        let raw = self.role_filter.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match raw {
            None => {
                if target_type == Some(TargetType::Role) {
                    errors.add(
                        "roleFilter",
                        "The roleFilter field is required when targetType is role.",
                    );
                }
                None
            }
            Some(raw) => {
                let parsed = raw.parse::<UserRole>().ok();
                if parsed.is_none() {
                    errors.add("roleFilter", "The selected roleFilter is invalid.");
                }
                parsed
            }
        }
    }

    fn validate_action_url(&self, errors: &mut ValidationErrors) -> Option<String> {
        let raw = self.action_url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(raw.to_owned()),
            _ => {
                errors.add("actionUrl", "The actionUrl must be a valid URL.");
                None
            }
        }
    }
}

/// Result of a broadcast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    /// Rows persisted
    pub total_recipients: usize,
    /// Email deliveries queued
    pub emails_sent: usize,
    /// Push deliveries queued
    pub push_notifications_sent: usize,
    /// SMS deliveries queued
    pub sms_sent: usize,
    /// Echoed schedule
    pub scheduled_for: DateTime<Utc>,
    /// Echoed expiry
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response body for `POST /notifications/send`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendNotificationResponse {
    /// Always true on a 200
    pub success: bool,
    /// Batch summary
    pub summary: NotificationSummary,
}
