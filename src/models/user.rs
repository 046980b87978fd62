// ABOUTME: User directory models for coaches, clients and administrators
// ABOUTME: User, UserRole, UserStatus and the contact projection used for notification delivery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Role a user plays on the platform
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Coaching client
    #[default]
    Client,
    /// Coach who publishes availability and takes appointments
    Coach,
    /// Platform administrator
    Admin,
}

impl UserRole {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Coach => "coach",
            Self::Admin => "admin",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "coach" => Ok(Self::Coach),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::invalid_input(format!("Invalid user role: {s}"))),
        }
    }
}

/// User account status
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account in good standing; the only status that receives notifications
    #[default]
    Active,
    /// Account deactivated by the user
    Inactive,
    /// Account suspended by an administrator
    Suspended,
}

impl UserStatus {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            _ => Err(AppError::invalid_input(format!("Invalid user status: {s}"))),
        }
    }
}

/// A platform user as stored in the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number for SMS delivery
    pub phone: Option<String>,
    /// Device token for push delivery
    pub push_token: Option<String>,
    /// Platform role
    pub role: UserRole,
    /// Account status
    pub status: UserStatus,
    /// Owning organization
    pub organization_id: Option<Uuid>,
    /// Department within the organization
    pub department_id: Option<Uuid>,
    /// Most recent login
    pub last_login_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create an active user with the given role and no optional attributes
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            phone: None,
            push_token: None,
            role,
            status: UserStatus::Active,
            organization_id: None,
            department_id: None,
            last_login_at: None,
            created_at: Utc::now(),
        }
    }

    /// Project the fields needed for delivery
    #[must_use]
    pub fn to_recipient(&self) -> Recipient {
        Recipient {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            push_token: self.push_token.clone(),
        }
    }
}

/// Minimal contact projection of a user resolved into a notification audience
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// User id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
    /// Push device token
    pub push_token: Option<String>,
}

/// Treat blank strings as absent contact details
fn usable(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl Recipient {
    /// Email address if present and non-blank
    #[must_use]
    pub fn usable_email(&self) -> Option<&str> {
        usable(&self.email)
    }

    /// Phone number if present and non-blank
    #[must_use]
    pub fn usable_phone(&self) -> Option<&str> {
        self.phone.as_deref().and_then(usable)
    }

    /// Push token if present and non-blank
    #[must_use]
    pub fn usable_push_token(&self) -> Option<&str> {
        self.push_token.as_deref().and_then(usable)
    }
}
