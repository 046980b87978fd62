// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Defaults, limits, environment keys and service names for the Coachline server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in a single flat list.

/// Service identity used in logs
pub mod service_names {
    /// Name of the HTTP server
    pub const COACHLINE_SERVER: &str = "coachline-server";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// HTTP header names
pub mod headers {
    /// Header carrying the acting user id
    pub const ACTOR_ID: &str = "x-actor-id";
    /// Header carrying the request correlation id
    pub const REQUEST_ID: &str = "x-request-id";
}

/// Appointment slot limits
pub mod slots {
    /// Slot length used when the caller omits `duration`
    pub const DEFAULT_DURATION_MINUTES: u32 = 60;
    /// Shortest bookable slot
    pub const MIN_DURATION_MINUTES: u32 = 15;
    /// Longest bookable slot
    pub const MAX_DURATION_MINUTES: u32 = 300;
    /// Wire format of a slot's clock time
    pub const TIME_FORMAT: &str = "%H:%M";
    /// Wire format of a slot's local datetime
    pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    /// Wire format of calendar dates
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Calendar range accepted on the wire
pub mod calendar {
    /// Earliest accepted year
    pub const MIN_YEAR: i32 = 1;
    /// Latest accepted year; four-digit years keep stored datetimes sortable as text
    pub const MAX_YEAR: i32 = 9999;
}

/// Audience resolution windows
pub mod audience {
    /// Users who logged in within this many days count as active
    pub const ACTIVE_WINDOW_DAYS: i64 = 7;
    /// Users whose last login is older than this many days count as inactive
    pub const INACTIVE_THRESHOLD_DAYS: i64 = 30;
    /// Upper bound for either configured window
    pub const MAX_WINDOW_DAYS: i64 = 36_500;
}

/// Notification payload limits
pub mod notifications {
    /// Maximum title length
    pub const MAX_TITLE_LENGTH: usize = 255;
    /// Maximum message length
    pub const MAX_MESSAGE_LENGTH: usize = 5000;
    /// Maximum action label length
    pub const MAX_ACTION_LABEL_LENGTH: usize = 50;
    /// Default bounded queue capacity per delivery worker
    pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
    /// Default timeout for webhook transports
    pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;
    /// Page size when listing a user's notifications
    pub const DEFAULT_LIST_LIMIT: u32 = 50;
    /// Largest page a caller may request
    pub const MAX_LIST_LIMIT: u32 = 200;
    /// Most distinct `targetIds` accepted in one send
    pub const MAX_TARGET_IDS: usize = 1000;
}

/// Appointment limits
pub mod appointments {
    /// Maximum cancellation reason length
    pub const MAX_REASON_LENGTH: usize = 500;
    /// Maximum notes length
    pub const MAX_NOTES_LENGTH: usize = 2000;
}

/// Environment variable names
pub mod env_config {
    /// HTTP port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Request timeout applied by the HTTP layer
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Allowed CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Default slot duration
    pub const SLOT_DEFAULT_DURATION_MINUTES: &str = "SLOT_DEFAULT_DURATION_MINUTES";
    /// Minimum slot duration
    pub const SLOT_MIN_DURATION_MINUTES: &str = "SLOT_MIN_DURATION_MINUTES";
    /// Maximum slot duration
    pub const SLOT_MAX_DURATION_MINUTES: &str = "SLOT_MAX_DURATION_MINUTES";
    /// Active audience window
    pub const AUDIENCE_ACTIVE_WINDOW_DAYS: &str = "AUDIENCE_ACTIVE_WINDOW_DAYS";
    /// Inactive audience threshold
    pub const AUDIENCE_INACTIVE_THRESHOLD_DAYS: &str = "AUDIENCE_INACTIVE_THRESHOLD_DAYS";
    /// Delivery queue capacity
    pub const DELIVERY_QUEUE_CAPACITY: &str = "DELIVERY_QUEUE_CAPACITY";
    /// Email transport webhook
    pub const EMAIL_WEBHOOK_URL: &str = "EMAIL_WEBHOOK_URL";
    /// Push transport webhook
    pub const PUSH_WEBHOOK_URL: &str = "PUSH_WEBHOOK_URL";
    /// SMS transport webhook
    pub const SMS_WEBHOOK_URL: &str = "SMS_WEBHOOK_URL";
    /// Webhook request timeout
    pub const WEBHOOK_TIMEOUT_SECS: &str = "WEBHOOK_TIMEOUT_SECS";
}

/// Database defaults
pub mod database {
    /// Default `SQLite` database location
    pub const DEFAULT_URL: &str = "sqlite:./data/coachline.db";
}

/// Default HTTP timeouts
pub mod timeouts {
    /// Default request timeout
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
}
