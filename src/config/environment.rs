// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database URL, slot limits, audience windows and delivery transports
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt::{self, Display};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::constants::{audience, database, env_config, notifications, ports, slots, timeouts};

/// Environment type for logging and other deployment-dependent behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Slot duration limits for the availability query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotConfig {
    /// Used when the caller omits `duration`
    pub default_duration_minutes: u32,
    /// Smallest accepted `duration`
    pub min_duration_minutes: u32,
    /// Largest accepted `duration`
    pub max_duration_minutes: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: slots::DEFAULT_DURATION_MINUTES,
            min_duration_minutes: slots::MIN_DURATION_MINUTES,
            max_duration_minutes: slots::MAX_DURATION_MINUTES,
        }
    }
}

/// Login windows for the `active` and `inactive` audiences
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudienceConfig {
    /// Logins within this many days count as active
    pub active_window_days: i64,
    /// Logins older than this many days count as inactive
    pub inactive_threshold_days: i64,
}

impl Default for AudienceConfig {
    fn default() -> Self {
        Self {
            active_window_days: audience::ACTIVE_WINDOW_DAYS,
            inactive_threshold_days: audience::INACTIVE_THRESHOLD_DAYS,
        }
    }
}

/// Delivery queue and channel transport settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Bounded capacity of the delivery queue
    pub queue_capacity: usize,
    /// Email transport endpoint; deliveries are only logged when unset
    pub email_webhook_url: Option<Url>,
    /// Push transport endpoint
    pub push_webhook_url: Option<Url>,
    /// SMS transport endpoint
    pub sms_webhook_url: Option<Url>,
    /// Per-request timeout for webhook transports
    pub webhook_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            queue_capacity: notifications::DEFAULT_QUEUE_CAPACITY,
            email_webhook_url: None,
            push_webhook_url: None,
            sms_webhook_url: None,
            webhook_timeout_secs: notifications::DEFAULT_WEBHOOK_TIMEOUT_SECS,
        }
    }
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// `SQLite` connection URL
    pub database_url: String,
    /// Whole-request timeout applied by the HTTP layer
    pub request_timeout_secs: u64,
    /// Comma-separated CORS origins, `*` for any
    pub cors_allowed_origins: String,
    /// Slot duration limits
    pub slots: SlotConfig,
    /// Audience login windows
    pub audience: AudienceConfig,
    /// Delivery settings
    pub delivery: DeliveryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: ports::DEFAULT_HTTP_PORT,
            environment: Environment::default(),
            database_url: database::DEFAULT_URL.to_owned(),
            request_timeout_secs: timeouts::DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_allowed_origins: "*".to_owned(),
            slots: SlotConfig::default(),
            audience: AudienceConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed, or the
    /// resulting configuration is inconsistent
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_parse(env_config::HTTP_PORT, ports::DEFAULT_HTTP_PORT)?,
            environment: Environment::from_str_or_default(&env_var_or(
                env_config::ENVIRONMENT,
                "development",
            )),
            database_url: env_var_or(env_config::DATABASE_URL, database::DEFAULT_URL),
            request_timeout_secs: env_parse(
                env_config::REQUEST_TIMEOUT_SECS,
                timeouts::DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            cors_allowed_origins: env_var_or(env_config::CORS_ALLOWED_ORIGINS, "*"),
            slots: SlotConfig {
                default_duration_minutes: env_parse(
                    env_config::SLOT_DEFAULT_DURATION_MINUTES,
                    slots::DEFAULT_DURATION_MINUTES,
                )?,
                min_duration_minutes: env_parse(
                    env_config::SLOT_MIN_DURATION_MINUTES,
                    slots::MIN_DURATION_MINUTES,
                )?,
                max_duration_minutes: env_parse(
                    env_config::SLOT_MAX_DURATION_MINUTES,
                    slots::MAX_DURATION_MINUTES,
                )?,
            },
            audience: AudienceConfig {
                active_window_days: env_parse(
                    env_config::AUDIENCE_ACTIVE_WINDOW_DAYS,
                    audience::ACTIVE_WINDOW_DAYS,
                )?,
                inactive_threshold_days: env_parse(
                    env_config::AUDIENCE_INACTIVE_THRESHOLD_DAYS,
                    audience::INACTIVE_THRESHOLD_DAYS,
                )?,
            },
            delivery: DeliveryConfig {
                queue_capacity: env_parse(
                    env_config::DELIVERY_QUEUE_CAPACITY,
                    notifications::DEFAULT_QUEUE_CAPACITY,
                )?,
                email_webhook_url: env_url(env_config::EMAIL_WEBHOOK_URL)?,
                push_webhook_url: env_url(env_config::PUSH_WEBHOOK_URL)?,
                sms_webhook_url: env_url(env_config::SMS_WEBHOOK_URL)?,
                webhook_timeout_secs: env_parse(
                    env_config::WEBHOOK_TIMEOUT_SECS,
                    notifications::DEFAULT_WEBHOOK_TIMEOUT_SECS,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found
    pub fn validate(&self) -> Result<()> {
        let slots = &self.slots;
        if slots.min_duration_minutes == 0 {
            bail!("SLOT_MIN_DURATION_MINUTES must be positive");
        }
        if slots.min_duration_minutes > slots.max_duration_minutes {
            bail!("SLOT_MIN_DURATION_MINUTES cannot exceed SLOT_MAX_DURATION_MINUTES");
        }
        if !(slots.min_duration_minutes..=slots.max_duration_minutes)
            .contains(&slots.default_duration_minutes)
        {
            bail!("SLOT_DEFAULT_DURATION_MINUTES must lie between the minimum and maximum");
        }
        if self.audience.active_window_days <= 0 || self.audience.inactive_threshold_days <= 0 {
            bail!("Audience windows must be positive day counts");
        }
        if self.audience.active_window_days > audience::MAX_WINDOW_DAYS
            || self.audience.inactive_threshold_days > audience::MAX_WINDOW_DAYS
        {
            bail!(
                "Audience windows cannot exceed {} days",
                audience::MAX_WINDOW_DAYS
            );
        }
        if self.delivery.queue_capacity == 0 {
            bail!("DELIVERY_QUEUE_CAPACITY must be positive");
        }
        if self.request_timeout_secs == 0 || self.delivery.webhook_timeout_secs == 0 {
            bail!("Timeouts must be positive");
        }
        Ok(())
    }

    /// Human readable summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        let transport = |url: &Option<Url>| url.as_ref().map_or("log only", |_| "webhook");
        format!(
            "Coachline Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Request Timeout: {}s\n\
             - Slot Durations: default {} / min {} / max {} minutes\n\
             - Audience Windows: active {}d / inactive {}d\n\
             - Delivery Queue Capacity: {}\n\
             - Email: {}\n\
             - Push: {}\n\
             - SMS: {}",
            self.http_port,
            self.environment,
            if self.database_url.contains(":memory:") {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.request_timeout_secs,
            self.slots.default_duration_minutes,
            self.slots.min_duration_minutes,
            self.slots.max_duration_minutes,
            self.audience.active_window_days,
            self.audience.inactive_threshold_days,
            self.delivery.queue_capacity,
            transport(&self.delivery.email_webhook_url),
            transport(&self.delivery.push_webhook_url),
            transport(&self.delivery.sms_webhook_url),
        )
    }
}

/// Get an environment variable or a default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset or blank
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Invalid {key} value: {raw}")),
        _ => Ok(default),
    }
}

/// Parse an optional URL environment variable
fn env_url(key: &str) -> Result<Option<Url>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => Url::parse(raw.trim())
            .map(Some)
            .with_context(|| format!("Invalid {key} value: {raw}")),
        _ => Ok(None),
    }
}
