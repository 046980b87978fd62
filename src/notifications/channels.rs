// ABOUTME: Out-of-app channel transports for email, push and SMS deliveries
// ABOUTME: ChannelSender trait with webhook and log-only implementations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::config::DeliveryConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Channel, NotificationPriority};
use crate::utils::http_client::create_client_with_timeout;

/// One message bound for one contact address on one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    /// Send this delivery belongs to
    pub batch_id: Uuid,
    /// Channel used
    pub channel: Channel,
    /// Recipient user id
    pub recipient_id: Uuid,
    /// Recipient display name
    pub recipient_name: String,
    /// Email address, push token or phone number
    pub address: String,
    /// Title
    pub title: String,
    /// Body
    pub message: String,
    /// Urgency
    pub priority: NotificationPriority,
    /// Call-to-action link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// Transport for one delivery channel
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Channel served by this sender
    fn channel(&self) -> Channel;

    /// Deliver one message
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceError` when the transport rejects the message
    async fn send(&self, delivery: &Delivery) -> AppResult<()>;
}

/// Posts each delivery as JSON to a transport webhook
pub struct WebhookChannelSender {
    channel: Channel,
    client: Client,
    url: Url,
}

impl WebhookChannelSender {
    /// Create a sender posting to `url`
    #[must_use]
    pub fn new(channel: Channel, url: Url, timeout_secs: u64) -> Self {
        Self {
            channel,
            client: create_client_with_timeout(timeout_secs, timeout_secs.min(5)),
            url,
        }
    }
}

#[async_trait]
impl ChannelSender for WebhookChannelSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, delivery: &Delivery) -> AppResult<()> {
        let service = format!("{} webhook", self.channel);
        let response = self
            .client
            .post(self.url.clone())
            .json(delivery)
            .send()
            .await
            .map_err(|e| AppError::external_service(&service, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(
                service,
                format!("transport responded with {status}"),
            ));
        }

        debug!(
            channel = %self.channel,
            batch_id = %delivery.batch_id,
            recipient_id = %delivery.recipient_id,
            "Delivery handed to webhook"
        );
        Ok(())
    }
}

/// Records deliveries in the log instead of sending them
pub struct LoggingChannelSender {
    channel: Channel,
}

impl LoggingChannelSender {
    /// Create a log-only sender for `channel`
    #[must_use]
    pub const fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl ChannelSender for LoggingChannelSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, delivery: &Delivery) -> AppResult<()> {
        info!(
            channel = %self.channel,
            batch_id = %delivery.batch_id,
            recipient_id = %delivery.recipient_id,
            title = %delivery.title,
            "Delivery logged (no transport configured)"
        );
        Ok(())
    }
}

/// One sender per channel
#[derive(Clone)]
pub struct ChannelSenders {
    email: Arc<dyn ChannelSender>,
    push: Arc<dyn ChannelSender>,
    sms: Arc<dyn ChannelSender>,
}

impl ChannelSenders {
    /// Assemble senders explicitly
    #[must_use]
    pub fn new(
        email: Arc<dyn ChannelSender>,
        push: Arc<dyn ChannelSender>,
        sms: Arc<dyn ChannelSender>,
    ) -> Self {
        Self { email, push, sms }
    }

    /// Webhook senders where a URL is configured, log-only senders elsewhere
    #[must_use]
    pub fn from_config(config: &DeliveryConfig) -> Self {
        let build = |channel: Channel, url: Option<&Url>| -> Arc<dyn ChannelSender> {
            match url {
                Some(url) => Arc::new(WebhookChannelSender::new(
                    channel,
                    url.clone(),
                    config.webhook_timeout_secs,
                )),
                None => Arc::new(LoggingChannelSender::new(channel)),
            }
        };
        Self {
            email: build(Channel::Email, config.email_webhook_url.as_ref()),
            push: build(Channel::Push, config.push_webhook_url.as_ref()),
            sms: build(Channel::Sms, config.sms_webhook_url.as_ref()),
        }
    }

    /// Sender for `channel`
    #[must_use]
    pub fn get(&self, channel: Channel) -> &Arc<dyn ChannelSender> {
        match channel {
            Channel::Email => &self.email,
            Channel::Push => &self.push,
            Channel::Sms => &self.sms,
        }
    }
}
