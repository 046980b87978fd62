// ABOUTME: Notification dispatcher persisting a broadcast and fanning it out to channels
// ABOUTME: Atomic per-recipient row insert followed by per-channel delivery queue hand-off
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Notification Dispatcher
//!
//! A send is processed in two phases:
//!
//! 1. One [`Notification`] row per recipient is written in a single
//!    transaction. Failure here fails the send and nothing is persisted.
//! 2. Recipients are partitioned per channel: a recipient joins a channel
//!    when the channel was requested and the recipient has a usable contact
//!    for it. Each non-empty partition is handed to the [`DeliveryQueue`].
//!    A failed hand-off is logged and does not undo phase 1.
//!
//! The summary reports how many deliveries each queue accepted, not whether
//! transports later succeeded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tracing::{error, info};
use uuid::Uuid;

use super::channels::Delivery;
use super::queue::{DeliveryJob, DeliveryQueue};
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::{Channel, Notification, NotificationPayload, NotificationSummary, Recipient};

/// Persists broadcasts and hands deliveries to the queue
#[derive(Clone)]
pub struct NotificationDispatcher {
    database: Database,
    queue: Arc<dyn DeliveryQueue>,
}

impl NotificationDispatcher {
    /// Create a dispatcher
    #[must_use]
    pub fn new(database: Database, queue: Arc<dyn DeliveryQueue>) -> Self {
        Self { database, queue }
    }

    /// Persist and fan out one broadcast
    ///
    /// # Errors
    ///
    /// Returns a database error if the rows cannot be written
    pub async fn dispatch(
        &self,
        sent_by: Uuid,
        payload: &NotificationPayload,
        recipients: &[Recipient],
        now: DateTime<Utc>,
    ) -> AppResult<NotificationSummary> {
        let batch_id = Uuid::new_v4();
        let rows = build_rows(batch_id, sent_by, payload, recipients, now);

        self.database
            .notifications()
            .insert_batch(&rows)
            .await
            .inspect_err(|e| {
                error!(
                    batch_id = %batch_id,
                    recipients = recipients.len(),
                    error = %e,
                    "Failed to persist notification batch"
                );
            })?;

        let jobs = partition(batch_id, payload, recipients);
        let outcomes = join_all(jobs.into_iter().map(|job| self.hand_off(batch_id, job))).await;

        let mut summary = NotificationSummary {
            total_recipients: rows.len(),
            emails_sent: 0,
            push_notifications_sent: 0,
            sms_sent: 0,
            scheduled_for: payload.scheduled_for,
            expires_at: payload.expires_at,
        };
        for (channel, queued) in outcomes {
            match channel {
                Channel::Email => summary.emails_sent = queued,
                Channel::Push => summary.push_notifications_sent = queued,
                Channel::Sms => summary.sms_sent = queued,
            }
        }

        info!(
            batch_id = %batch_id,
            sent_by = %sent_by,
            total_recipients = summary.total_recipients,
            emails = summary.emails_sent,
            push = summary.push_notifications_sent,
            sms = summary.sms_sent,
            "Notification batch dispatched"
        );
        Ok(summary)
    }

    /// Enqueue a job, returning how many deliveries were accepted
    async fn hand_off(&self, batch_id: Uuid, job: DeliveryJob) -> (Channel, usize) {
        let channel = job.channel;
        let count = job.len();
        match self.queue.enqueue(job).await {
            Ok(()) => (channel, count),
            Err(e) => {
                error!(
                    batch_id = %batch_id,
                    channel = %channel,
                    deliveries = count,
                    error = %e,
                    "Failed to enqueue deliveries"
                );
                (channel, 0)
            }
        }
    }
}

fn build_rows(
    batch_id: Uuid,
    sent_by: Uuid,
    payload: &NotificationPayload,
    recipients: &[Recipient],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    recipients
        .iter()
        .map(|recipient| Notification {
            id: Uuid::new_v4(),
            batch_id,
            user_id: recipient.id,
            title: payload.title.clone(),
            message: payload.message.clone(),
            notification_type: payload.notification_type,
            priority: payload.priority,
            action_url: payload.action_url.clone(),
            action_label: payload.action_label.clone(),
            scheduled_for: payload.scheduled_for,
            expires_at: payload.expires_at,
            sent_by,
            is_read: false,
            created_at: now,
        })
        .collect()
}

fn contact_for(recipient: &Recipient, channel: Channel) -> Option<&str> {
    match channel {
        Channel::Email => recipient.usable_email(),
        Channel::Push => recipient.usable_push_token(),
        Channel::Sms => recipient.usable_phone(),
    }
}

/// Split recipients into one job per requested channel, skipping empty jobs
fn partition(batch_id: Uuid, payload: &NotificationPayload, recipients: &[Recipient]) -> Vec<DeliveryJob> {
    Channel::ALL
        .into_iter()
        .filter(|channel| payload.channels.requested(*channel))
        .map(|channel| DeliveryJob {
            channel,
            deliveries: recipients
                .iter()
                .filter_map(|recipient| {
                    contact_for(recipient, channel).map(|address| Delivery {
                        batch_id,
                        channel,
                        recipient_id: recipient.id,
                        recipient_name: recipient.name.clone(),
                        address: address.to_owned(),
                        title: payload.title.clone(),
                        message: payload.message.clone(),
                        priority: payload.priority,
                        action_url: payload.action_url.clone(),
                    })
                })
                .collect(),
        })
        .filter(|job| !job.is_empty())
        .collect()
}
