// ABOUTME: Asynchronous delivery queue decoupling notification sends from transports
// ABOUTME: DeliveryQueue trait and a bounded tokio mpsc implementation with a worker task
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::channels::{ChannelSenders, Delivery};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::Channel;

/// Deliveries of one batch for one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryJob {
    /// Channel all deliveries use
    pub channel: Channel,
    /// Individual messages
    pub deliveries: Vec<Delivery>,
}

impl DeliveryJob {
    /// Number of messages in the job
    #[must_use]
    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    /// Whether the job carries no messages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}

/// Hand-off point between the dispatcher and channel transports
#[async_trait]
pub trait DeliveryQueue: Send + Sync {
    /// Accept a job for asynchronous delivery
    ///
    /// # Errors
    ///
    /// Returns an error when the job cannot be accepted; nothing is delivered then
    async fn enqueue(&self, job: DeliveryJob) -> AppResult<()>;
}

/// Bounded in-process queue drained by a background worker
#[derive(Clone)]
pub struct MpscDeliveryQueue {
    sender: mpsc::Sender<DeliveryJob>,
}

impl MpscDeliveryQueue {
    /// Create the queue and spawn its worker
    ///
    /// The worker exits once every queue handle is dropped and the backlog is drained.
    #[must_use]
    pub fn spawn(capacity: usize, senders: ChannelSenders) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(receiver, senders));
        (Self { sender }, worker)
    }
}

#[async_trait]
impl DeliveryQueue for MpscDeliveryQueue {
    async fn enqueue(&self, job: DeliveryJob) -> AppResult<()> {
        let channel = job.channel;
        let count = job.len();
        self.sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("{channel} delivery queue is full"),
            ),
            TrySendError::Closed(_) => {
                AppError::internal(format!("{channel} delivery queue is closed"))
            }
        })?;
        debug!(channel = %channel, deliveries = count, "Delivery job queued");
        Ok(())
    }
}

async fn run_worker(mut receiver: mpsc::Receiver<DeliveryJob>, senders: ChannelSenders) {
    info!("Delivery worker started");
    while let Some(job) = receiver.recv().await {
        let sender = senders.get(job.channel);
        let mut failed = 0_usize;
        for delivery in &job.deliveries {
            if let Err(e) = sender.send(delivery).await {
                failed += 1;
                warn!(
                    channel = %job.channel,
                    batch_id = %delivery.batch_id,
                    recipient_id = %delivery.recipient_id,
                    error = %e,
                    "Delivery failed"
                );
            }
        }
        debug!(
            channel = %job.channel,
            delivered = job.len() - failed,
            failed,
            "Delivery job processed"
        );
    }
    info!("Delivery worker stopped");
}
