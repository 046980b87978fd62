// ABOUTME: Notification fan-out module: dispatcher, delivery queue and channel transports
// ABOUTME: Persists one row per recipient and hands channel deliveries to a background worker
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Email, push and SMS transports
pub mod channels;

/// Batch persistence and per-channel partitioning
pub mod dispatcher;

/// Asynchronous delivery queue and worker
pub mod queue;

pub use channels::{ChannelSender, ChannelSenders, Delivery, LoggingChannelSender, WebhookChannelSender};
pub use dispatcher::NotificationDispatcher;
pub use queue::{DeliveryJob, DeliveryQueue, MpscDeliveryQueue};
