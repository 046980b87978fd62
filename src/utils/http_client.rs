// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Builds the reqwest clients used by outbound delivery transports

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::constants::service_names;

/// Idle pooled connections kept per webhook host
const POOL_MAX_IDLE_PER_HOST: usize = 8;

/// Create a new HTTP client for webhook deliveries
///
/// Requests identify themselves as the Coachline server. Falls back to a
/// default client if the builder fails (TLS backend initialization is the
/// only failure mode in practice).
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .user_agent(concat!("coachline-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(
                service = service_names::COACHLINE_SERVER,
                error = %e,
                "Falling back to default HTTP client"
            );
            Client::new()
        })
}
