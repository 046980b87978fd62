// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Request spans keyed by x-request-id plus a completion log carrying status and latency

use std::time::Duration;

use http::{Request, Response};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::{field, info, info_span, warn, Span};

use crate::constants::headers;

/// Creates one `http_request` span per request
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(headers::REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown");

        info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
            actor_id = field::Empty,
            status_code = field::Empty,
            duration_ms = field::Empty,
        )
    }
}

/// Records status and latency on the request span when the response is ready
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestCompletion;

impl<B> OnResponse<B> for RequestCompletion {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status();
        let duration_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        span.record("status_code", status.as_u16());
        span.record("duration_ms", duration_ms);

        if status.is_server_error() {
            warn!(status = status.as_u16(), duration_ms, "Request failed");
        } else {
            info!(status = status.as_u16(), duration_ms, "Request completed");
        }
    }
}

/// Attach the acting user to the current request span
pub fn record_actor(actor_id: &uuid::Uuid) {
    Span::current().record("actor_id", field::display(actor_id));
}
