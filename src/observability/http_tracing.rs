//! # HTTP Request Tracing Middleware
//!
//! Axum middleware that runs each request inside an `http_request` span and
//! logs its completion with status and latency.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Instrument;

/// Axum middleware that wraps each HTTP request in a tracing span
pub async fn trace_http_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = crate::request_span!(method, path);
    let start = Instant::now();

    async move {
        let response = next.run(request).await;

        let status_code = response.status().as_u16();
        let elapsed_ms = start.elapsed().as_millis();

        if response.status().is_server_error() {
            tracing::warn!(status_code, elapsed_ms, "Request failed");
        } else {
            tracing::info!(status_code, elapsed_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}
