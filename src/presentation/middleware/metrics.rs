//! HTTP Metrics Middleware

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::infrastructure::metrics;

/// Record request count and latency for every HTTP response.
///
/// The path label is the matched route template, so label cardinality stays
/// bounded by the route table. Requests that match no route all share the
/// `unmatched` label; arbitrary scanned paths never become label values.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
