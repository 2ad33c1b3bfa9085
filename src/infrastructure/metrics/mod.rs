//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Active WebSocket connection gauge
//! - Active room gauge
//! - Session issuance, dice roll, and room broadcast counters

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace("dicehall"),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace("dicehall")
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Active WebSocket connections gauge
///
/// Connections count only after the credential check passes, so every counted
/// connection carries a bound identity.
pub static WEBSOCKET_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "websocket_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace("dicehall"),
    )
    .expect("Failed to create WEBSOCKET_CONNECTIONS_ACTIVE metric")
});

/// Active rooms gauge
pub static ROOMS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("rooms_active", "Number of rooms with at least one member")
            .namespace("dicehall"),
    )
    .expect("Failed to create ROOMS_ACTIVE metric")
});

/// Session issuance counter
pub static SESSIONS_ISSUED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("sessions_issued_total", "Total number of session tokens issued")
            .namespace("dicehall"),
    )
    .expect("Failed to create SESSIONS_ISSUED_TOTAL metric")
});

/// Dice roll counter by rolled value
pub static DICE_ROLLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("dice_rolls_total", "Total number of dice rolls").namespace("dicehall"),
        &["value"],
    )
    .expect("Failed to create DICE_ROLLS_TOTAL metric")
});

/// Room broadcast counter by event type
pub static ROOM_BROADCASTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "room_broadcasts_total",
            "Total number of events broadcast to rooms",
        )
        .namespace("dicehall"),
        &["event"],
    )
    .expect("Failed to create ROOM_BROADCASTS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(WEBSOCKET_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register WEBSOCKET_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(ROOMS_ACTIVE.clone()))
        .expect("Failed to register ROOMS_ACTIVE");
    registry
        .register(Box::new(SESSIONS_ISSUED_TOTAL.clone()))
        .expect("Failed to register SESSIONS_ISSUED_TOTAL");
    registry
        .register(Box::new(DICE_ROLLS_TOTAL.clone()))
        .expect("Failed to register DICE_ROLLS_TOTAL");
    registry
        .register(Box::new(ROOM_BROADCASTS_TOTAL.clone()))
        .expect("Failed to register ROOM_BROADCASTS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record an issued session token
pub fn record_session_issued() {
    SESSIONS_ISSUED_TOTAL.inc();
}

/// Helper to record a dice roll result
pub fn record_dice_roll(value: u8) {
    DICE_ROLLS_TOTAL
        .with_label_values(&[&value.to_string()])
        .inc();
}

/// Helper to record an event fanned out to a room
pub fn record_broadcast(event: &str) {
    ROOM_BROADCASTS_TOTAL.with_label_values(&[event]).inc();
}

/// Helper to track WebSocket connection lifecycle
pub fn connection_opened() {
    WEBSOCKET_CONNECTIONS_ACTIVE.inc();
}

/// Helper to track WebSocket connection lifecycle
pub fn connection_closed() {
    WEBSOCKET_CONNECTIONS_ACTIVE.dec();
}

/// Helper to publish the current room count
pub fn set_rooms_active(count: usize) {
    ROOMS_ACTIVE.set(count as i64);
}
