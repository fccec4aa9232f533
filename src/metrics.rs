//! Prometheus metrics for request latency and item traffic.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use strum::Display;
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Items created counter metric name.
pub const METRIC_ITEMS_CREATED: &str = "items_created_total";
/// Failed item requests counter metric name.
pub const METRIC_ITEM_REQUEST_FAILURES: &str = "item_request_failures_total";
/// Rejected (400) item requests counter metric name.
pub const METRIC_ITEM_REQUESTS_REJECTED: &str = "item_requests_rejected_total";
/// Schema initialization failures counter metric name.
pub const METRIC_SCHEMA_INIT_FAILURES: &str = "schema_init_failures_total";

/// Endpoint label attached to latency samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    /// `GET /`
    Root,
    /// `POST /items`
    CreateItem,
    /// `GET /items`
    ListItems,
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(METRIC_ITEMS_CREATED, "Total number of items created");
    describe_counter!(
        METRIC_ITEM_REQUEST_FAILURES,
        "Total number of item requests that failed with a server error"
    );
    describe_counter!(
        METRIC_ITEM_REQUESTS_REJECTED,
        "Total number of item requests rejected as invalid"
    );
    describe_counter!(
        METRIC_SCHEMA_INIT_FAILURES,
        "Total number of failed schema initializations"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and return a handle for rendering.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record HTTP request latency for an endpoint.
pub fn record_http_latency(start: Instant, endpoint: Endpoint) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment items created counter.
pub fn inc_items_created() {
    counter!(METRIC_ITEMS_CREATED).increment(1);
}

/// Increment failed item requests counter.
pub fn inc_item_request_failures() {
    counter!(METRIC_ITEM_REQUEST_FAILURES).increment(1);
}

/// Increment rejected item requests counter.
pub fn inc_item_requests_rejected() {
    counter!(METRIC_ITEM_REQUESTS_REJECTED).increment(1);
}

/// Increment schema initialization failures counter.
pub fn inc_schema_init_failures() {
    counter!(METRIC_SCHEMA_INIT_FAILURES).increment(1);
}

/// RAII guard for timing a request.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    endpoint: Endpoint,
}

impl LatencyTimer {
    /// Create a new latency timer for the given endpoint.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_http_latency(self.start, self.endpoint);
    }
}
