//! Prometheus metrics.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `hermes_requests_total` | Counter | `service`, `operation`, `status` | Requests answered |
//! | `hermes_request_duration_seconds` | Histogram | `service`, `operation` | Dispatch latency |
//! | `hermes_in_flight_requests` | Gauge | - | Requests being dispatched |
//! | `hermes_handler_faults_total` | Counter | `service`, `operation` | Handler panics recovered |
//!
//! Recording goes through the `metrics` facade, so it is a no-op until a
//! recorder is installed with [`init_metrics`].

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

/// Metric names.
pub mod names {
    /// Requests answered, by service, operation and status.
    pub const REQUESTS_TOTAL: &str = "hermes_requests_total";
    /// Dispatch latency in seconds.
    pub const REQUEST_DURATION_SECONDS: &str = "hermes_request_duration_seconds";
    /// Requests currently being dispatched.
    pub const IN_FLIGHT_REQUESTS: &str = "hermes_in_flight_requests";
    /// Handler panics converted into 500 responses.
    pub const HANDLER_FAULTS_TOTAL: &str = "hermes_handler_faults_total";
}

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether to install the exporter.
    pub enabled: bool,

    /// Address of the Prometheus scrape endpoint (e.g. `"0.0.0.0:9090"`).
    pub addr: String,

    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: "0.0.0.0:9090".to_string(),
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Installs the Prometheus recorder and starts its scrape listener.
///
/// Must be called from within a Tokio runtime; the listener runs as a task
/// on it. Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns an error if the address does not parse, no runtime is running,
/// or a global recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|e| TelemetryError::MetricsInit(format!("no Tokio runtime: {e}")))?;

    let (recorder, exporter) = PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(names::REQUEST_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .build()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    metrics::set_global_recorder(recorder)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    runtime.spawn(async move {
        if let Err(err) = exporter.await {
            tracing::warn!(error = ?err, "metrics exporter stopped");
        }
    });

    describe_metrics();
    tracing::info!(%addr, "metrics endpoint listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(names::REQUESTS_TOTAL, "Requests answered by the gateway");
    describe_histogram!(
        names::REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Time from routing to response"
    );
    describe_gauge!(
        names::IN_FLIGHT_REQUESTS,
        "Requests currently being dispatched"
    );
    describe_counter!(
        names::HANDLER_FAULTS_TOTAL,
        "Handler panics recovered at the dispatch boundary"
    );
}

/// Records one answered request.
pub fn record_request(service: &str, operation: &str, status_code: u16, duration: Duration) {
    counter!(
        names::REQUESTS_TOTAL,
        "service" => service.to_string(),
        "operation" => operation.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(
        names::REQUEST_DURATION_SECONDS,
        "service" => service.to_string(),
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a recovered handler panic.
pub fn record_handler_fault(service: &str, operation: &str) {
    counter!(
        names::HANDLER_FAULTS_TOTAL,
        "service" => service.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Counts a request as in flight until dropped.
///
/// Dropping happens on every exit path, including unwinding.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(names::IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(names::IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}
