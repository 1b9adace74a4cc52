//! Request metrics.
//!
//! Recorded through the `metrics` facade on every dispatch. Until a recorder
//! is installed (see [`init_metrics`]) recording is a no-op.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `heron_requests_total` | Counter | `method`, `status` |
//! | `heron_request_duration_seconds` | Histogram | `method` |
//! | `heron_in_flight_requests` | Gauge | - |

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Total requests counter.
pub const REQUESTS_TOTAL: &str = "heron_requests_total";
/// Request duration histogram.
pub const REQUEST_DURATION: &str = "heron_request_duration_seconds";
/// In-flight requests gauge.
pub const IN_FLIGHT: &str = "heron_in_flight_requests";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether to install the Prometheus exporter.
    pub enabled: bool,

    /// Address the exporter listens on.
    pub addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Installs the Prometheus recorder and its scrape listener.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidAddress`] for an unparsable address and
/// [`TelemetryError::MetricsInit`] if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let handle = PrometheusBuilder::new()
        .with_http_listener(addr)
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    describe_metrics();

    Ok(())
}

/// Renders the current metrics in Prometheus text format.
///
/// Returns `None` if [`init_metrics`] has not installed a recorder.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests dispatched");
    describe_histogram!(REQUEST_DURATION, "HTTP request duration in seconds");
    describe_gauge!(IN_FLIGHT, "Number of HTTP requests currently being dispatched");
}

/// Records one finished dispatch.
pub fn record_request(method: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(REQUEST_DURATION, "method" => method.to_string()).record(duration.as_secs_f64());
}

/// Counts a dispatch as in flight until dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT).increment(1.0);
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
        gauge!(IN_FLIGHT).decrement(1.0);
    }
}
