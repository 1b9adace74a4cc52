//! Logging and metrics for Heron.
//!
//! - **Logging**: `tracing` events, installed with [`init_logging`] as JSON
//!   lines or human-readable text.
//! - **Request logging**: [`RequestLogger`], owned by the dispatcher and
//!   silent unless the server is verbose.
//! - **Metrics**: `metrics` facade counters recorded on every dispatch, with
//!   an optional Prometheus exporter installed by [`init_metrics`].
//!
//! # Example
//!
//! ```rust,ignore
//! use heron_telemetry::{init_telemetry, MetricsConfig, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder()
//!     .metrics(MetricsConfig {
//!         enabled: true,
//!         ..MetricsConfig::default()
//!     })
//!     .build();
//! init_telemetry(&config)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
mod request_log;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, record_request, render_metrics, InFlightGuard, MetricsConfig};
pub use request_log::RequestLogger;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Installs logging, then metrics.
///
/// # Errors
///
/// Returns the first subsystem failure.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    Ok(())
}
