//! Log subscriber installation.
//!
//! Heron logs through `tracing`. Nothing is printed until an application
//! calls [`init_logging`]; the server and dispatcher never install a
//! subscriber themselves.
//!
//! ```rust,ignore
//! use heron_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig {
//!     level: "heron_server=debug,info".to_string(),
//!     json_format: false,
//!     ..LogConfig::default()
//! })?;
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::TelemetryError;
use crate::TelemetryResult;

type BoxedFmtLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// How the process-wide subscriber formats events.
///
/// The default writes JSON lines at `info` with the event target and
/// without source locations.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// When false, [`init_logging`] leaves the global subscriber alone.
    pub enabled: bool,

    /// `EnvFilter` directive, e.g. `"info"` or `"heron_server=debug,warn"`.
    pub level: String,

    /// JSON lines when true, human-readable text otherwise.
    pub json_format: bool,

    /// Adds source file and line to each event.
    pub file_line_info: bool,

    /// Adds the event target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            file_line_info: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    fn fmt_layer(&self) -> BoxedFmtLayer {
        let layer = tracing_subscriber::fmt::layer()
            .with_file(self.file_line_info)
            .with_line_number(self.file_line_info)
            .with_target(self.include_target);

        if self.json_format {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }
}

/// Installs the global log subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::LoggingInit`] when the level directive does not
/// parse or another subscriber already owns the process.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;
    tracing_subscriber::registry()
        .with(config.fmt_layer().with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Parses an `EnvFilter` directive.
///
/// # Errors
///
/// Returns [`TelemetryError::LoggingInit`] naming the rejected directive.
pub fn create_env_filter(directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| {
        TelemetryError::LoggingInit(format!("bad log directive {directive:?}: {e}"))
    })
}
