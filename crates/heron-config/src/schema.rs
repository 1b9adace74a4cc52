//! Configuration schema types.
//!
//! One struct per configuration section. Every field has a default, so any
//! subset of a section may be given.

use serde::{Deserialize, Serialize};

/// CORS setting of the server section.
///
/// Accepts either a boolean or a table naming the allowed origin:
///
/// ```toml
/// cors = true
/// # or
/// cors = { allow_origin = "https://app.example.com" }
/// ```
///
/// # Example
///
/// ```
/// use heron_config::CorsSetting;
///
/// assert_eq!(CorsSetting::Flag(true).allow_origin(), Some("*"));
/// assert_eq!(CorsSetting::Flag(false).allow_origin(), None);
/// assert_eq!(CorsSetting::origin("https://a.test").allow_origin(), Some("https://a.test"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorsSetting {
    /// `true` allows every origin, `false` disables CORS.
    Flag(bool),
    /// CORS enabled for a single origin.
    Origin {
        /// Value sent in `Access-Control-Allow-Origin`.
        #[serde(alias = "allowOrigin")]
        allow_origin: String,
    },
}

impl Default for CorsSetting {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl CorsSetting {
    /// CORS for a single origin.
    #[must_use]
    pub fn origin(origin: impl Into<String>) -> Self {
        Self::Origin {
            allow_origin: origin.into(),
        }
    }

    /// Returns true unless CORS is disabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Flag(false))
    }

    /// Returns the allowed origin, `*` for `true`, or `None` when disabled.
    #[must_use]
    pub fn allow_origin(&self) -> Option<&str> {
        match self {
            Self::Flag(true) => Some("*"),
            Self::Flag(false) => None,
            Self::Origin { allow_origin } => Some(allow_origin),
        }
    }
}

impl From<bool> for CorsSetting {
    fn from(enabled: bool) -> Self {
        Self::Flag(enabled)
    }
}

/// Server section.
///
/// # Example
///
/// ```
/// use heron_config::{CorsSetting, ServerSection};
///
/// let section = ServerSection {
///     port: 3030,
///     cors: CorsSetting::Flag(true),
///     ..Default::default()
/// };
/// assert_eq!(section.host, "0.0.0.0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Server name used in lifecycle logs.
    #[serde(default = "default_name")]
    pub name: String,

    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port. `0` picks an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log request events.
    #[serde(default)]
    pub verbose: bool,

    /// Register the `json` middleware.
    #[serde(default)]
    pub json: bool,

    /// CORS handling.
    #[serde(default)]
    pub cors: CorsSetting,

    /// Limit for receiving a request body, in milliseconds. `0` waits forever.
    #[serde(default = "default_body_timeout")]
    pub body_timeout_ms: u64,

    /// Time allowed for open connections to finish on stop.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            host: default_host(),
            port: default_port(),
            verbose: false,
            json: false,
            cors: CorsSetting::default(),
            body_timeout_ms: default_body_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_name() -> String {
    "heron".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_body_timeout() -> u64 {
    30_000
}

fn default_shutdown_timeout() -> u64 {
    30
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines.
    #[default]
    Json,
    /// Human-readable text.
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Install a log subscriber.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (trace, debug, info, warn, error, or per-target).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingSection {
    /// Converts to the subscriber configuration.
    #[must_use]
    pub fn to_log_config(&self) -> heron_telemetry::LogConfig {
        heron_telemetry::LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            file_line_info: self.include_location,
            include_target: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the Prometheus exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Exporter listen address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_metrics_addr(),
        }
    }
}

impl MetricsSection {
    /// Converts to the exporter configuration.
    #[must_use]
    pub fn to_metrics_config(&self) -> heron_telemetry::MetricsConfig {
        heron_telemetry::MetricsConfig {
            enabled: self.enabled,
            addr: self.addr.clone(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}
