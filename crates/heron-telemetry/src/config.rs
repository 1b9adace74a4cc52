//! Combined telemetry settings passed to [`init_telemetry`](crate::init_telemetry).

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Logging and metrics settings. Sections left unset keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Subscriber settings.
    pub logging: LogConfig,
    /// Prometheus exporter settings.
    pub metrics: MetricsConfig,
}

impl TelemetryConfig {
    /// Starts from the defaults.
    #[must_use]
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }
}

/// Builder for [`TelemetryConfig`].
#[derive(Debug, Default)]
pub struct TelemetryConfigBuilder {
    config: TelemetryConfig,
}

impl TelemetryConfigBuilder {
    /// Replaces the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LogConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Replaces the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.config.metrics = metrics;
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> TelemetryConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::builder().build();
        assert!(config.logging.enabled);
        assert!(config.logging.json_format);
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.addr, "0.0.0.0:9090");
    }

    #[test]
    fn test_builder_keeps_sections() {
        let config = TelemetryConfig::builder()
            .logging(LogConfig {
                level: "debug".to_string(),
                json_format: false,
                ..LogConfig::default()
            })
            .metrics(MetricsConfig {
                enabled: true,
                addr: "127.0.0.1:9999".to_string(),
            })
            .build();

        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json_format);
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.addr, "127.0.0.1:9999");
    }
}
