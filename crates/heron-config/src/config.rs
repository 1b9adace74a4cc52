//! The top-level [`HeronConfig`].

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, CorsSetting, LogFormat, LoggingSection, MetricsSection, ServerSection};

/// Complete Heron configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use heron_config::HeronConfig;
///
/// let config = HeronConfig::default();
/// assert_eq!(config.server.port, 80);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HeronConfig {
    /// Server section.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging section.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Metrics section.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl HeronConfig {
    /// Validates cross-field constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::invalid_value("server.name", "must not be empty"));
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid_value("server.host", "must not be empty"));
        }

        if let CorsSetting::Origin { allow_origin } = &self.server.cors {
            if allow_origin.is_empty() {
                return Err(ConfigError::invalid_value(
                    "server.cors.allow_origin",
                    "must not be empty",
                ));
            }
            if !allow_origin.bytes().all(|b| b.is_ascii_graphic() || b == b' ') {
                return Err(ConfigError::invalid_value(
                    "server.cors.allow_origin",
                    format!("not a valid header value: {allow_origin:?}"),
                ));
            }
        }

        if self.logging.enabled {
            heron_telemetry::logging::create_env_filter(&self.logging.level).map_err(|e| {
                ConfigError::invalid_value("logging.level", e.to_string())
            })?;
        }

        if self.metrics.enabled && self.metrics.addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "metrics.addr",
                format!("invalid socket address: {}", self.metrics.addr),
            ));
        }

        Ok(())
    }

    /// Local development preset: verbose, text logs at `debug`.
    #[must_use]
    pub fn development() -> Self {
        Self {
            server: ServerSection {
                verbose: true,
                ..ServerSection::default()
            },
            logging: LoggingSection {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                ..LoggingSection::default()
            },
            metrics: MetricsSection::default(),
        }
    }

    /// Production preset: quiet, JSON logs at `info`, metrics exported.
    #[must_use]
    pub fn production() -> Self {
        Self {
            server: ServerSection::default(),
            logging: LoggingSection::default(),
            metrics: MetricsSection {
                enabled: true,
                ..MetricsSection::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(HeronConfig::default().validate().is_ok());
        assert!(HeronConfig::development().validate().is_ok());
        assert!(HeronConfig::production().validate().is_ok());
    }

    #[test]
    fn test_development_preset() {
        let config = HeronConfig::development();
        assert!(config.server.verbose);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_validate_empty_origin() {
        let mut config = HeronConfig::default();
        config.server.cors = CorsSetting::origin("");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.cors.allow_origin"));
    }

    #[test]
    fn test_validate_origin_with_newline() {
        let mut config = HeronConfig::default();
        config.server.cors = CorsSetting::origin("https://a.test\r\nx: y");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = HeronConfig::default();
        config.logging.level = "heron=loudest".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));

        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_metrics_addr() {
        let mut config = HeronConfig::default();
        config.metrics.addr = "nowhere".to_string();
        assert!(config.validate().is_ok());

        config.metrics.enabled = true;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metrics.addr"));
    }

    #[test]
    fn test_validate_blank_host() {
        let mut config = HeronConfig::default();
        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
