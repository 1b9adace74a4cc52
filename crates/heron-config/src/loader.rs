//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, CorsSetting, HeronConfig, LogFormat};

/// Configuration loader.
///
/// Layers apply in order, later ones winning:
/// 1. Defaults built into the schema
/// 2. A TOML or JSON file (or string)
/// 3. Environment variables `PREFIX__SECTION__KEY`
///
/// # Example
///
/// ```no_run
/// use heron_config::ConfigLoader;
///
/// # fn main() -> Result<(), heron_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("heron.toml")?
///     .with_env_prefix("HERON")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: HeronConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader holding the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HeronConfig::default(),
            env_prefix: None,
        }
    }

    /// Resets to the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = HeronConfig::default();
        self
    }

    /// Starts from the development preset.
    ///
    /// ```
    /// use heron_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert!(config.server.verbose);
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = HeronConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = HeronConfig::production();
        self
    }

    /// Loads a file; the format follows the extension (`.toml` or `.json`).
    ///
    /// Sections and fields the file leaves out take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed or
    /// contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        self.config = parse(&content, format)?;

        Ok(self)
    }

    /// Loads a file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`with_file`](Self::with_file) once the file exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in `format` (`"toml"` or `"json"`).
    ///
    /// ```
    /// use heron_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[server]\nport = 3030\ncors = true", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.port, 3030);
    /// assert!(config.server.cors.is_enabled());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Enables environment overrides under `prefix`.
    ///
    /// With prefix `HERON`: `HERON__SERVER__PORT=8080`,
    /// `HERON__SERVER__CORS=https://app.example.com`,
    /// `HERON__LOGGING__LEVEL=debug`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads `.env` from the working directory into the process environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(mut self) -> Result<HeronConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> HeronConfig {
        self.config
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        let mut vars: Vec<(String, String)> =
            env::vars().filter(|(k, _)| k.starts_with(&marker)).collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let rest = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = rest.split("__").collect();
        let server = &mut self.config.server;
        let logging = &mut self.config.logging;
        let metrics = &mut self.config.metrics;

        match parts.as_slice() {
            ["SERVER", "NAME"] => server.name = value.to_string(),
            ["SERVER", "HOST"] => server.host = value.to_string(),
            ["SERVER", "PORT"] => {
                server.port = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected port number"))?;
            }
            ["SERVER", "VERBOSE"] => server.verbose = parse_bool_var(key, value)?,
            ["SERVER", "JSON"] => server.json = parse_bool_var(key, value)?,
            ["SERVER", "CORS"] => {
                server.cors = match parse_bool(value) {
                    Some(flag) => CorsSetting::Flag(flag),
                    None => CorsSetting::origin(value),
                };
            }
            ["SERVER", "BODY_TIMEOUT_MS"] => {
                server.body_timeout_ms = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                server.shutdown_timeout_secs = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }

            ["LOGGING", "ENABLED"] => logging.enabled = parse_bool_var(key, value)?,
            ["LOGGING", "LEVEL"] => logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                logging.include_location = parse_bool_var(key, value)?;
            }

            ["METRICS", "ENABLED"] => metrics.enabled = parse_bool_var(key, value)?,
            ["METRICS", "ADDR"] => metrics.addr = value.to_string(),

            // Unrelated variables sharing the prefix are left alone.
            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<HeronConfig, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

/// Parses the usual spellings of a boolean.
///
/// ```
/// assert_eq!(heron_config::parse_bool("On"), Some(true));
/// assert_eq!(heron_config::parse_bool("0"), Some(false));
/// assert_eq!(heron_config::parse_bool("maybe"), None);
/// ```
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, HeronConfig::default());
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert!(config.metrics.enabled);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [server]
            name = "echo"
            port = 3030
            verbose = true
            cors = { allow_origin = "https://app.example.com" }
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.server.name, "echo");
        assert_eq!(config.server.port, 3030);
        assert!(config.server.verbose);
        assert_eq!(config.server.cors.allow_origin(), Some("https://app.example.com"));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"server": {"port": 8080, "json": true, "cors": true}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "JSON")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.server.json);
        assert_eq!(config.server.cors, CorsSetting::Flag(true));
    }

    #[test]
    fn test_loader_unknown_field_rejected() {
        let result = ConfigLoader::new().with_string("[server]\nworkers = 4", "toml");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));

        let result = ConfigLoader::new().with_string("[tracing]\nenabled = true", "toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_loader_unsupported_format() {
        let result = ConfigLoader::new().with_string("port: 1", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(f)) if f == "yaml"));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/heron.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/heron.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.server.port, 80);
    }

    #[test]
    fn test_loader_load_validates() {
        let result = ConfigLoader::new()
            .with_string("[logging]\nlevel = \"heron=loudest\"", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_loader_load_unvalidated() {
        let config = ConfigLoader::new()
            .with_string("[metrics]\nenabled = true\naddr = \"bad\"", "toml")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.metrics.addr, "bad");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool(""), None);
    }

    // Environment overrides are exercised through `apply_env_var` so the
    // tests never touch the process environment.

    #[test]
    fn test_apply_env_var_server() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__PORT", "3030", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVER__VERBOSE", "yes", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVER__NAME", "echo", "TEST").unwrap();
        assert_eq!(loader.config.server.port, 3030);
        assert!(loader.config.server.verbose);
        assert_eq!(loader.config.server.name, "echo");
    }

    #[test]
    fn test_apply_env_var_cors() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__CORS", "true", "TEST").unwrap();
        assert_eq!(loader.config.server.cors, CorsSetting::Flag(true));

        loader
            .apply_env_var("TEST__SERVER__CORS", "https://a.test", "TEST")
            .unwrap();
        assert_eq!(loader.config.server.cors, CorsSetting::origin("https://a.test"));
    }

    #[test]
    fn test_apply_env_var_invalid_port() {
        let mut loader = ConfigLoader::new();
        let err = loader
            .apply_env_var("TEST__SERVER__PORT", "70000", "TEST")
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { .. }));
    }

    #[test]
    fn test_apply_env_var_logging_and_metrics() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST").unwrap();
        loader.apply_env_var("TEST__METRICS__ENABLED", "1", "TEST").unwrap();
        loader.apply_env_var("TEST__METRICS__ADDR", "127.0.0.1:9100", "TEST").unwrap();
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
        assert!(loader.config.metrics.enabled);
        assert_eq!(loader.config.metrics.addr, "127.0.0.1:9100");

        assert!(loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST").is_err());
    }

    #[test]
    fn test_apply_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__WORKERS", "8", "TEST").unwrap();
        assert_eq!(loader.config, HeronConfig::default());
    }
}
