//! Construction-time server options.

use std::time::Duration;

use heron_config::ServerSection;
use heron_middleware::stages::CorsConfig;

use crate::ServerError;

/// Options fixed when a [`Server`](crate::Server) is created.
///
/// | Option | Default |
/// |--------|---------|
/// | `host` | `0.0.0.0` |
/// | `port` | `80` |
/// | `verbose` | `false` |
/// | `json` | `false` |
/// | `cors` | disabled |
/// | `body_timeout` | 30 s |
/// | `shutdown_timeout` | 30 s |
///
/// # Example
///
/// ```
/// use heron_middleware::stages::CorsConfig;
/// use heron_server::ServerOptions;
///
/// let options = ServerOptions::new().port(3030).verbose(true).cors(CorsConfig::any());
/// assert_eq!(options.port, 3030);
/// assert!(options.cors.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Interface to bind.
    pub host: String,
    /// TCP port; `0` picks an ephemeral port.
    pub port: u16,
    /// Log request events through the request logger.
    pub verbose: bool,
    /// Register the `json` middleware.
    pub json: bool,
    /// Register the `cors` middleware and answer preflights.
    pub cors: Option<CorsConfig>,
    /// Limit for receiving a request body; `None` waits forever.
    pub body_timeout: Option<Duration>,
    /// Time open connections get to finish once the server stops.
    pub shutdown_timeout: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            verbose: false,
            json: false,
            cors: None,
            body_timeout: Some(Duration::from_secs(30)),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerOptions {
    /// Returns the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from a loaded configuration section.
    ///
    /// A `body_timeout_ms` of `0` disables the body timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidOptions`] if the CORS origin is not a
    /// valid header value.
    pub fn from_config(section: &ServerSection) -> Result<Self, ServerError> {
        let cors = section.cors.allow_origin().map(CorsConfig::new).transpose()?;
        let body_timeout =
            (section.body_timeout_ms > 0).then(|| Duration::from_millis(section.body_timeout_ms));

        Ok(Self {
            host: section.host.clone(),
            port: section.port,
            verbose: section.verbose,
            json: section.json,
            cors,
            body_timeout,
            shutdown_timeout: Duration::from_secs(section.shutdown_timeout_secs),
        })
    }

    /// Sets the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets verbosity.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enables or disables the `json` middleware.
    #[must_use]
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Enables CORS.
    #[must_use]
    pub fn cors(mut self, config: CorsConfig) -> Self {
        self.cors = Some(config);
        self
    }

    /// Sets the body timeout.
    #[must_use]
    pub fn body_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.body_timeout = timeout;
        self
    }

    /// Sets the shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}
