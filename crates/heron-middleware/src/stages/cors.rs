//! CORS (Cross-Origin Resource Sharing) middleware.
//!
//! Adds the three CORS response headers to every response that reaches the
//! middleware stage, whatever the request method:
//!
//! - `Access-Control-Allow-Origin`: the configured origin (default `*`)
//! - `Access-Control-Allow-Methods`: `GET, POST, PUT, DELETE`
//! - `Access-Control-Allow-Headers`: `*`
//!
//! Preflight handling (answering `OPTIONS` without a handler) is the
//! dispatcher's job; it checks for this middleware by [`CORS`](super::CORS).
//!
//! ## Example
//!
//! ```
//! use heron_middleware::stages::{CorsConfig, CorsMiddleware};
//!
//! let cors = CorsMiddleware::new(CorsConfig::new("https://app.example.com")?);
//! assert_eq!(cors.config().allow_origin(), "https://app.example.com");
//! # Ok::<(), heron_middleware::MiddlewareError>(())
//! ```

use heron_core::Response;
use http::HeaderValue;

use crate::{Middleware, MiddlewareError, RequestHead};

/// CORS header names.
pub mod headers {
    /// `Access-Control-Allow-Origin` header.
    pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
    /// `Access-Control-Allow-Methods` header.
    pub const ALLOW_METHODS: &str = "access-control-allow-methods";
    /// `Access-Control-Allow-Headers` header.
    pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
}

/// Origin allowed when none is configured.
pub const ANY_ORIGIN: &str = "*";

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";
const ALLOWED_HEADERS: &str = "*";

/// Configuration for [`CorsMiddleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    allow_origin: HeaderValue,
}

impl CorsConfig {
    /// Allows a single origin.
    ///
    /// # Errors
    ///
    /// Returns [`MiddlewareError::InvalidHeaderValue`] if `origin` cannot be
    /// sent as a header value.
    pub fn new(origin: impl AsRef<str>) -> Result<Self, MiddlewareError> {
        let origin = origin.as_ref();
        let allow_origin = HeaderValue::from_str(origin).map_err(|_| {
            MiddlewareError::invalid_header_value(headers::ALLOW_ORIGIN, origin)
        })?;
        Ok(Self { allow_origin })
    }

    /// Allows every origin (`*`).
    #[must_use]
    pub fn any() -> Self {
        Self {
            allow_origin: HeaderValue::from_static(ANY_ORIGIN),
        }
    }

    /// Returns the configured origin.
    #[must_use]
    pub fn allow_origin(&self) -> &str {
        // `new` only accepts visible ASCII, so this never falls back.
        self.allow_origin.to_str().unwrap_or(ANY_ORIGIN)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::any()
    }
}

/// Sets the CORS headers on every response.
#[derive(Debug, Clone, Default)]
pub struct CorsMiddleware {
    config: CorsConfig,
}

impl CorsMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub fn new(config: CorsConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CorsConfig {
        &self.config
    }
}

impl Middleware for CorsMiddleware {
    fn name(&self) -> &'static str {
        super::CORS
    }

    fn process(&self, _request: &RequestHead, response: &mut Response) {
        let map = response.headers_mut();
        map.insert(headers::ALLOW_ORIGIN, self.config.allow_origin.clone());
        map.insert(headers::ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
        map.insert(headers::ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
    }
}
