//! Middleware configuration errors.

use thiserror::Error;

/// Errors raised while configuring middleware.
#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// A configured value cannot be sent in the named header.
    #[error("invalid value {value:?} for header {header}")]
    InvalidHeaderValue {
        /// The header the value was meant for.
        header: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl MiddlewareError {
    /// Creates an invalid header value error.
    pub fn invalid_header_value(header: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidHeaderValue {
            header,
            value: value.into(),
        }
    }
}
