//! Error types for Heron.
//!
//! [`HeronError`] covers every way a dispatch can end without the handler
//! producing the response itself. Each variant maps to exactly one status
//! code; terminal responses built from it carry an empty body.
//!
//! | Variant | Category | Status |
//! |---|---|---|
//! | `RouteNotFound` | `NotFound` | 404 |
//! | `MethodNotAllowed` | `MethodNotAllowed` | 405 |
//! | `MalformedBody` | `BadRequest` | 400 |
//! | `BodyRead` | `BadRequest` | 400 |
//! | `BodyTimeout` | `Timeout` | 408 |
//! | `Handler` | `Internal` | 500 |
//! | `Response` | `Internal` | 500 |

use std::time::Duration;

use heron_router::RouteMethod;
use http::header::{HeaderValue, ALLOW};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::response::{Response, ResponseError};

/// Result type alias using [`HeronError`].
pub type HeronResult<T> = Result<T, HeronError>;

/// Coarse classification of [`HeronError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No route for the path.
    NotFound,
    /// Route exists for the path, not for the method.
    MethodNotAllowed,
    /// The request itself is unusable.
    BadRequest,
    /// The client did not finish sending in time.
    Timeout,
    /// Handler or framework failure.
    Internal,
}

impl ErrorCategory {
    /// Returns the HTTP status code for this category.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the snake_case name used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::BadRequest => "bad_request",
            Self::Timeout => "timeout",
            Self::Internal => "internal",
        }
    }
}

/// Standard error type for Heron.
///
/// Handlers return it through [`HeronResult`]; the dispatcher produces the
/// routing and body variants itself.
///
/// # Example
///
/// ```
/// use heron_core::{HeronError, HeronResult};
///
/// fn load(id: &str) -> HeronResult<u32> {
///     id.parse()
///         .map_err(|e| HeronError::handler_with_source(format!("bad id {id}"), e))
/// }
///
/// let err = load("x").unwrap_err();
/// assert_eq!(err.status_code(), 500);
/// ```
#[derive(Error, Debug)]
pub enum HeronError {
    /// No registered pattern matches the path.
    #[error("Route not found: {path}")]
    RouteNotFound {
        /// The request pathname.
        path: String,
    },

    /// The path matches, the method does not.
    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed {
        /// The request method.
        method: String,
        /// The request pathname.
        path: String,
        /// Methods registered for the path.
        allowed: Vec<RouteMethod>,
    },

    /// POST/PUT body is not valid JSON.
    #[error("Malformed JSON body: {source}")]
    MalformedBody {
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The body stream failed before completion.
    #[error("Failed to read request body: {message}")]
    BodyRead {
        /// Description of the transport failure.
        message: String,
    },

    /// The body stream did not complete in time.
    #[error("Request body not received within {after:?}")]
    BodyTimeout {
        /// The configured limit.
        after: Duration,
    },

    /// The handler reported failure or panicked.
    #[error("Handler failed: {message}")]
    Handler {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The handler misused the response object.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl HeronError {
    /// Creates a route-not-found error.
    #[must_use]
    pub fn route_not_found(path: impl Into<String>) -> Self {
        Self::RouteNotFound { path: path.into() }
    }

    /// Creates a method-not-allowed error.
    #[must_use]
    pub fn method_not_allowed(
        method: impl Into<String>,
        path: impl Into<String>,
        allowed: Vec<RouteMethod>,
    ) -> Self {
        Self::MethodNotAllowed {
            method: method.into(),
            path: path.into(),
            allowed,
        }
    }

    /// Creates a malformed-body error.
    #[must_use]
    pub fn malformed_body(source: serde_json::Error) -> Self {
        Self::MalformedBody { source }
    }

    /// Creates a handler failure.
    #[must_use]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a handler failure with a source error.
    pub fn handler_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Handler {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::RouteNotFound { .. } => ErrorCategory::NotFound,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::MalformedBody { .. } | Self::BodyRead { .. } => ErrorCategory::BadRequest,
            Self::BodyTimeout { .. } => ErrorCategory::Timeout,
            Self::Handler { .. } | Self::Response(_) => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().status_code()
    }

    /// Builds the terminal response for this error.
    ///
    /// The body is empty. A 405 carries an `Allow` header listing the
    /// methods registered for the path.
    #[must_use]
    pub fn to_response(&self) -> Response {
        let mut response = Response::with_status(self.status_code());
        if let Self::MethodNotAllowed { allowed, .. } = self {
            let list = allowed
                .iter()
                .map(|method| method.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&list) {
                response.headers_mut().insert(ALLOW, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{[]").unwrap_err()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(HeronError::route_not_found("/x").status_code(), 404);
        assert_eq!(
            HeronError::method_not_allowed("POST", "/x", vec![RouteMethod::Get]).status_code(),
            405
        );
        assert_eq!(HeronError::malformed_body(json_error()).status_code(), 400);
        assert_eq!(
            HeronError::BodyRead { message: "reset".into() }.status_code(),
            400
        );
        assert_eq!(
            HeronError::BodyTimeout { after: Duration::from_secs(1) }.status_code(),
            408
        );
        assert_eq!(HeronError::handler("boom").status_code(), 500);
        assert_eq!(
            HeronError::from(ResponseError::AlreadyFinalized).status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = HeronError::route_not_found("/test/unknown");
        assert_eq!(err.to_string(), "Route not found: /test/unknown");

        let err = HeronError::method_not_allowed("POST", "/test", vec![RouteMethod::Get]);
        assert_eq!(err.to_string(), "Method POST not allowed for /test");
    }

    #[test]
    fn test_handler_with_source_chains() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = HeronError::handler_with_source("save failed", io);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("disk gone"));
    }

    #[test]
    fn test_to_response() {
        let response = HeronError::route_not_found("/x").to_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.body().is_empty());
        assert!(response.headers().is_empty());

        let response = HeronError::method_not_allowed(
            "PATCH",
            "/x",
            vec![RouteMethod::Get, RouteMethod::Delete],
        )
        .to_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, DELETE");
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ErrorCategory::MethodNotAllowed.as_str(), "method_not_allowed");
        assert_eq!(HeronError::malformed_body(json_error()).category(), ErrorCategory::BadRequest);
    }
}
