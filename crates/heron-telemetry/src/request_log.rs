//! Per-request logging.
//!
//! The dispatcher owns one [`RequestLogger`] and reports every notable event
//! through it. When built quiet the logger drops everything, so a silent
//! server produces no request logs even with a subscriber installed.

use std::fmt::Display;
use std::net::SocketAddr;
use std::time::Duration;

use http::{Method, StatusCode};

/// Verbosity-gated request logger.
///
/// ```
/// use heron_telemetry::RequestLogger;
///
/// let logger = RequestLogger::new(true);
/// assert!(logger.is_verbose());
/// assert!(!RequestLogger::quiet().is_verbose());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestLogger {
    verbose: bool,
}

impl RequestLogger {
    /// Creates a logger that emits only when `verbose` is true.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// A logger that never emits.
    #[must_use]
    pub const fn quiet() -> Self {
        Self::new(false)
    }

    /// Returns true if events are emitted.
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// A request was accepted.
    pub fn request_started(&self, request_id: impl Display, method: &Method, path: &str) {
        if self.verbose {
            tracing::debug!(
                request_id = %request_id,
                http.method = %method,
                http.path = %path,
                "Request started"
            );
        }
    }

    /// A request finished with `status` after `elapsed`.
    pub fn request_completed(&self, request_id: impl Display, status: StatusCode, elapsed: Duration) {
        if self.verbose {
            tracing::info!(
                request_id = %request_id,
                http.status_code = status.as_u16(),
                duration_ms = elapsed_ms(elapsed),
                "Request done"
            );
        }
    }

    /// No route pattern matched the path.
    pub fn unknown_path(&self, request_id: impl Display, path: &str) {
        if self.verbose {
            tracing::warn!(request_id = %request_id, http.path = %path, "Unknown path");
        }
    }

    /// The path matched but the method is not registered for it.
    pub fn method_not_supported(&self, request_id: impl Display, method: &Method, path: &str) {
        if self.verbose {
            tracing::warn!(
                request_id = %request_id,
                http.method = %method,
                http.path = %path,
                "Method not supported"
            );
        }
    }

    /// The request failed with a terminal `status` before or inside the handler.
    pub fn request_failed(
        &self,
        request_id: impl Display,
        status: StatusCode,
        error: &(dyn std::error::Error + 'static),
    ) {
        if self.verbose {
            if status.is_server_error() {
                tracing::error!(
                    request_id = %request_id,
                    http.status_code = status.as_u16(),
                    error = error,
                    "Request failed"
                );
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    http.status_code = status.as_u16(),
                    error = error,
                    "Request rejected"
                );
            }
        }
    }

    /// The handler panicked.
    pub fn handler_panicked(&self, request_id: impl Display, message: &str) {
        if self.verbose {
            tracing::error!(request_id = %request_id, error = %message, "Handler panicked");
        }
    }

    /// The server started accepting connections.
    pub fn listening(&self, server: &str, addr: SocketAddr) {
        if self.verbose {
            tracing::info!(server = %server, %addr, "Server listening");
        }
    }

    /// The server stopped accepting and finished draining.
    pub fn stopped(&self, server: &str, drained: bool) {
        if self.verbose {
            if drained {
                tracing::info!(server = %server, "Server stopped");
            } else {
                tracing::warn!(server = %server, "Server stopped with connections still open");
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(elapsed: Duration) -> u64 {
    elapsed.as_millis() as u64
}
