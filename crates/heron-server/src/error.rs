//! Server error types.

use std::io;

use heron_middleware::MiddlewareError;
use thiserror::Error;

/// Errors from building, starting or stopping a server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind {host}:{port}: {source}")]
    Bind {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The options cannot produce a working server.
    #[error("invalid server options: {0}")]
    InvalidOptions(#[from] MiddlewareError),

    /// The serving task ended abnormally.
    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_display() {
        let err = ServerError::Bind {
            host: "127.0.0.1".to_string(),
            port: 80,
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to bind 127.0.0.1:80: denied");
    }
}
