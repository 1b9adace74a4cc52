//! # Heron
//!
//! **A minimal HTTP request router.**
//!
//! - Routes registered per method (`GET`, `POST`, `PUT`, `DELETE`) with
//!   `:name` path parameters
//! - Query strings and JSON bodies decoded onto a per-request context
//! - Optional `json` and `cors` middleware, plus custom middleware
//! - 404 / 405 / 400 / 408 / 500 answered by the router itself
//! - Layered configuration, structured logging and Prometheus metrics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use heron::prelude::*;
//!
//! async fn show_params(ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
//!     response.json(ctx.params())?;
//!     Ok(response)
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let options = ServerOptions::new().port(3030).cors(CorsConfig::any());
//!     let mut server = Server::new("quick-start", options);
//!     server.get("/testParams/:id/:name", show_params);
//!     server.run().await
//! }
//! ```
//!
//! ## Request flow
//!
//! ```text
//! path lookup ─▶ method ─▶ middleware ─▶ params/query ─▶ body ─▶ handler
//!     404          405     (OPTIONS+CORS                   400/408   500
//!                           stops here)
//! ```

#![doc(html_root_url = "https://docs.rs/heron/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use heron_core as core;

// Re-export server types
pub use heron_server as server;

// Re-export middleware types
pub use heron_middleware as middleware;

// Re-export router types
pub use heron_router as router;

// Re-export configuration types
pub use heron_config as config;

// Re-export telemetry types
pub use heron_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```
/// use heron::prelude::*;
///
/// let server = Server::new("app", ServerOptions::new().json(true));
/// assert!(server.dispatcher().middleware().contains("json"));
/// ```
pub mod prelude {
    pub use heron_core::{Handler, HeronError, HeronResult, RequestContext, RequestId, Response};

    pub use heron_middleware::stages::CorsConfig;
    pub use heron_middleware::{FnMiddleware, Middleware, RequestHead};

    pub use heron_router::{Params, RouteMethod};

    pub use heron_server::{Server, ServerError, ServerHandle, ServerOptions, ShutdownSignal};

    pub use heron_config::{ConfigLoader, HeronConfig};

    pub use heron_telemetry::{init_telemetry, TelemetryConfig};
}
