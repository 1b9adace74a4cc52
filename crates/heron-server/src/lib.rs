//! # Heron Server
//!
//! HTTP/1.1 serving for the Heron router.
//!
//! - [`Server`] - route and middleware registration, then `start`/`run`
//! - [`Dispatcher`] - the per-request state machine, usable without a socket
//! - [`ServerOptions`] - host, port, built-in middleware and timeouts
//! - [`ShutdownSignal`] / [`ConnectionTracker`] - graceful shutdown
//!
//! ## Example
//!
//! ```rust,no_run
//! use heron_core::{HeronResult, RequestContext, Response};
//! use heron_middleware::stages::CorsConfig;
//! use heron_server::{Server, ServerOptions};
//!
//! async fn show(ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
//!     response.json(ctx.params())?;
//!     Ok(response)
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), heron_server::ServerError> {
//!     let options = ServerOptions::new().port(3030).cors(CorsConfig::any());
//!     let mut server = Server::new("api", options);
//!     server.get("/users/:id", show);
//!     server.run().await
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/heron-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dispatcher;
mod error;
mod options;
mod server;
mod shutdown;

pub use dispatcher::Dispatcher;
pub use error::ServerError;
pub use options::ServerOptions;
pub use server::{Server, ServerHandle};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
