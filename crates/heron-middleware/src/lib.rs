//! # Heron Middleware
//!
//! The middleware chain applied to every request between route resolution
//! and parameter binding.
//!
//! ```text
//! PATH_LOOKUP → METHOD_RESOLUTION → [ json → cors → custom… ] → PARAM_BINDING → …
//! ```
//!
//! Each entry receives the request head and the shared response. Entries
//! cannot abort the chain; they only decorate the response.
//!
//! ## Example
//!
//! ```
//! use heron_core::Response;
//! use heron_middleware::stages::CorsConfig;
//! use heron_middleware::MiddlewareChain;
//!
//! let chain = MiddlewareChain::builder().cors(Some(CorsConfig::any())).build();
//!
//! let head = http::Request::new(()).into_parts().0;
//! let mut response = Response::new();
//! chain.run(&head, &mut response);
//!
//! assert_eq!(response.headers()["access-control-allow-origin"], "*");
//! ```

#![doc(html_root_url = "https://docs.rs/heron-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
mod error;
pub mod middleware;
pub mod stages;

pub use chain::{BoxedMiddleware, MiddlewareChain, MiddlewareChainBuilder};
pub use error::MiddlewareError;
pub use middleware::{FnMiddleware, Middleware};

/// The request line and headers, as seen by middleware.
pub type RequestHead = http::request::Parts;
