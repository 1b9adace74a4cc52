//! # Heron Core
//!
//! Core types shared by the Heron crates:
//!
//! - [`RequestContext`] - Per-request derived context (method, pathname, params, query, body)
//! - [`RequestId`] - UUID v7 request identifier
//! - [`Response`] - Write-once outgoing response
//! - [`HeronError`] - Dispatch error taxonomy with status mapping
//! - [`Handler`] - Route handler trait

#![doc(html_root_url = "https://docs.rs/heron-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
mod response;

pub use context::{parse_query, RequestContext, RequestId};
pub use error::{ErrorCategory, HeronError, HeronResult};
pub use handler::{boxed, BoxFuture, BoxedHandler, Handler};
pub use response::{Response, ResponseError};
