//! The middleware capability.
//!
//! A middleware is a unit of behavior that sees the request head and mutates
//! the shared [`Response`] before the handler runs. It returns nothing and
//! cannot stop the chain: every registered middleware runs for every request
//! that reaches the middleware stage. Configuration is captured at
//! construction, either in a struct implementing [`Middleware`] or in the
//! closure wrapped by [`FnMiddleware`].
//!
//! # Example
//!
//! ```
//! use heron_core::Response;
//! use heron_middleware::{Middleware, RequestHead};
//!
//! struct PoweredBy(&'static str);
//!
//! impl Middleware for PoweredBy {
//!     fn name(&self) -> &'static str {
//!         "powered-by"
//!     }
//!
//!     fn process(&self, _request: &RequestHead, response: &mut Response) {
//!         response
//!             .headers_mut()
//!             .insert("x-powered-by", http::HeaderValue::from_static(self.0));
//!     }
//! }
//! ```

use heron_core::Response;

use crate::RequestHead;

/// A request/response interceptor run before the handler.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name this middleware registers under by default.
    fn name(&self) -> &'static str;

    /// Applies the middleware.
    fn process(&self, request: &RequestHead, response: &mut Response);
}

/// A middleware backed by a closure.
///
/// ```
/// use heron_core::Response;
/// use heron_middleware::{FnMiddleware, RequestHead};
///
/// let tag = FnMiddleware::new("tag", |_: &RequestHead, response: &mut Response| {
///     response
///         .headers_mut()
///         .insert("x-tag", http::HeaderValue::from_static("1"));
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&RequestHead, &mut Response) + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process(&self, request: &RequestHead, response: &mut Response) {
        (self.func)(request, response);
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware").field("name", &self.name).finish()
    }
}
