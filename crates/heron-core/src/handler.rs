//! Route handlers.
//!
//! A handler receives the [`RequestContext`] and the [`Response`] that
//! middleware has already decorated, writes into the response and hands it
//! back. Any `async fn(RequestContext, Response) -> HeronResult<Response>` is
//! a handler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{HeronResult, RequestContext, Response};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Request handler.
///
/// # Example
///
/// ```
/// use heron_core::{Handler, HeronResult, RequestContext, Response};
///
/// async fn echo_params(ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
///     response.json(ctx.params())?;
///     Ok(response)
/// }
///
/// fn assert_handler<H: Handler>(_: H) {}
/// assert_handler(echo_params);
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn call(&self, ctx: RequestContext, response: Response) -> BoxFuture<'static, HeronResult<Response>>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HeronResult<Response>> + Send + 'static,
{
    fn call(&self, ctx: RequestContext, response: Response) -> BoxFuture<'static, HeronResult<Response>> {
        Box::pin((self)(ctx, response))
    }
}

/// Type-erased, shareable handler as stored in the route table.
pub type BoxedHandler = Arc<dyn Handler>;

/// Erases a handler.
pub fn boxed<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}
