//! The per-request state machine.
//!
//! ```text
//! PATH_LOOKUP ──none──▶ 404
//!     │
//! METHOD_RESOLUTION ──none──▶ 405 (+ Allow)      (skipped for OPTIONS under CORS)
//!     │
//! MIDDLEWARE ──OPTIONS under CORS──▶ 200, middleware headers only
//!     │
//! PARAM_BINDING
//!     │
//! BODY_COLLECTION ──timeout──▶ 408 / ──stream error──▶ 400
//!     │
//! BODY_PARSE (POST/PUT, non-empty) ──invalid JSON──▶ 400
//!     │
//! HANDLER_INVOCATION ──Err──▶ error status / ──panic──▶ 500
//! ```
//!
//! Every terminal state answers with an empty body. Routes are scanned
//! linearly in registration order, the first match wins.

use std::any::Any;
use std::fmt::Display;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures_util::FutureExt;
use heron_core::{BoxedHandler, HeronError, RequestContext, RequestId, Response};
use heron_middleware::MiddlewareChain;
use heron_router::{Route, RouteMethod, RouteTable};
use heron_telemetry::{record_request, InFlightGuard, RequestLogger};
use http::request::Parts;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Body;

/// Routes requests through resolution, middleware and handlers.
///
/// A dispatcher is read-only once serving starts and is shared by every
/// connection. It has no I/O of its own, so it can be driven directly by
/// tests.
pub struct Dispatcher {
    routes: RouteTable<BoxedHandler>,
    middleware: MiddlewareChain,
    logger: RequestLogger,
    body_timeout: Option<Duration>,
}

impl Dispatcher {
    /// Creates a dispatcher with no routes.
    #[must_use]
    pub fn new(middleware: MiddlewareChain, logger: RequestLogger, body_timeout: Option<Duration>) -> Self {
        Self {
            routes: RouteTable::new(),
            middleware,
            logger,
            body_timeout,
        }
    }

    /// Returns the route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable<BoxedHandler> {
        &self.routes
    }

    pub(crate) fn routes_mut(&mut self) -> &mut RouteTable<BoxedHandler> {
        &mut self.routes
    }

    /// Returns the middleware chain.
    #[must_use]
    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    pub(crate) fn middleware_mut(&mut self) -> &mut MiddlewareChain {
        &mut self.middleware
    }

    /// Returns the request logger.
    #[must_use]
    pub fn logger(&self) -> RequestLogger {
        self.logger
    }

    /// Dispatches one request and produces its response.
    ///
    /// Never fails: every outcome, including a panicking handler, becomes a
    /// status code.
    pub async fn dispatch<B>(&self, request: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: Body<Data = Bytes> + Send,
        B::Error: Display,
    {
        let started = Instant::now();
        let request_id = RequestId::new();
        let _in_flight = InFlightGuard::new();

        let (head, body) = request.into_parts();
        let method = head.method.clone();
        self.logger
            .request_started(request_id, &method, head.uri.path());

        let response = self.run(request_id, started, head, body).await;

        let elapsed = started.elapsed();
        self.logger
            .request_completed(request_id, response.status(), elapsed);
        record_request(method.as_str(), response.status().as_u16(), elapsed);

        response.into_http()
    }

    async fn run<B>(&self, request_id: RequestId, started: Instant, head: Parts, body: B) -> Response
    where
        B: Body<Data = Bytes> + Send,
        B::Error: Display,
    {
        let path = head.uri.path();

        let matches = self.routes.find_by_path(path);
        if matches.is_empty() {
            self.logger.unknown_path(request_id, path);
            return HeronError::route_not_found(path).to_response();
        }

        let preflight = head.method == Method::OPTIONS && self.middleware.has_cors();
        let route = if preflight {
            None
        } else {
            match matches.for_method(&head.method) {
                Some(route) => Some(route),
                None => {
                    self.logger
                        .method_not_supported(request_id, &head.method, path);
                    let err = HeronError::method_not_allowed(
                        head.method.as_str(),
                        path,
                        matches.allowed_methods(),
                    );
                    return err.to_response();
                }
            }
        };

        let mut response = Response::new();
        self.middleware.run(&head, &mut response);

        let Some(route) = route else {
            return response;
        };

        let ctx = RequestContext::new(route.method(), path)
            .with_request_id(request_id, started)
            .with_params(route.build_params(path))
            .with_query(head.uri.query());

        let raw = match self.collect_body(body).await {
            Ok(raw) => raw,
            Err(err) => return self.fail(request_id, &response, &err),
        };

        let parsed = match parse_body(route.method(), &raw) {
            Ok(parsed) => parsed,
            Err(err) => return self.fail(request_id, &response, &err),
        };

        let ctx = ctx.with_headers(head.headers).with_body(raw, parsed);
        self.invoke(request_id, route, ctx, response).await
    }

    async fn collect_body<B>(&self, body: B) -> Result<Bytes, HeronError>
    where
        B: Body<Data = Bytes> + Send,
        B::Error: Display,
    {
        let collect = body.collect();
        let collected = match self.body_timeout {
            Some(after) => tokio::time::timeout(after, collect)
                .await
                .map_err(|_| HeronError::BodyTimeout { after })?,
            None => collect.await,
        };

        collected
            .map(|c| c.to_bytes())
            .map_err(|e| HeronError::BodyRead {
                message: e.to_string(),
            })
    }

    async fn invoke(
        &self,
        request_id: RequestId,
        route: &Route<BoxedHandler>,
        ctx: RequestContext,
        response: Response,
    ) -> Response {
        let decorated = response.clone();
        let outcome = AssertUnwindSafe(route.handler().call(ctx, response))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => self.fail(request_id, &decorated, &err),
            Err(payload) => {
                self.logger
                    .handler_panicked(request_id, panic_message(payload.as_ref()));
                with_middleware_headers(Response::with_status(StatusCode::INTERNAL_SERVER_ERROR), &decorated)
            }
        }
    }

    fn fail(&self, request_id: RequestId, decorated: &Response, err: &HeronError) -> Response {
        self.logger
            .request_failed(request_id, err.status_code(), err);
        with_middleware_headers(err.to_response(), decorated)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.len())
            .field("middleware", &self.middleware)
            .field("logger", &self.logger)
            .field("body_timeout", &self.body_timeout)
            .finish()
    }
}

/// Parses the body as JSON for POST and PUT when it is non-empty.
fn parse_body(method: RouteMethod, raw: &Bytes) -> Result<Option<serde_json::Value>, HeronError> {
    if !method.carries_body() || raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(HeronError::malformed_body)
}

/// Keeps headers set by middleware on a response built after the handler failed.
fn with_middleware_headers(mut response: Response, decorated: &Response) -> Response {
    for (name, value) in decorated.headers() {
        response
            .headers_mut()
            .entry(name)
            .or_insert_with(|| value.clone());
    }
    response
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use heron_core::{boxed, HeronResult};
    use heron_middleware::stages::CorsConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn dispatcher(cors: bool) -> Dispatcher {
        let chain = MiddlewareChain::builder()
            .cors(cors.then(CorsConfig::any))
            .build();
        Dispatcher::new(chain, RequestLogger::quiet(), Some(Duration::from_millis(200)))
    }

    fn request(method: Method, uri: &str, body: &'static str) -> http::Request<Full<Bytes>> {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    async fn body_of(response: http::Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    async fn ok_text(_ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
        response.send("ok")?;
        Ok(response)
    }

    #[tokio::test]
    async fn test_dispatch_unknown_path() {
        let mut d = dispatcher(false);
        d.routes_mut().add(RouteMethod::Get, "/test", boxed(ok_text));

        let response = d.dispatch(request(Method::GET, "/test/unknown", "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_method_not_allowed() {
        let mut d = dispatcher(false);
        d.routes_mut()
            .add(RouteMethod::Get, "/test", boxed(ok_text))
            .add(RouteMethod::Delete, "/test", boxed(ok_text));

        let response = d.dispatch(request(Method::POST, "/test", "")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[http::header::ALLOW], "GET, DELETE");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_options_without_cors_is_405() {
        let mut d = dispatcher(false);
        d.routes_mut().add(RouteMethod::Get, "/test", boxed(ok_text));

        let response = d.dispatch(request(Method::OPTIONS, "/test", "")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_dispatch_preflight_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut d = dispatcher(true);
        d.routes_mut().add(
            RouteMethod::Get,
            "/test",
            boxed(move |_ctx: RequestContext, response: Response| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, HeronError>(response) }
            }),
        );

        let response = d.dispatch(request(Method::OPTIONS, "/test", "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(body_of(response).await.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let response = d.dispatch(request(Method::OPTIONS, "/elsewhere", "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_malformed_body_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut d = dispatcher(true);
        d.routes_mut().add(
            RouteMethod::Post,
            "/testBody",
            boxed(move |_ctx: RequestContext, response: Response| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, HeronError>(response) }
            }),
        );

        let response = d.dispatch(request(Method::POST, "/testBody", "{[]")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(body_of(response).await.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_get_body_is_not_parsed() {
        let mut d = dispatcher(false);
        d.routes_mut().add(
            RouteMethod::Get,
            "/raw",
            boxed(|ctx: RequestContext, mut response: Response| async move {
                assert!(ctx.body().is_none());
                response.send(ctx.raw_body().clone())?;
                Ok::<_, HeronError>(response)
            }),
        );

        let response = d.dispatch(request(Method::GET, "/raw", "{[]")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, "{[]");
    }

    #[tokio::test]
    async fn test_dispatch_binds_params_query_and_body() {
        let mut d = dispatcher(false);
        d.routes_mut().add(
            RouteMethod::Put,
            "/items/:id",
            boxed(|ctx: RequestContext, mut response: Response| async move {
                let echo = serde_json::json!({
                    "method": ctx.method().as_str(),
                    "pathname": ctx.pathname(),
                    "params": ctx.params(),
                    "query": ctx.query(),
                    "body": ctx.body(),
                });
                response.json(&echo)?;
                Ok::<_, HeronError>(response)
            }),
        );

        let response = d
            .dispatch(request(Method::PUT, "/items/7?tag=a&tag=b", r#"{"n":1}"#))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "method": "PUT",
                "pathname": "/items/7",
                "params": {"id": "7"},
                "query": {"tag": "b"},
                "body": {"n": 1},
            })
        );
    }

    #[tokio::test]
    async fn test_dispatch_first_registered_wins() {
        let mut d = dispatcher(false);
        d.routes_mut()
            .add(
                RouteMethod::Get,
                "/users/:id",
                boxed(|_ctx: RequestContext, mut response: Response| async move {
                    response.send("param")?;
                    Ok::<_, HeronError>(response)
                }),
            )
            .add(
                RouteMethod::Get,
                "/users/me",
                boxed(|_ctx: RequestContext, mut response: Response| async move {
                    response.send("static")?;
                    Ok::<_, HeronError>(response)
                }),
            );

        let response = d.dispatch(request(Method::GET, "/users/me", "")).await;
        assert_eq!(body_of(response).await, "param");
    }

    #[tokio::test]
    async fn test_dispatch_handler_error_keeps_cors_headers() {
        let mut d = dispatcher(true);
        d.routes_mut().add(
            RouteMethod::Get,
            "/fail",
            boxed(|_ctx: RequestContext, mut response: Response| async move {
                response.write("partial")?;
                Err::<Response, _>(HeronError::handler("nope"))
            }),
        );

        let response = d.dispatch(request(Method::GET, "/fail", "")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_handler_panic_is_500() {
        let mut d = dispatcher(false);
        d.routes_mut().add(
            RouteMethod::Get,
            "/panic",
            boxed(|_ctx: RequestContext, response: Response| async move {
                if response.status() == StatusCode::OK {
                    panic!("handler blew up");
                }
                Ok::<_, HeronError>(response)
            }),
        );

        let response = d.dispatch(request(Method::GET, "/panic", "")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_dispatch_unfinalized_response_is_sent() {
        let mut d = dispatcher(false);
        d.routes_mut().add(
            RouteMethod::Post,
            "/draft",
            boxed(|_ctx: RequestContext, mut response: Response| async move {
                response.set_status(StatusCode::ACCEPTED)?;
                response.write("queued")?;
                Ok::<_, HeronError>(response)
            }),
        );

        let response = d.dispatch(request(Method::POST, "/draft", "")).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(body_of(response).await, "queued");
    }

    #[tokio::test]
    async fn test_dispatch_body_timeout() {
        use http_body_util::StreamBody;
        use hyper::body::Frame;

        let mut d = dispatcher(false);
        d.routes_mut().add(RouteMethod::Post, "/slow", boxed(ok_text));

        let never = futures_util::stream::pending::<Result<Frame<Bytes>, std::convert::Infallible>>();
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/slow")
            .body(StreamBody::new(never))
            .unwrap();

        let response = d.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_parse_body_rules() {
        let json = Bytes::from_static(br#"{"a":1}"#);
        assert!(parse_body(RouteMethod::Post, &json).unwrap().is_some());
        assert!(parse_body(RouteMethod::Put, &json).unwrap().is_some());
        assert!(parse_body(RouteMethod::Delete, &json).unwrap().is_none());
        assert!(parse_body(RouteMethod::Post, &Bytes::new()).unwrap().is_none());
        assert!(parse_body(RouteMethod::Post, &Bytes::from_static(b"{[]")).is_err());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
