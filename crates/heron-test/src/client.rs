//! In-memory client that drives a [`Dispatcher`] directly.

use std::sync::Arc;

use heron_server::{Dispatcher, Server};
use http::Method;
use serde::Serialize;

use crate::error::TestError;
use crate::request::{TestRequest, TestRequestBuilder};
use crate::response::TestResponse;

/// Sends requests to a server's dispatcher without binding a socket.
///
/// Requests go through the same resolution, middleware and handler steps a
/// TCP connection would.
///
/// # Example
///
/// ```
/// use heron_core::{HeronResult, RequestContext, Response};
/// use heron_server::{Server, ServerOptions};
/// use heron_test::TestClient;
///
/// async fn echo_query(ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
///     response.json(ctx.query())?;
///     Ok(response)
/// }
///
/// # tokio_test::block_on(async {
/// let mut server = Server::new("doc", ServerOptions::new());
/// server.get("/testQueryString", echo_query);
///
/// let client = TestClient::new(server);
/// let response = client.get("/testQueryString?id=1&name=test").send().await;
/// response.assert_body_eq(r#"{"id":"1","name":"test"}"#);
/// # });
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps a configured server.
    pub fn new(server: Server) -> Self {
        Self::from_dispatcher(server.into_dispatcher())
    }

    /// Wraps a dispatcher.
    pub fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Starts a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::get(uri))
    }

    /// Starts a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::post(uri))
    }

    /// Starts a PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::put(uri))
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::delete(uri))
    }

    /// Starts an OPTIONS request.
    pub fn options(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::options(uri))
    }

    /// Starts a request with any method, including ones no route can use.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequestBuilder::new(method, uri))
    }

    /// Dispatches a built request.
    pub async fn dispatch(&self, request: TestRequest) -> Result<TestResponse, TestError> {
        let response = self.dispatcher.dispatch(request.into_http_request()).await;
        TestResponse::from_http(response).await
    }
}

/// A request builder bound to a [`TestClient`].
#[derive(Debug)]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl<'a> TestClientRequest<'a> {
    fn new(client: &'a TestClient, builder: TestRequestBuilder) -> Self {
        let builder = client
            .default_headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value));
        Self { client, builder }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sends the body as several frames.
    #[must_use]
    pub fn chunked<I, C>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<bytes::Bytes>,
    {
        self.builder = self.builder.chunked(chunks);
        self
    }

    /// Uses a body that never finishes arriving.
    #[must_use]
    pub fn stalled(mut self) -> Self {
        self.builder = self.builder.stalled();
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built or the body not read; use
    /// [`try_send`](Self::try_send) to handle those.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request failed: {e}"),
        }
    }

    /// Sends the request, returning build and read errors.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        self.client.dispatch(request).await
    }
}
