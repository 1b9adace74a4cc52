//! Test request building.
//!
//! Builder errors are deferred: a bad header or unserializable JSON body is
//! remembered and reported by [`TestRequestBuilder::build`].

use std::convert::Infallible;

use bytes::Bytes;
use futures_util::stream;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::Frame;
use serde::Serialize;

use crate::error::TestError;

/// The body a test request carries.
#[derive(Debug, Clone)]
pub enum TestBody {
    /// The whole body in one frame.
    Full(Bytes),
    /// The body split across several frames.
    Chunked(Vec<Bytes>),
    /// A body that never completes, for exercising the body timeout.
    Stalled,
}

impl Default for TestBody {
    fn default() -> Self {
        Self::Full(Bytes::new())
    }
}

impl TestBody {
    fn into_http_body(self) -> BoxBody<Bytes, Infallible> {
        match self {
            Self::Full(bytes) => Full::new(bytes).boxed(),
            Self::Chunked(chunks) => {
                let frames = chunks.into_iter().map(|chunk| Ok::<_, Infallible>(Frame::data(chunk)));
                StreamBody::new(stream::iter(frames)).boxed()
            }
            Self::Stalled => StreamBody::new(stream::pending::<Result<Frame<Bytes>, Infallible>>()).boxed(),
        }
    }
}

/// A request ready to dispatch.
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: TestBody,
}

impl TestRequest {
    /// Starts a GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Starts an OPTIONS request.
    pub fn options(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::OPTIONS, uri)
    }

    /// Converts into an `http` request with a boxed body.
    #[must_use]
    pub fn into_http_request(self) -> http::Request<BoxBody<Bytes, Infallible>> {
        let mut request = http::Request::new(self.body.into_http_body());
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }
}

/// Builder for [`TestRequest`].
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: TestBody,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: TestBody::default(),
            error: None,
        }
    }

    /// Sets a header, replacing any previous value.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let parsed = HeaderName::try_from(name)
            .ok()
            .zip(HeaderValue::try_from(value.as_ref()).ok());

        match parsed {
            Some((name, value)) => {
                self.headers.insert(name, value);
            }
            None => self.fail(TestError::InvalidHeader(name.to_string())),
        }
        self
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = TestBody::Full(body.into());
        self
    }

    /// Sends the body as several frames.
    pub fn chunked<I, C>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        self.body = TestBody::Chunked(chunks.into_iter().map(Into::into).collect());
        self
    }

    /// Uses a body that never finishes arriving.
    pub fn stalled(mut self) -> Self {
        self.body = TestBody::Stalled;
        self
    }

    /// Serializes `value` as the body and sets `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = TestBody::Full(Bytes::from(bytes));
                self.content_type("application/json")
            }
            Err(e) => {
                self.fail(TestError::Json(e));
                self
            }
        }
    }

    /// Builds the request, reporting the first builder error.
    pub fn build(self) -> Result<TestRequest, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("invalid URI {:?}: {e}", self.uri)))?;

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body,
        })
    }

    fn fail(&mut self, error: TestError) {
        self.error.get_or_insert(error);
    }
}
