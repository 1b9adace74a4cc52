//! Per-request context handed to handlers.
//!
//! A [`RequestContext`] is created fresh by the dispatcher for every request
//! that reaches a handler and is moved into that handler. Nothing in it is
//! shared with, or outlives, the request.

use std::time::{Duration, Instant};

use bytes::Bytes;
use heron_router::{Params, RouteMethod};
use http::HeaderMap;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::HeronError;

/// A unique, time-ordered identifier for each request (UUID v7).
///
/// # Example
///
/// ```
/// use heron_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Decodes a raw query string into ordered `(key, value)` pairs.
///
/// Keys and values are form-url-decoded. A malformed string yields no pairs.
#[must_use]
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
        .unwrap_or_default()
}

/// The enriched request a handler receives.
///
/// - `method` and `pathname` come from the request line.
/// - `params` are bound from the matched route's pattern.
/// - `query` maps each key to its last value; [`query_all`](Self::query_all)
///   returns every value of a repeated key.
/// - `body` is the parsed JSON for POST/PUT requests with a non-empty body.
///
/// # Example
///
/// ```
/// use heron_core::RequestContext;
/// use heron_router::{Params, RouteMethod};
///
/// let ctx = RequestContext::new(RouteMethod::Get, "/testQueryString")
///     .with_query(Some("id=1&name=test&id=2"))
///     .with_params(Params::new());
///
/// assert_eq!(ctx.query_param("id"), Some("2"));
/// assert_eq!(ctx.query_all("id"), vec!["1", "2"]);
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: RouteMethod,
    pathname: String,
    headers: HeaderMap,
    params: Params,
    query: IndexMap<String, String>,
    query_pairs: Vec<(String, String)>,
    raw_body: Bytes,
    body: Option<serde_json::Value>,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context with a fresh request ID and nothing bound yet.
    #[must_use]
    pub fn new(method: RouteMethod, pathname: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            pathname: pathname.into(),
            headers: HeaderMap::new(),
            params: Params::new(),
            query: IndexMap::new(),
            query_pairs: Vec::new(),
            raw_body: Bytes::new(),
            body: None,
            started_at: Instant::now(),
        }
    }

    /// Uses an existing request ID and start instant.
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId, started_at: Instant) -> Self {
        self.request_id = request_id;
        self.started_at = started_at;
        self
    }

    /// Attaches the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Binds path parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Binds the query from the raw query string (no leading `?`).
    #[must_use]
    pub fn with_query(mut self, raw: Option<&str>) -> Self {
        let pairs = parse_query(raw);
        self.query = pairs.iter().cloned().collect();
        self.query_pairs = pairs;
        self
    }

    /// Attaches the collected body and, when one was parsed, its JSON value.
    #[must_use]
    pub fn with_body(mut self, raw: Bytes, parsed: Option<serde_json::Value>) -> Self {
        self.raw_body = raw;
        self.body = parsed;
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the method of the matched route.
    #[must_use]
    pub const fn method(&self) -> RouteMethod {
        self.method
    }

    /// Returns the request path, without query string.
    #[must_use]
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the path parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns one path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns the query map, one value per key, first-seen key order.
    #[must_use]
    pub const fn query(&self) -> &IndexMap<String, String> {
        &self.query
    }

    /// Returns the last value of a query key.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns every value of a query key, in request order.
    #[must_use]
    pub fn query_all(&self, key: &str) -> Vec<&str> {
        self.query_pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns the parsed JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Deserializes the parsed body into `T`.
    ///
    /// Returns `Ok(None)` when no body was parsed. A shape mismatch is a
    /// [`HeronError::MalformedBody`], so it surfaces as 400.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<Option<T>, HeronError> {
        self.body
            .as_ref()
            .map(|value| T::deserialize(value).map_err(HeronError::malformed_body))
            .transpose()
    }

    /// Returns the body bytes exactly as received.
    #[must_use]
    pub const fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// Returns the time since the dispatcher accepted the request.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
