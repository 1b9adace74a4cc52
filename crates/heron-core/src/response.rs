//! The outgoing response a dispatch builds.
//!
//! A [`Response`] starts at status 200 with no headers and an empty body.
//! Middleware adds headers, then the handler sets the status, writes the body
//! and finalizes it. Once finalized the status and body are frozen.

use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use thiserror::Error;

/// Misuse of a [`Response`].
#[derive(Debug, Error)]
pub enum ResponseError {
    /// A write, status change or second `end` after finalization.
    #[error("response already finalized")]
    AlreadyFinalized,

    /// Header name or value rejected by the HTTP grammar.
    #[error("invalid header: {name}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// The JSON body could not be serialized.
    #[error("failed to serialize JSON body: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A mutable, write-once HTTP response.
///
/// # Example
///
/// ```
/// use heron_core::Response;
/// use http::StatusCode;
///
/// let mut response = Response::new();
/// response.set_status(StatusCode::CREATED)?;
/// response.json(&serde_json::json!({ "ok": true }))?;
///
/// assert!(response.is_finalized());
/// assert!(response.write("more").is_err());
/// assert_eq!(response.body(), br#"{"ok":true}"#);
/// # Ok::<(), heron_core::ResponseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    finalized: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Creates an empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// Creates an empty response with `status`.
    #[must_use]
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            finalized: false,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Changes the status code.
    pub fn set_status(&mut self, status: StatusCode) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.status = status;
        Ok(self)
    }

    /// Returns the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the headers for direct mutation.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Sets a header from strings, replacing any previous value.
    pub fn set_header(
        &mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        let invalid = || ResponseError::InvalidHeader {
            name: name.as_ref().to_string(),
        };
        let header_name = HeaderName::from_bytes(name.as_ref().as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value.as_ref()).map_err(|_| invalid())?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Appends a chunk to the body.
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) -> Result<&mut Self, ResponseError> {
        self.ensure_open()?;
        self.body.extend_from_slice(chunk.as_ref());
        Ok(self)
    }

    /// Finalizes the response. Nothing can be written afterwards.
    pub fn end(&mut self) -> Result<(), ResponseError> {
        self.ensure_open()?;
        self.finalized = true;
        Ok(())
    }

    /// Writes `body` and finalizes.
    pub fn send(&mut self, body: impl AsRef<[u8]>) -> Result<(), ResponseError> {
        self.write(body)?;
        self.end()
    }

    /// Serializes `value` as the body, sets `Content-Type: application/json`
    /// and finalizes.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ResponseError> {
        self.ensure_open()?;
        let encoded = serde_json::to_vec(value)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.send(encoded)
    }

    /// Returns true once [`end`](Self::end) has been called.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into an `http` response ready for the wire.
    #[must_use]
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    fn ensure_open(&self) -> Result<(), ResponseError> {
        if self.finalized {
            Err(ResponseError::AlreadyFinalized)
        } else {
            Ok(())
        }
    }
}
