//! Test response wrapper.

use std::fmt;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Body;
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A fully collected response with assertion helpers.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Collects an `http` response.
    pub async fn from_http<B>(response: http::Response<B>) -> Result<Self, TestError>
    where
        B: Body,
        B::Error: fmt::Display,
    {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self::new(parts.status, parts.headers, body))
    }

    /// Creates a response from parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as UTF-8 text.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec()).map_err(|e| TestError::BodyRead(format!("invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(self.status, expected, "unexpected status; body: {:?}", self.body);
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    #[track_caller]
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("header '{name}' not found in {:?}", self.headers));
        assert_eq!(actual, expected.as_ref(), "header '{name}'");
        self
    }

    /// Asserts a header is absent.
    ///
    /// # Panics
    ///
    /// Panics if the header is present.
    #[track_caller]
    pub fn assert_no_header(&self, name: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        assert!(self.header(name).is_none(), "unexpected header '{name}'");
        self
    }

    /// Asserts the body is empty.
    ///
    /// # Panics
    ///
    /// Panics if any body bytes were sent.
    #[track_caller]
    pub fn assert_empty_body(&self) -> &Self {
        assert!(self.body.is_empty(), "expected empty body, got {:?}", self.body);
        self
    }

    /// Asserts the body text exactly.
    ///
    /// # Panics
    ///
    /// Panics if the body differs or is not UTF-8.
    #[track_caller]
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        assert_eq!(self.body, expected.as_ref().as_bytes(), "body mismatch");
        self
    }

    /// Asserts the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or differs.
    #[track_caller]
    pub fn assert_json_eq(&self, expected: &serde_json::Value) -> &Self {
        let actual: serde_json::Value = match self.json() {
            Ok(value) => value,
            Err(e) => panic!("body is not JSON ({e}): {:?}", self.body),
        };
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;
    use http_body_util::Full;
    use serde_json::json;

    fn json_response(status: StatusCode, body: &'static str) -> TestResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        TestResponse::new(status, headers, Bytes::from_static(body.as_bytes()))
    }

    #[tokio::test]
    async fn test_from_http_collects_body() {
        let response = http::Response::builder()
            .status(StatusCode::CREATED)
            .header("x-id", "7")
            .body(Full::new(Bytes::from_static(b"made")))
            .unwrap();

        let response = TestResponse::from_http(response).await.unwrap();
        response
            .assert_status(StatusCode::CREATED)
            .assert_header("x-id", "7")
            .assert_body_eq("made");
        assert_eq!(response.status_code(), 201);
    }

    #[test]
    fn test_json_accessors() {
        let response = json_response(StatusCode::OK, r#"{"id":"1","name":"test"}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["name"], "test");
        response.assert_json_eq(&json!({"id": "1", "name": "test"}));
    }

    #[test]
    fn test_empty_body_and_missing_header() {
        let response = TestResponse::new(StatusCode::NOT_FOUND, HeaderMap::new(), Bytes::new());
        response.assert_empty_body().assert_no_header("allow");
        assert_eq!(response.text().unwrap(), "");
        assert!(response.json::<serde_json::Value>().is_err());
    }

    #[test]
    #[should_panic(expected = "unexpected status")]
    fn test_assert_status_panics() {
        json_response(StatusCode::OK, "{}").assert_status(StatusCode::CREATED);
    }
}
