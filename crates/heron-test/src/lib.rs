//! # Heron Test
//!
//! In-memory request testing for Heron servers. A [`TestClient`] feeds
//! requests straight into the server's dispatcher, so tests need no socket
//! and no port.
//!
//! ## Example
//!
//! ```
//! use heron_core::{HeronResult, RequestContext, Response};
//! use heron_server::{Server, ServerOptions};
//! use heron_test::TestClient;
//! use http::StatusCode;
//!
//! async fn show(ctx: RequestContext, mut response: Response) -> HeronResult<Response> {
//!     response.json(ctx.params())?;
//!     Ok(response)
//! }
//!
//! # tokio_test::block_on(async {
//! let mut server = Server::new("doc", ServerOptions::new());
//! server.get("/users/:id", show);
//! let client = TestClient::new(server);
//!
//! client
//!     .get("/users/42")
//!     .send()
//!     .await
//!     .assert_status(StatusCode::OK)
//!     .assert_json_eq(&serde_json::json!({"id": "42"}));
//!
//! client.get("/users").send().await.assert_status(StatusCode::NOT_FOUND);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/heron-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestBody, TestRequest, TestRequestBuilder};
pub use response::TestResponse;
