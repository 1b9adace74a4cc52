//! The ordered middleware chain.
//!
//! Entries are keyed by name and run in insertion order. The built-in
//! entries come first, `json` then `cors`, followed by any custom middleware
//! in the order it was added. Re-inserting an existing name swaps the
//! middleware but keeps its original position.

use std::fmt;
use std::sync::Arc;

use heron_core::Response;
use indexmap::IndexMap;

use crate::stages::{self, CorsConfig, CorsMiddleware, JsonMiddleware};
use crate::{Middleware, RequestHead};

/// A type-erased middleware as stored in the chain.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Named middleware in execution order.
///
/// # Example
///
/// ```
/// use heron_middleware::stages::CorsConfig;
/// use heron_middleware::MiddlewareChain;
///
/// let chain = MiddlewareChain::builder()
///     .json(true)
///     .cors(Some(CorsConfig::any()))
///     .build();
///
/// assert_eq!(chain.names().collect::<Vec<_>>(), vec!["json", "cors"]);
/// assert!(chain.has_cors());
/// ```
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    entries: IndexMap<String, BoxedMiddleware>,
}

impl MiddlewareChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for the built-in entries.
    #[must_use]
    pub fn builder() -> MiddlewareChainBuilder {
        MiddlewareChainBuilder::default()
    }

    /// Adds `middleware` under its own [`name`](Middleware::name).
    pub fn insert<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        let name = middleware.name().to_string();
        self.insert_named(name, middleware)
    }

    /// Adds `middleware` under `name`.
    pub fn insert_named<M: Middleware>(&mut self, name: impl Into<String>, middleware: M) -> &mut Self {
        self.entries.insert(name.into(), Arc::new(middleware));
        self
    }

    /// Returns true if an entry is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns true if the CORS middleware is registered.
    #[must_use]
    pub fn has_cors(&self) -> bool {
        self.contains(stages::CORS)
    }

    /// Returns the entry names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every entry, in order, against the request and response.
    pub fn run(&self, request: &RequestHead, response: &mut Response) {
        for middleware in self.entries.values() {
            middleware.process(request, response);
        }
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Builds a [`MiddlewareChain`] from the construction flags.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareChainBuilder {
    json: bool,
    cors: Option<CorsConfig>,
}

impl MiddlewareChainBuilder {
    /// Registers the `json` marker.
    #[must_use]
    pub fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Registers `cors` with the given configuration, or nothing for `None`.
    #[must_use]
    pub fn cors(mut self, config: Option<CorsConfig>) -> Self {
        self.cors = config;
        self
    }

    /// Builds the chain.
    #[must_use]
    pub fn build(self) -> MiddlewareChain {
        let mut chain = MiddlewareChain::new();
        if self.json {
            chain.insert(JsonMiddleware);
        }
        if let Some(config) = self.cors {
            chain.insert(CorsMiddleware::new(config));
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnMiddleware;
    use http::HeaderValue;
    use std::sync::Mutex;

    fn head() -> RequestHead {
        http::Request::builder().uri("/x").body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_chain_empty_by_default() {
        let chain = MiddlewareChain::builder().build();
        assert!(chain.is_empty());
        assert!(!chain.has_cors());
        assert!(!chain.contains("json"));
    }

    #[test]
    fn test_chain_builtin_order() {
        let chain = MiddlewareChain::builder()
            .cors(Some(CorsConfig::any()))
            .json(true)
            .build();
        assert_eq!(chain.names().collect::<Vec<_>>(), vec!["json", "cors"]);
        assert_eq!(chain.len(), 2);
        assert_eq!(format!("{chain:?}"), r#"["json", "cors"]"#);
    }

    #[test]
    fn test_chain_runs_in_insertion_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        for name in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            chain.insert(FnMiddleware::new(name, move |_: &RequestHead, _: &mut Response| {
                seen.lock().unwrap().push(name);
            }));
        }

        chain.run(&head(), &mut Response::new());
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_chain_later_entry_overwrites_header() {
        let mut chain = MiddlewareChain::builder().cors(Some(CorsConfig::any())).build();
        chain.insert(FnMiddleware::new("origin", |_: &RequestHead, response: &mut Response| {
            response.headers_mut().insert(
                "access-control-allow-origin",
                HeaderValue::from_static("https://late.test"),
            );
        }));

        let mut response = Response::new();
        chain.run(&head(), &mut response);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://late.test"
        );
    }

    #[test]
    fn test_chain_reinsert_keeps_position() {
        let mut chain = MiddlewareChain::builder().json(true).cors(Some(CorsConfig::any())).build();
        chain.insert_named("json", JsonMiddleware);
        assert_eq!(chain.names().collect::<Vec<_>>(), vec!["json", "cors"]);
    }
}
