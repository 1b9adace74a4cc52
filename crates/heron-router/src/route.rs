//! A registered route.

use crate::{Params, PathPattern, RouteMethod};

/// An immutable `(method, pattern, handler)` triple.
///
/// The handler type is left generic so the table can hold whatever the
/// server erases its handlers into.
#[derive(Debug, Clone)]
pub struct Route<H> {
    method: RouteMethod,
    pattern: PathPattern,
    handler: H,
}

impl<H> Route<H> {
    /// Creates a route, compiling `path` into a [`PathPattern`].
    pub fn new(method: RouteMethod, path: &str, handler: H) -> Self {
        Self {
            method,
            pattern: PathPattern::new(path),
            handler,
        }
    }

    /// Returns the route's method.
    #[must_use]
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Path-only match, ignoring the method.
    #[must_use]
    pub fn matches_path(&self, path: &str) -> bool {
        self.pattern.matches(path)
    }

    /// Binds the pattern's parameters against `path`.
    #[must_use]
    pub fn build_params(&self, path: &str) -> Params {
        self.pattern.extract_params(path)
    }
}
