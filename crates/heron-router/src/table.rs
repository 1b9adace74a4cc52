//! The ordered route collection.
//!
//! Lookup is a linear scan over routes in registration order, O(routes) per
//! request. Registration order is the only tie-break between overlapping
//! patterns; there is no specificity scoring. A radix tree could replace the
//! scan without changing [`RouteTable::find_by_path`]'s contract.

use http::Method;

use crate::{Route, RouteMethod};

/// Routes in registration order.
///
/// # Example
///
/// ```rust
/// use heron_router::{Resolution, RouteMethod, RouteTable};
/// use http::Method;
///
/// let mut table = RouteTable::new();
/// table.add(RouteMethod::Get, "/users/:id", "getUser");
/// table.add(RouteMethod::Delete, "/users/:id", "deleteUser");
///
/// match table.resolve(&Method::GET, "/users/42") {
///     Resolution::Matched(route) => assert_eq!(*route.handler(), "getUser"),
///     other => panic!("unexpected {other:?}"),
/// }
///
/// assert!(matches!(
///     table.resolve(&Method::POST, "/users/42"),
///     Resolution::MethodNotAllowed { .. }
/// ));
/// assert!(matches!(table.resolve(&Method::GET, "/nope"), Resolution::NotFound));
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<H> RouteTable<H> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    pub fn add(&mut self, method: RouteMethod, path: &str, handler: H) -> &mut Self {
        self.routes.push(Route::new(method, path, handler));
        self
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates routes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route<H>> {
        self.routes.iter()
    }

    /// Collects every route whose pattern matches `path`, whatever its
    /// method.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> PathMatches<'_, H> {
        PathMatches {
            routes: self
                .routes
                .iter()
                .filter(|route| route.matches_path(path))
                .collect(),
        }
    }

    /// Path lookup followed by method resolution.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_, H> {
        let matches = self.find_by_path(path);
        if matches.is_empty() {
            return Resolution::NotFound;
        }
        match matches.for_method(method) {
            Some(route) => Resolution::Matched(route),
            None => Resolution::MethodNotAllowed {
                allowed: matches.allowed_methods(),
            },
        }
    }
}

impl<'a, H> IntoIterator for &'a RouteTable<H> {
    type Item = &'a Route<H>;
    type IntoIter = std::slice::Iter<'a, Route<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

/// The routes matching one request path, in registration order.
#[derive(Debug)]
pub struct PathMatches<'a, H> {
    routes: Vec<&'a Route<H>>,
}

impl<'a, H> PathMatches<'a, H> {
    /// Returns true if no route matched the path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns the number of path-only matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Iterates the matches in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Route<H>> + '_ {
        self.routes.iter().copied()
    }

    /// The first match, in registration order, registered for `method`.
    #[must_use]
    pub fn for_method(&self, method: &Method) -> Option<&'a Route<H>> {
        self.routes
            .iter()
            .copied()
            .find(|route| route.method().matches(method))
    }

    /// The distinct methods registered for this path, first-seen order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<RouteMethod> {
        let mut allowed = Vec::with_capacity(self.routes.len());
        for route in &self.routes {
            if !allowed.contains(&route.method()) {
                allowed.push(route.method());
            }
        }
        allowed
    }
}

/// Outcome of resolving a request against a [`RouteTable`].
#[derive(Debug)]
pub enum Resolution<'a, H> {
    /// No pattern matches the path.
    NotFound,
    /// The path matches, but no route has the request's method.
    MethodNotAllowed {
        /// Methods registered for the path.
        allowed: Vec<RouteMethod>,
    },
    /// The winning route.
    Matched(&'a Route<H>),
}

impl<H> Resolution<'_, H> {
    /// Returns true if a route was selected.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}
