//! Flat path-pattern routing for Heron.
//!
//! This crate holds the route-matching half of the dispatch pipeline:
//!
//! - [`PathPattern`] compiles a template like `/users/:id` into segments and
//!   records which positions are named parameters.
//! - [`Route`] pairs a [`RouteMethod`], a pattern, and a handler.
//! - [`RouteTable`] keeps routes in registration order, answers path-only
//!   lookups, and resolves the method among the path matches.
//!
//! # Example
//!
//! ```rust
//! use heron_router::{Resolution, RouteMethod, RouteTable};
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.add(RouteMethod::Get, "/testParams/:id/:name", "echoParams");
//!
//! let Resolution::Matched(route) = table.resolve(&Method::GET, "/testParams/1/test") else {
//!     panic!("route should match");
//! };
//! let params = route.build_params("/testParams/1/test");
//! assert_eq!(params.get("id"), Some("1"));
//! assert_eq!(params.get("name"), Some("test"));
//! ```
//!
//! # Matching rules
//!
//! ```text
//!   pattern   testParams / :id / :name
//!   path      testParams /  1  /  test
//!             ----------   --    ----
//!             literal      any   any
//! ```
//!
//! Segment counts must agree, literals compare case-sensitively, and
//! registration order breaks ties.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod method;
mod params;
mod pattern;
mod route;
mod table;

pub use method::{RouteMethod, UnknownMethod};
pub use params::Params;
pub use pattern::PathPattern;
pub use route::Route;
pub use table::{PathMatches, Resolution, RouteTable};
