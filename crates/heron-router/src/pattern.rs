//! Compiled path templates.
//!
//! A pattern such as `/users/:id/posts` is compiled once, at registration,
//! into its `/`-separated segments plus the positions of the named
//! parameters. Matching a request path is then a segment-by-segment
//! comparison with no allocation beyond the split.

use std::fmt;

use smallvec::SmallVec;

use crate::Params;

/// Marker that introduces a named parameter segment.
const PARAM_PREFIX: char = ':';

/// Strips one leading `/`, if present.
fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// A route's compiled path template.
///
/// Segments beginning with `:` are named parameters and match any value at
/// their position. Every other segment is matched literally and
/// case-sensitively. There are no wildcards and no optional segments: a
/// pattern with N segments only ever matches paths with N segments.
///
/// # Example
///
/// ```rust
/// use heron_router::PathPattern;
///
/// let pattern = PathPattern::new("/testParams/:id/:name");
///
/// assert!(pattern.matches("/testParams/1/test"));
/// assert!(!pattern.matches("/testParams/1"));
///
/// let params = pattern.extract_params("/testParams/1/test");
/// assert_eq!(params.get("id"), Some("1"));
/// assert_eq!(params.get("name"), Some("test"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    /// The template with its leading `/` removed
    raw: String,

    segments: Vec<String>,

    /// `(segment index, parameter name)` in ascending index order
    params: SmallVec<[(usize, String); 4]>,
}

impl PathPattern {
    /// Compiles a path template.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let raw = strip_leading_slash(pattern).to_string();
        let segments: Vec<String> = raw.split('/').map(str::to_string).collect();
        let params = segments
            .iter()
            .enumerate()
            .filter_map(|(index, segment)| {
                segment
                    .strip_prefix(PARAM_PREFIX)
                    .map(|name| (index, name.to_string()))
            })
            .collect();

        Self {
            raw,
            segments,
            params,
        }
    }

    /// Returns the template without its leading `/`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments. Fixed at construction.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns `(segment index, parameter name)` pairs in segment order.
    pub fn param_positions(&self) -> impl Iterator<Item = (usize, &str)> {
        self.params.iter().map(|(i, name)| (*i, name.as_str()))
    }

    /// Returns true if the template has no parameter segments.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.params.is_empty()
    }

    fn is_param_position(&self, index: usize) -> bool {
        self.params.iter().any(|(i, _)| *i == index)
    }

    /// Tests a request path (no query string) against this template.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path = strip_leading_slash(path);
        if self.raw == path {
            return true;
        }

        let mut count = 0;
        for (index, segment) in path.split('/').enumerate() {
            let Some(expected) = self.segments.get(index) else {
                return false;
            };
            if !self.is_param_position(index) && expected != segment {
                return false;
            }
            count += 1;
        }

        count == self.segments.len()
    }

    /// Reads the parameter values out of a request path.
    ///
    /// Only meaningful for a path that [`matches`](Self::matches); a
    /// parameter whose position is missing from `path` is left unbound.
    #[must_use]
    pub fn extract_params(&self, path: &str) -> Params {
        let items: Vec<&str> = strip_leading_slash(path).split('/').collect();
        let mut params = Params::with_capacity(self.params.len());
        for (index, name) in &self.params {
            if let Some(value) = items.get(*index) {
                params.insert(name.as_str(), *value);
            }
        }
        params
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.raw)
    }
}

impl From<&str> for PathPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compiles_segments() {
        let pattern = PathPattern::new("/users/:id/posts");
        assert_eq!(pattern.as_str(), "users/:id/posts");
        assert_eq!(pattern.segments(), ["users", ":id", "posts"]);
        assert_eq!(pattern.segment_count(), 3);
        let positions: Vec<_> = pattern.param_positions().collect();
        assert_eq!(positions, vec![(1, "id")]);
        assert!(!pattern.is_static());
    }

    #[test]
    fn test_pattern_leading_slash_optional() {
        assert_eq!(PathPattern::new("test"), PathPattern::new("/test"));
        assert!(PathPattern::new("test").matches("/test"));
        assert!(PathPattern::new("/test").matches("test"));
    }

    #[test]
    fn test_pattern_static_match() {
        let pattern = PathPattern::new("test");
        assert!(pattern.is_static());
        assert!(pattern.matches("/test"));
        assert!(!pattern.matches("/test/unknown"));
        assert!(!pattern.matches("/other"));
    }

    #[test]
    fn test_pattern_is_case_sensitive() {
        let pattern = PathPattern::new("/Users/:id");
        assert!(pattern.matches("/Users/1"));
        assert!(!pattern.matches("/users/1"));
    }

    #[test]
    fn test_pattern_segment_count_must_agree() {
        let pattern = PathPattern::new("a/:b");
        assert!(!pattern.matches("/a"));
        assert!(!pattern.matches("/a/1/c"));
        // A trailing slash adds an empty segment.
        assert!(!PathPattern::new("test").matches("/test/"));
    }

    #[test]
    fn test_pattern_keeps_empty_segments() {
        let pattern = PathPattern::new("/a//b");
        assert_eq!(pattern.segments(), ["a", "", "b"]);
        assert!(pattern.matches("/a//b"));
        assert!(!pattern.matches("/a/b"));
    }

    #[test]
    fn test_pattern_param_matches_empty_segment() {
        let pattern = PathPattern::new("/items/:id");
        assert!(pattern.matches("/items/"));
        assert_eq!(pattern.extract_params("/items/").get("id"), Some(""));
    }

    #[test]
    fn test_pattern_root() {
        let pattern = PathPattern::new("/");
        assert!(pattern.matches("/"));
        assert!(pattern.matches(""));
        assert!(!pattern.matches("/a"));
        assert_eq!(pattern.to_string(), "/");
    }

    #[test]
    fn test_pattern_extract_params() {
        let pattern = PathPattern::new("testParams/:id/:name");
        let params = pattern.extract_params("/testParams/1/test");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("id", "1"), ("name", "test")]);
    }

    #[test]
    fn test_pattern_extract_params_raw_values() {
        let pattern = PathPattern::new("/files/:name");
        let params = pattern.extract_params("/files/a%20b");
        assert_eq!(params.get("name"), Some("a%20b"));
    }

    #[test]
    fn test_pattern_repeated_param_name_keeps_last() {
        let pattern = PathPattern::new("/:x/:x");
        assert!(pattern.matches("/1/2"));
        assert_eq!(pattern.extract_params("/1/2").get("x"), Some("2"));
    }

    #[test]
    fn test_pattern_literal_colon_in_path() {
        // A request segment that looks like a parameter is still a literal.
        let pattern = PathPattern::new("/a/b");
        assert!(!pattern.matches("/a/:b"));
        assert!(PathPattern::new("/a/:b").matches("/a/:b"));
    }
}
