//! The HTTP verbs a route can be registered for.

use std::fmt;
use std::str::FromStr;

use http::Method;

/// HTTP method a [`Route`](crate::Route) answers to.
///
/// Only the four verbs of the registration API exist. Comparison against an
/// incoming request method is an exact, case-sensitive string match, so a
/// request sent with method `get` never resolves to a `GET` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl RouteMethod {
    /// All registrable methods, in the order they are advertised in CORS
    /// headers.
    pub const ALL: [Self; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    /// Returns the canonical upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns true if `method` is exactly this verb.
    #[must_use]
    pub fn matches(self, method: &Method) -> bool {
        method.as_str() == self.as_str()
    }

    /// Maps a request method onto a registrable verb.
    #[must_use]
    pub fn from_http(method: &Method) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.matches(method))
    }

    /// Returns true for the verbs whose request body is parsed as JSON.
    #[must_use]
    pub const fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Converts into the `http` crate's method type.
    #[must_use]
    pub fn to_http(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a string that is not a registrable verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported route method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for RouteMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

impl From<RouteMethod> for Method {
    fn from(method: RouteMethod) -> Self {
        method.to_http()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_method_matches_exact_verb() {
        assert!(RouteMethod::Get.matches(&Method::GET));
        assert!(!RouteMethod::Get.matches(&Method::POST));
        assert!(!RouteMethod::Delete.matches(&Method::OPTIONS));
    }

    #[test]
    fn test_route_method_is_case_sensitive() {
        let lower = Method::from_bytes(b"get").unwrap();
        assert!(!RouteMethod::Get.matches(&lower));
        assert_eq!(RouteMethod::from_http(&lower), None);
        assert!("get".parse::<RouteMethod>().is_err());
    }

    #[test]
    fn test_route_method_parse() {
        assert_eq!("PUT".parse::<RouteMethod>(), Ok(RouteMethod::Put));
        let err = "PATCH".parse::<RouteMethod>().unwrap_err();
        assert!(err.to_string().contains("PATCH"));
    }

    #[test]
    fn test_route_method_carries_body() {
        assert!(RouteMethod::Post.carries_body());
        assert!(RouteMethod::Put.carries_body());
        assert!(!RouteMethod::Get.carries_body());
        assert!(!RouteMethod::Delete.carries_body());
    }

    #[test]
    fn test_route_method_http_conversion() {
        for method in RouteMethod::ALL {
            assert_eq!(RouteMethod::from_http(&method.to_http()), Some(method));
        }
    }
}
