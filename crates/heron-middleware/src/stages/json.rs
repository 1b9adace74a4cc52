//! JSON support marker.

use heron_core::Response;

use crate::{Middleware, RequestHead};

/// Registered when JSON support is requested. Does nothing itself; request
/// bodies are parsed by the dispatcher for POST and PUT.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMiddleware;

impl Middleware for JsonMiddleware {
    fn name(&self) -> &'static str {
        super::JSON
    }

    fn process(&self, _request: &RequestHead, _response: &mut Response) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_middleware_is_passthrough() {
        let head = http::Request::new(()).into_parts().0;
        let mut response = Response::new();
        JsonMiddleware.process(&head, &mut response);

        assert_eq!(JsonMiddleware.name(), "json");
        assert!(response.headers().is_empty());
        assert!(!response.is_finalized());
    }
}
