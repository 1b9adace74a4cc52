//! Built-in middleware.
//!
//! | Name | Middleware | Registered when |
//! |------|------------|-----------------|
//! | `json` | [`JsonMiddleware`] | JSON support requested |
//! | `cors` | [`CorsMiddleware`] | CORS requested |

pub mod cors;
pub mod json;

pub use cors::{CorsConfig, CorsMiddleware};
pub use json::JsonMiddleware;

/// Chain key of the JSON marker.
pub const JSON: &str = "json";

/// Chain key of the CORS middleware.
pub const CORS: &str = "cors";
