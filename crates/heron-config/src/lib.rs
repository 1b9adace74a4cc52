//! Typed configuration for Heron servers.
//!
//! - TOML and JSON files
//! - Environment variable overrides
//! - Strict parsing (unknown fields fail)
//! - Layered loading (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use heron_config::ConfigLoader;
//!
//! # fn main() -> Result<(), heron_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("heron.toml")?
//!     .with_env_prefix("HERON")
//!     .load()?;
//!
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! # Ok(())
//! # }
//! ```
//!
//! # File format
//!
//! ```toml
//! [server]
//! name = "echo"
//! host = "0.0.0.0"
//! port = 3030
//! verbose = true
//! json = true
//! cors = { allow_origin = "https://app.example.com" }
//! body_timeout_ms = 30000
//! shutdown_timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//!
//! [metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//! ```
//!
//! # Environment overrides
//!
//! Keys take the form `PREFIX__SECTION__KEY`, e.g.
//! `HERON__SERVER__PORT=8080` or `HERON__METRICS__ENABLED=false`.

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::HeronConfig;
pub use error::ConfigError;
pub use loader::{parse_bool, ConfigLoader};
pub use schema::{CorsSetting, LogFormat, LoggingSection, MetricsSection, ServerSection};
