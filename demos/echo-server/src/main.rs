//! # Echo Server
//!
//! Echoes query strings, path parameters and JSON bodies back to the caller.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p echo-server
//! HERON__SERVER__PORT=8080 cargo run -p echo-server
//! curl 'http://localhost:3030/testQueryString?id=1&name=test'
//! ```

mod routes;

use heron::prelude::*;
use tracing::info;

const CONFIG_FILE: &str = "demos/echo-server/echo.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_defaults()
        .with_optional_file(CONFIG_FILE)?
        .with_dotenv()?
        .with_env_prefix("HERON")
        .load()?;

    let telemetry = TelemetryConfig::builder()
        .logging(config.logging.to_log_config())
        .metrics(config.metrics.to_metrics_config())
        .build();
    init_telemetry(&telemetry)?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        cors = config.server.cors.is_enabled(),
        "Starting echo server"
    );

    let mut server = Server::from_config(&config.server)?;
    routes::register(&mut server);
    server.run().await?;

    Ok(())
}
