//! Loading configuration files from disk.

use std::io::Write;

use heron_config::{ConfigError, ConfigLoader, CorsSetting, LogFormat};
use tempfile::Builder;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_toml_file() {
    let file = write_temp(
        ".toml",
        r#"
        [server]
        name = "echo"
        port = 3030
        cors = true
        body_timeout_ms = 0

        [logging]
        format = "pretty"
        "#,
    );

    let config = ConfigLoader::new()
        .with_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.server.name, "echo");
    assert_eq!(config.server.port, 3030);
    assert_eq!(config.server.cors, CorsSetting::Flag(true));
    assert_eq!(config.server.body_timeout_ms, 0);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_load_json_file() {
    let file = write_temp(
        ".json",
        r#"{"server": {"verbose": true, "cors": {"allowOrigin": "https://a.test"}}}"#,
    );

    let config = ConfigLoader::new()
        .with_optional_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert!(config.server.verbose);
    assert_eq!(config.server.cors.allow_origin(), Some("https://a.test"));
    assert_eq!(config.server.port, 80);
}

#[test]
fn test_malformed_file_is_rejected() {
    let file = write_temp(".toml", "[server\nport = 1");
    let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::TomlError(_)));
}

#[test]
fn test_unknown_extension_is_rejected() {
    let file = write_temp(".yaml", "server: {}");
    let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}
