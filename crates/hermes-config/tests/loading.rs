//! Loading configuration from files and the environment.

use std::io::Write;
use std::time::Duration;

use hermes_config::{ConfigError, ConfigLoader, LogFormat};
use tempfile::NamedTempFile;

fn file_with(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_toml_file() {
    let file = file_with(
        ".toml",
        r#"
[server]
http_addr = "127.0.0.1:9101"
path_prefix = "/v2"
request_timeout_ms = 1500

[logging]
format = "pretty"
service_name = "GameService"
"#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

    assert_eq!(config.server.http_addr, "127.0.0.1:9101");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.logging.service_name, "GameService");
    assert!(config.metrics.enabled);

    let gateway = config.gateway_config();
    assert_eq!(gateway.path_prefix(), "/v2");
    assert_eq!(gateway.request_timeout(), Some(Duration::from_millis(1500)));
}

#[test]
fn loads_json_file() {
    let file = file_with(".json", r#"{"server": {"max_body_bytes": 2048}}"#);

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    assert_eq!(config.gateway_config().max_body_bytes(), 2048);
}

#[test]
fn rejects_unknown_extension() {
    let file = file_with(".yaml", "server: {}");

    let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn file_values_are_validated_on_load() {
    let file = file_with(".toml", "[server]\npath_prefix = \"v2\"\n");

    let err = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn environment_overrides_file() {
    let file = file_with(".toml", "[server]\nhttp_addr = \"127.0.0.1:9102\"\n");
    std::env::set_var("HERMES_LOADING_TEST__SERVER__HTTP_ADDR", "127.0.0.1:9103");
    std::env::set_var("HERMES_LOADING_TEST__METRICS__ENABLED", "false");

    let config = ConfigLoader::new()
        .with_file(file.path())
        .unwrap()
        .with_env_prefix("hermes_loading_test")
        .load()
        .unwrap();

    assert_eq!(config.server.http_addr, "127.0.0.1:9103");
    assert!(!config.metrics.enabled);
}

#[test]
fn malformed_environment_override_fails() {
    std::env::set_var("HERMES_BAD_ENV_TEST__SERVER__MAX_BODY_BYTES", "huge");

    let err = ConfigLoader::new()
        .with_env_prefix("HERMES_BAD_ENV_TEST")
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::EnvParseError { ref var, .. }
        if var == "HERMES_BAD_ENV_TEST__SERVER__MAX_BODY_BYTES"));
}

#[test]
fn env_file_feeds_overrides() {
    let file = file_with(".env", "HERMES_ENV_FILE_TEST__LOGGING__LEVEL=warn\n");

    let config = ConfigLoader::new()
        .with_env_file(file.path())
        .unwrap()
        .with_env_prefix("HERMES_ENV_FILE_TEST")
        .load()
        .unwrap();

    assert_eq!(config.logging.level, "warn");
}

#[test]
fn missing_env_file_fails() {
    let err = ConfigLoader::new()
        .with_env_file("/nonexistent/hermes.env")
        .unwrap_err();
    assert!(matches!(err, ConfigError::DotenvError(_)));
}
