//! Configuration sections.
//!
//! Every section denies unknown fields and fills missing ones from its
//! `Default`, so a file only needs to name what it changes.

use serde::{Deserialize, Serialize};

/// Default HTTP address.
pub const DEFAULT_HTTP_ADDR: &str = hermes_gateway::config::DEFAULT_HTTP_ADDR;

/// Default Prometheus scrape address.
pub const DEFAULT_METRICS_ADDR: &str = "0.0.0.0:9090";

/// Default maximum request body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// HTTP serving settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to serve on.
    pub http_addr: String,

    /// Prefix prepended to every endpoint path, e.g. `/v2`.
    pub path_prefix: String,

    /// Grace period for open connections at shutdown.
    pub shutdown_timeout_secs: u64,

    /// Per-request deadline. `0` disables it.
    pub request_timeout_ms: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            path_prefix: String::new(),
            shutdown_timeout_secs: hermes_gateway::config::DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            request_timeout_ms: hermes_gateway::config::DEFAULT_REQUEST_TIMEOUT_MS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable.
    Pretty,
}

impl From<LogFormat> for hermes_telemetry::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Whether to install a subscriber.
    pub enabled: bool,

    /// Filter directives, e.g. `"info"` or `"hermes_gateway=debug,info"`.
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Service name attached to startup logs.
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            service_name: "hermes".to_string(),
        }
    }
}

/// Prometheus exporter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    /// Whether to install the exporter.
    pub enabled: bool,

    /// Scrape endpoint address.
    pub addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: DEFAULT_METRICS_ADDR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.http_addr, "0.0.0.0:9001");
        assert!(server.path_prefix.is_empty());
        assert_eq!(server.shutdown_timeout_secs, 30);
        assert_eq!(server.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let server: ServerConfig = toml::from_str(r#"path_prefix = "/v2""#).unwrap();
        assert_eq!(server.path_prefix, "/v2");
        assert_eq!(server.http_addr, DEFAULT_HTTP_ADDR);
    }

    #[test]
    fn test_log_format_names() {
        let logging: LoggingConfig = toml::from_str(r#"format = "pretty""#).unwrap();
        assert_eq!(logging.format, LogFormat::Pretty);
        assert_eq!(
            hermes_telemetry::LogFormat::from(logging.format),
            hermes_telemetry::LogFormat::Pretty
        );

        assert!(toml::from_str::<LoggingConfig>(r#"format = "xml""#).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<MetricsConfig, _> = toml::from_str("port = 9090");
        assert!(result.is_err());
    }
}
