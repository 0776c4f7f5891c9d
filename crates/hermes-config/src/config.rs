//! Root configuration type.

use std::net::SocketAddr;
use std::time::Duration;

use hermes_gateway::GatewayConfig;
use hermes_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schema::{LogFormat, LoggingConfig, MetricsConfig, ServerConfig};

/// Complete configuration of a Hermes service.
///
/// ```toml
/// [server]
/// http_addr = "0.0.0.0:9001"
/// path_prefix = "/v2"
///
/// [logging]
/// level = "debug"
/// format = "pretty"
///
/// [metrics]
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HermesConfig {
    /// HTTP serving.
    pub server: ServerConfig,

    /// Structured logging.
    pub logging: LoggingConfig,

    /// Prometheus exporter.
    pub metrics: MetricsConfig,
}

impl HermesConfig {
    /// Settings for local development: pretty `debug` logs, no exporter.
    #[must_use]
    pub fn development() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ..LoggingConfig::default()
            },
            metrics: MetricsConfig {
                enabled: false,
                ..MetricsConfig::default()
            },
        }
    }

    /// Settings for deployment: JSON `info` logs, exporter on.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Checks values that deserialize but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("'{}' is not a socket address", self.server.http_addr),
            ));
        }

        let prefix = &self.server.path_prefix;
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "server.path_prefix",
                "must be empty or start with '/'",
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        if self.metrics.enabled && self.metrics.addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "metrics.addr",
                format!("'{}' is not a socket address", self.metrics.addr),
            ));
        }

        Ok(())
    }

    /// Gateway settings from the `[server]` section.
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        let server = &self.server;
        let request_timeout = match server.request_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        GatewayConfig::builder()
            .http_addr(server.http_addr.clone())
            .path_prefix(server.path_prefix.clone())
            .shutdown_timeout(Duration::from_secs(server.shutdown_timeout_secs))
            .request_timeout(request_timeout)
            .max_body_bytes(server.max_body_bytes)
            .build()
    }

    /// Subscriber settings from the `[logging]` section.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let logging = &self.logging;
        let base = match logging.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };

        LogConfig {
            enabled: logging.enabled,
            level: logging.level.clone(),
            format: logging.format.into(),
            service_name: logging.service_name.clone(),
            ..base
        }
    }

    /// Exporter settings from the `[metrics]` section.
    #[must_use]
    pub fn metrics_config(&self) -> hermes_telemetry::MetricsConfig {
        hermes_telemetry::MetricsConfig {
            enabled: self.metrics.enabled,
            addr: self.metrics.addr.clone(),
            ..hermes_telemetry::MetricsConfig::default()
        }
    }
}
