//! Gateway configuration.
//!
//! ```rust
//! use hermes_gateway::GatewayConfig;
//! use std::time::Duration;
//!
//! let config = GatewayConfig::builder()
//!     .http_addr("127.0.0.1:9001")
//!     .path_prefix("/v2")
//!     .request_timeout(Some(Duration::from_secs(5)))
//!     .build();
//!
//! assert_eq!(config.path_prefix(), "/v2");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use hermes_bind::DEFAULT_MAX_BODY_SIZE;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:9001";

/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Settings fixed at gateway construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    http_addr: String,
    path_prefix: String,
    shutdown_timeout: Duration,
    request_timeout: Option<Duration>,
    max_body_bytes: usize,
}

impl GatewayConfig {
    /// Starts a builder with default values.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// A builder starting from these values.
    #[must_use]
    pub fn to_builder(&self) -> GatewayConfigBuilder {
        GatewayConfigBuilder {
            config: self.clone(),
        }
    }

    /// Address to serve on.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses [`http_addr`](Self::http_addr).
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// Prefix prepended to every registered path.
    #[must_use]
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// How long shutdown waits for open connections.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Deadline for a single request, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Largest accepted request body.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug, Clone)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl Default for GatewayConfigBuilder {
    fn default() -> Self {
        Self {
            config: GatewayConfig {
                http_addr: DEFAULT_HTTP_ADDR.to_string(),
                path_prefix: String::new(),
                shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
                request_timeout: Some(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)),
                max_body_bytes: DEFAULT_MAX_BODY_SIZE,
            },
        }
    }
}

impl GatewayConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.http_addr = addr.into();
        self
    }

    /// Sets the path prefix, e.g. `"/v2"`.
    #[must_use]
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.path_prefix = prefix.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Sets the per-request deadline; `None` disables it.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Sets the request body limit.
    #[must_use]
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.config.max_body_bytes = max;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> GatewayConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.http_addr(), DEFAULT_HTTP_ADDR);
        assert_eq!(config.path_prefix(), "");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.max_body_bytes(), DEFAULT_MAX_BODY_SIZE);
        assert_eq!(config.socket_addr().unwrap().port(), 9001);
    }

    #[test]
    fn test_builder_overrides() {
        let config = GatewayConfig::builder()
            .http_addr("127.0.0.1:0")
            .path_prefix("/v2")
            .shutdown_timeout(Duration::from_secs(1))
            .request_timeout(None)
            .max_body_bytes(64)
            .build();

        assert_eq!(config.path_prefix(), "/v2");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.max_body_bytes(), 64);
    }

    #[test]
    fn test_invalid_addr() {
        let config = GatewayConfig::builder().http_addr("nowhere").build();
        assert!(config.socket_addr().is_err());
    }
}
