//! # Hermes Config
//!
//! Typed, layered configuration for Hermes services.
//!
//! Configuration comes from built-in defaults, an optional TOML or JSON
//! file and `PREFIX__SECTION__KEY` environment variables, in that order.
//! Unknown fields are rejected so typos fail at startup.
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hermes_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("hermes.toml")?
//!     .with_env_prefix("HERMES")
//!     .load()?;
//!
//! let gateway_config = config.gateway_config();
//! let log_config = config.log_config();
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::HermesConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    LogFormat, LoggingConfig, MetricsConfig, ServerConfig, DEFAULT_HTTP_ADDR,
    DEFAULT_MAX_BODY_BYTES, DEFAULT_METRICS_ADDR,
};
