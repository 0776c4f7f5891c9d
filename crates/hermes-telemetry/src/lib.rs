//! Observability for Hermes gateways.
//!
//! - **Logging**: `tracing-subscriber` with JSON or pretty output
//! - **Metrics**: Prometheus exposition via the `metrics` facade
//!
//! ```text
//!   gateway dispatch ──► tracing events ──► fmt layer ──► stdout
//!                  └───► metrics facade ──► Prometheus recorder ──► /metrics
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use hermes_telemetry::{init_logging, init_metrics, LogConfig, MetricsConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::production())?;
//!     init_metrics(&MetricsConfig::default())?;
//!     // ...
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use crate::error::TelemetryError;
pub use crate::logging::{create_env_filter, init_logging, LogConfig, LogFormat};
pub use crate::metrics::{
    init_metrics, record_handler_fault, record_request, InFlightGuard, MetricsConfig,
};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
