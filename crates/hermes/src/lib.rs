//! # Hermes
//!
//! Exposes a service's typed operations over HTTP.
//!
//! Each operation is an async function from a typed request to a typed
//! response. Hermes routes the request to it, fills the request value from
//! path captures, query string and JSON body, and turns the result or error
//! into an HTTP response with a meaningful status code.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hermes::prelude::*;
//!
//! #[derive(Debug, Default, serde::Deserialize, Bindable)]
//! #[serde(default)]
//! #[bind(crate = "hermes::bind")]
//! struct GetGame {
//!     id: String,
//! }
//!
//! async fn get_game(_ctx: &RequestContext, req: GetGame) -> RpcResult<Game> {
//!     // ...
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut gateway = Gateway::builder().name("GameService").path_prefix("/v2").build();
//!     gateway.register(Endpoint::new(Method::GET, "/game/:ID", "GameService", "GetByID", handler_fn(get_game)))?;
//!     gateway.serve("0.0.0.0:9001").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → RequestId → AccessLog → Registry → Binder → Handler
//!                                                          ↓
//! Response ←──────────────────────────────────── Responder ┘
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Handler contract, errors and request context
pub use hermes_core as core;

// Path patterns and route tables
pub use hermes_router as router;

// Request binding and the Bindable derive
pub use hermes_bind as bind;

pub use hermes_middleware as middleware;

// Endpoints, registry, dispatch and serving
pub use hermes_gateway as gateway;

pub use hermes_telemetry as telemetry;

pub use hermes_config as config;

pub use http;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use hermes_core::{
        handler_fn, CancellationToken, Empty, Handler, NoContent, RequestContext, RpcError,
        RpcResult,
    };

    pub use hermes_bind::{Bindable, Binder};

    pub use hermes_gateway::{Endpoint, Gateway, GatewayConfig, GatewayError, ShutdownSignal};

    pub use hermes_middleware::stages::{AccessLog, RequestIdMiddleware};
    pub use hermes_middleware::Middleware;

    pub use hermes_config::{ConfigLoader, HermesConfig};

    pub use http::{Method, StatusCode};
}
