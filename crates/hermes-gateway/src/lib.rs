//! # Hermes Gateway
//!
//! Exposes typed service operations over HTTP.
//!
//! A [`Gateway`] owns an ordered [`Registry`] of [`Endpoint`]s, a binder,
//! the [`Responder`] and a middleware chain. For every request it resolves
//! the endpoint, binds the typed request from path captures, query string
//! and JSON body, runs the handler and writes the result or error.
//!
//! ```text
//! request ─► middleware ─► Registry::resolve ─► Binder::bind ─► handler ─► Responder
//!                                 │                   │             │
//!                                404              400 / 413    status from error,
//!                                                              500 on panic
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use hermes_gateway::{Endpoint, Gateway};
//! use http::{Method, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hermes_gateway::GatewayError> {
//!     let mut gateway = Gateway::builder()
//!         .name("GameService")
//!         .path_prefix("/v2")
//!         .build();
//!
//!     gateway.register(Endpoint::new(Method::GET, "/game/:ID", "GameService", "GetByID", get_by_id))?;
//!     gateway.register(
//!         Endpoint::new(Method::POST, "/game", "GameService", "Register", register)
//!             .with_status(StatusCode::CREATED),
//!     )?;
//!
//!     gateway.serve("0.0.0.0:9001").await
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-gateway/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod responder;
mod server;
pub mod shutdown;

pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use endpoint::Endpoint;
pub use error::{DispatchError, GatewayError};
pub use gateway::{Gateway, GatewayBuilder};
pub use registry::Registry;
pub use responder::Responder;
pub use shutdown::ShutdownSignal;
