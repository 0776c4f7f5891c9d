//! # Hermes Core
//!
//! Core types shared by every Hermes crate:
//!
//! - [`RpcError`] - Classified handler errors and their status mapping
//! - [`ErrorBody`] - The `{message, code}` error body written to clients
//! - [`RequestContext`] - Per-request identity, deadline and cancellation
//! - [`RequestId`] - UUID v7 request identifier
//! - [`Handler`] - A typed service operation

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;

pub use context::{RequestContext, RequestId};
pub use error::{ErrorBody, ErrorCategory, RpcError, RpcResult};
pub use handler::{handler_fn, Empty, FnHandler, Handler, NoContent};

/// Re-exported so handlers can name the token type without a direct dependency.
pub use tokio_util::sync::CancellationToken;
