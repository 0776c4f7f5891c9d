//! # Hermes Middleware
//!
//! The middleware chain the gateway wraps around dispatch.
//!
//! ```text
//! Request → A → B → … → dispatch
//!                          ↓
//! Response ← A ← B ← … ←───┘
//! ```
//!
//! Middleware is supplied once, at gateway construction, as an ordered list.
//! The first entry is the outermost link. Any link may answer the request
//! itself instead of calling [`Next::run`].
//!
//! ## Stock stages
//!
//! | Stage | Middleware | Purpose |
//! |-------|-----------|---------|
//! | `request_id` | [`stages::RequestIdMiddleware`] | Assign and echo `x-request-id` |
//! | `access_log` | [`stages::AccessLog`] | One structured log event per request |

#![doc(html_root_url = "https://docs.rs/hermes-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod context;
pub mod middleware;
pub mod stages;
pub mod types;

pub use chain::{BoxedMiddleware, Chain, ChainBuilder};
pub use context::MiddlewareContext;
pub use middleware::{BoxFuture, Dispatch, FnMiddleware, Middleware, Next};
pub use types::{Request, ResolvedOperation, Response, ResponseExt};
