//! Stock middleware stages.
//!
//! - [`request_id`] - Generate/propagate the request ID
//! - [`access_log`] - One structured log event per request

pub mod access_log;
pub mod request_id;

pub use access_log::AccessLog;
pub use request_id::{RequestIdMiddleware, REQUEST_ID_HEADER};
