//! Dispatch and serving errors.

use std::time::Duration;

use hermes_bind::BindError;
use hermes_core::{ErrorBody, RpcError};
use hermes_router::PatternError;
use http::{Method, StatusCode};
use thiserror::Error;

/// Why a request did not produce a successful response.
///
/// Every variant is recovered at the gateway and turned into a response by
/// the [`Responder`](crate::Responder); none escapes to the transport.
///
/// | Variant | Status |
/// |---------|--------|
/// | `RouteNotFound` | 404 |
/// | `BodyRead` | 400 |
/// | `Bind` | 400, or 413 for oversized bodies |
/// | `Handler` | the error's classified status, else 500 |
/// | `Fault` | 500 |
/// | `Serialization` | 500, plain text |
/// | `Timeout` | 504 |
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No endpoint matches the method and path.
    #[error("no endpoint for {method} {path}")]
    RouteNotFound {
        /// Request method.
        method: Method,
        /// Request path.
        path: String,
    },

    /// The request body could not be read from the connection.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The body was rejected by the binder.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The handler returned an error.
    #[error(transparent)]
    Handler(#[from] RpcError),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Fault(String),

    /// The handler result could not be encoded as JSON.
    #[error("failed to encode response: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request deadline elapsed before the handler returned.
    #[error("request exceeded its {0:?} deadline")]
    Timeout(Duration),
}

impl DispatchError {
    /// Response status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::BodyRead(_) => StatusCode::BAD_REQUEST,
            Self::Bind(err) => err.status_code(),
            Self::Handler(err) => err.status_code(),
            Self::Fault(_) | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            Self::BodyRead(_) => "BODY_READ_ERROR",
            Self::Bind(err) => err.error_code(),
            Self::Handler(err) => err.error_code(),
            Self::Fault(_) => "INTERNAL_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
        }
    }

    /// Wire body for this error.
    ///
    /// Panic payloads and internal error sources stay in the logs.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        match self {
            Self::Handler(err) => err.to_body(),
            Self::Bind(err) => ErrorBody::new(err.message()).with_code(self.error_code()),
            Self::Fault(_) => {
                ErrorBody::new("internal server error").with_code(self.error_code())
            }
            other => ErrorBody::new(other.to_string()).with_code(other.error_code()),
        }
    }
}

/// Errors raised while building or running a gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An endpoint path did not compile.
    #[error("invalid path for {operation}: {source}")]
    InvalidPath {
        /// `Service.Operation` of the offending endpoint.
        operation: String,
        /// Underlying pattern error.
        #[source]
        source: PatternError,
    },

    /// Registration was attempted after the gateway started dispatching.
    #[error("registration is closed once the gateway has started serving")]
    RegistrationClosed,

    /// The bind address did not parse.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// Binding the listener or accepting failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
