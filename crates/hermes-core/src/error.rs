//! Error types returned by service handlers.
//!
//! [`RpcError`] is how a handler tells the gateway which status to answer
//! with. Every variant except [`RpcError::Internal`] is *classified*: it
//! carries an intended status (404, 409, 403, ...). `Internal` covers
//! unclassified failures and always maps to 500.
//!
//! | `ErrorCategory` | Status |
//! |---|---|
//! | `Validation` | 400 |
//! | `Authentication` | 401 |
//! | `Authorization` | 403 |
//! | `NotFound` | 404 |
//! | `Conflict` | 409 |
//! | `RateLimited` | 429 |
//! | `Internal` | 500 |
//! | `External` | 502 |
//! | `Unavailable` | 503 |
//! | `Timeout` | 504 |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`RpcError`].
pub type RpcResult<T> = Result<T, RpcError>;

/// Categories used to classify handler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid input.
    Validation,
    /// Missing or invalid credentials.
    Authentication,
    /// Permission denied.
    Authorization,
    /// Resource not found.
    NotFound,
    /// Conflicting state, e.g. a duplicate key.
    Conflict,
    /// Too many requests.
    RateLimited,
    /// Unclassified failure.
    Internal,
    /// A downstream dependency failed.
    External,
    /// The service is temporarily unavailable.
    Unavailable,
    /// The operation ran out of time.
    Timeout,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::External => StatusCode::BAD_GATEWAY,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Picks the closest category for an arbitrary status.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Authentication,
            StatusCode::FORBIDDEN => Self::Authorization,
            StatusCode::NOT_FOUND | StatusCode::GONE => Self::NotFound,
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Self::Conflict,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            StatusCode::BAD_GATEWAY => Self::External,
            StatusCode::SERVICE_UNAVAILABLE => Self::Unavailable,
            StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => Self::Timeout,
            s if s.is_client_error() => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Error returned by a service handler.
///
/// # Example
///
/// ```
/// use hermes_core::{ErrorCategory, RpcError};
/// use http::StatusCode;
///
/// fn find_game(id: &str) -> Result<(), RpcError> {
///     Err(RpcError::not_found(format!("game '{id}' does not exist")))
/// }
///
/// let err = find_game("abc").unwrap_err();
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// assert!(err.is_classified());
/// assert_eq!(err.message(), "game 'abc' does not exist");
/// ```
#[derive(Error, Debug)]
pub enum RpcError {
    /// Invalid input.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// Missing or invalid credentials.
    #[error("Authentication error: {message}")]
    Authentication {
        /// Human-readable error message.
        message: String,
    },

    /// Permission denied.
    #[error("Authorization denied: {message}")]
    Authorization {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// Conflicting state.
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message.
        message: String,
    },

    /// Too many requests.
    #[error("Rate limited: {message}")]
    RateLimited {
        /// Human-readable error message.
        message: String,
    },

    /// A downstream dependency failed.
    #[error("External service error: {message}")]
    External {
        /// Human-readable error message.
        message: String,
    },

    /// Temporarily unavailable.
    #[error("Unavailable: {message}")]
    Unavailable {
        /// Human-readable error message.
        message: String,
    },

    /// The operation ran out of time or was cancelled.
    #[error("Timeout: {message}")]
    Timeout {
        /// Human-readable error message.
        message: String,
    },

    /// An explicit status chosen by the handler.
    #[error("{status}: {message}")]
    Status {
        /// Status to answer with.
        status: StatusCode,
        /// Human-readable error message.
        message: String,
    },

    /// Unclassified failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl RpcError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates an authorization error.
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an external service error.
    #[must_use]
    pub fn external(message: impl Into<String>) -> Self {
        Self::External {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates an error answered with an explicit status.
    ///
    /// Success statuses are coerced to 500 since they cannot describe a failure.
    #[must_use]
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates an unclassified internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Authentication { .. } => ErrorCategory::Authentication,
            Self::Authorization { .. } => ErrorCategory::Authorization,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::RateLimited { .. } => ErrorCategory::RateLimited,
            Self::External { .. } => ErrorCategory::External,
            Self::Unavailable { .. } => ErrorCategory::Unavailable,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Status { status, .. } => ErrorCategory::from_status(*status),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Status { status, .. } => *status,
            other => other.category().default_status_code(),
        }
    }

    /// Returns true unless this is an unclassified internal error.
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        !matches!(self, Self::Internal { .. })
    }

    /// Returns the human-readable message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::Authentication { message }
            | Self::Authorization { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::RateLimited { message }
            | Self::External { message }
            | Self::Unavailable { message }
            | Self::Timeout { message }
            | Self::Status { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "VALIDATION_ERROR",
            ErrorCategory::Authentication => "AUTHENTICATION_ERROR",
            ErrorCategory::Authorization => "AUTHORIZATION_DENIED",
            ErrorCategory::NotFound => "NOT_FOUND",
            ErrorCategory::Conflict => "CONFLICT",
            ErrorCategory::RateLimited => "RATE_LIMITED",
            ErrorCategory::Internal => "INTERNAL_ERROR",
            ErrorCategory::External => "EXTERNAL_SERVICE_ERROR",
            ErrorCategory::Unavailable => "UNAVAILABLE",
            ErrorCategory::Timeout => "TIMEOUT",
        }
    }

    /// Converts this error to the body written on the wire.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.message()).with_code(self.error_code())
    }
}

impl From<anyhow::Error> for RpcError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Error body written to clients.
///
/// Serializes as `{"message": "...", "code": "..."}`; `code` is omitted
/// when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Creates a body with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Sets the machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}
