//! Binding error types.
//!
//! Only the body can fail a bind. Path and query values that do not coerce
//! are skipped, so [`CoerceError`] never leaves the binder; it exists for
//! logging and for custom [`Coerce`](crate::Coerce) implementations.

use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindSource {
    /// Named path captures (e.g. `/game/:ID`).
    Path,
    /// Query string parameters.
    Query,
    /// JSON request body.
    Body,
}

impl fmt::Display for BindSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// The reason a bind was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindErrorKind {
    /// The body is not valid JSON for the destination shape.
    MalformedBody,
    /// The body exceeds the binder's size limit.
    PayloadTooLarge,
}

/// A request that cannot be bound.
///
/// # Example
///
/// ```rust
/// use hermes_bind::{BindError, BindSource};
/// use http::StatusCode;
///
/// let err = BindError::payload_too_large(1024, 4096);
/// assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
/// assert_eq!(err.location(), BindSource::Body);
/// assert!(err.to_string().contains("4096"));
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BindError {
    kind: BindErrorKind,
    location: BindSource,
    message: String,
    #[source]
    cause: Option<serde_json::Error>,
}

impl BindError {
    /// Creates an error for a body that does not deserialize.
    #[must_use]
    pub fn malformed_body(error: serde_json::Error) -> Self {
        Self {
            kind: BindErrorKind::MalformedBody,
            location: BindSource::Body,
            message: format!("malformed request body: {error}"),
            cause: Some(error),
        }
    }

    /// Creates an error for a body over the size limit.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            kind: BindErrorKind::PayloadTooLarge,
            location: BindSource::Body,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
            cause: None,
        }
    }

    /// Returns why the bind failed.
    #[must_use]
    pub const fn kind(&self) -> BindErrorKind {
        self.kind
    }

    /// Returns the source that was being read.
    #[must_use]
    pub const fn location(&self) -> BindSource {
        self.location
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.kind {
            BindErrorKind::MalformedBody => StatusCode::BAD_REQUEST,
            BindErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self.kind {
            BindErrorKind::MalformedBody => "MALFORMED_BODY",
            BindErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }
}

/// A textual value that could not be converted into its target field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot coerce '{value}' into {expected}")]
pub struct CoerceError {
    expected: &'static str,
    value: String,
}

impl CoerceError {
    /// Creates an error for `value`, which should have been an `expected`.
    #[must_use]
    pub fn new(expected: &'static str, value: impl Into<String>) -> Self {
        Self {
            expected,
            value: value.into(),
        }
    }

    /// Returns the name of the kind that was expected.
    #[must_use]
    pub const fn expected(&self) -> &'static str {
        self.expected
    }

    /// Returns the rejected text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_body_is_bad_request() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = BindError::malformed_body(json_err);
        assert_eq!(err.kind(), BindErrorKind::MalformedBody);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MALFORMED_BODY");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(BindSource::Path.to_string(), "path");
        assert_eq!(BindSource::Query.to_string(), "query");
        assert_eq!(BindSource::Body.to_string(), "body");
    }

    #[test]
    fn test_coerce_error_message() {
        let err = CoerceError::new("bool", "maybe");
        assert_eq!(err.to_string(), "cannot coerce 'maybe' into bool");
        assert_eq!(err.expected(), "bool");
        assert_eq!(err.value(), "maybe");
    }
}
