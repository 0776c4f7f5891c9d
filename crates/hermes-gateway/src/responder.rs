//! Response encoding.
//!
//! Successful results become JSON bodies with the endpoint's success
//! status. Errors become `{"message", "code"}` bodies with a status derived
//! from the error. Encoding problems degrade to a fixed plain-text 500, so
//! every request gets an answer.

use bytes::Bytes;
use hermes_middleware::{Response, ResponseExt};
use http::StatusCode;
use serde::Serialize;

use crate::error::DispatchError;

/// Body of the last-resort response.
pub const FALLBACK_BODY: &str = "internal server error";

/// Turns dispatch outcomes into HTTP responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Responder;

impl Responder {
    /// Writes an already encoded result or an error.
    pub fn reply(status: StatusCode, outcome: Result<Bytes, DispatchError>) -> Response {
        match outcome {
            Ok(body) => Response::json(status, body),
            Err(err) => Self::failure(&err),
        }
    }

    /// Encodes `value` as JSON and writes it with `status`.
    pub fn success<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
        let encoded = serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(DispatchError::Serialization);
        Self::reply(status, encoded)
    }

    /// Writes the response for a failed request.
    pub fn failure(err: &DispatchError) -> Response {
        if matches!(err, DispatchError::Serialization(_)) {
            return Self::fallback();
        }
        Response::json_error(err.status_code(), &err.to_body())
    }

    /// The fixed plain-text 500.
    pub fn fallback() -> Response {
        Response::text(StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::RpcError;
    use http::header::CONTENT_TYPE;
    use http_body_util::BodyExt;
    use serde::ser::Error as _;

    async fn body(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to encode"))
        }
    }

    #[tokio::test]
    async fn test_success_uses_given_status() {
        let response = Responder::success(StatusCode::CREATED, &serde_json::json!({"id": "g1"}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body(response).await, r#"{"id":"g1"}"#);
    }

    #[tokio::test]
    async fn test_classified_error() {
        let err = DispatchError::from(RpcError::not_found("no game 'x'"));
        let response = Responder::failure(&err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body(response).await,
            r#"{"message":"no game 'x'","code":"NOT_FOUND"}"#
        );
    }

    #[tokio::test]
    async fn test_serialization_failure_falls_back_to_text() {
        let response = Responder::success(StatusCode::OK, &Unencodable);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body(response).await, FALLBACK_BODY);
    }
}
