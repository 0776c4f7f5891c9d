//! HTTP types used throughout the middleware chain.

use bytes::Bytes;
use hermes_core::ErrorBody;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;

/// The HTTP request type seen by middleware.
///
/// The body is already collected.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by middleware and the gateway.
pub type Response = http::Response<Full<Bytes>>;

/// Content type of every JSON body the gateway writes.
pub const APPLICATION_JSON: &str = "application/json";

/// Content type of plain-text fallback bodies.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// The endpoint that produced a response.
///
/// The gateway stores this in the response extensions after routing, so
/// middleware running after dispatch can label logs and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOperation {
    /// Service that owns the operation.
    pub service: String,
    /// Operation name.
    pub operation: String,
}

/// Response constructors that cannot fail.
pub trait ResponseExt {
    /// A plain-text response.
    fn text(status: StatusCode, message: impl Into<String>) -> Response;

    /// A JSON response from already-encoded bytes.
    fn json(status: StatusCode, body: impl Into<Bytes>) -> Response;

    /// A JSON error response carrying an [`ErrorBody`].
    fn json_error(status: StatusCode, body: &ErrorBody) -> Response;

    /// The operation recorded by the gateway, if routing succeeded.
    fn resolved_operation(&self) -> Option<&ResolvedOperation>;
}

impl ResponseExt for Response {
    fn text(status: StatusCode, message: impl Into<String>) -> Response {
        with_content_type(status, TEXT_PLAIN, Bytes::from(message.into()))
    }

    fn json(status: StatusCode, body: impl Into<Bytes>) -> Response {
        with_content_type(status, APPLICATION_JSON, body.into())
    }

    fn json_error(status: StatusCode, body: &ErrorBody) -> Response {
        match serde_json::to_vec(body) {
            Ok(bytes) => Self::json(status, bytes),
            Err(err) => {
                tracing::error!(error = %err, "failed to encode error body");
                Self::text(status, body.message.clone())
            }
        }
    }

    fn resolved_operation(&self) -> Option<&ResolvedOperation> {
        self.extensions().get::<ResolvedOperation>()
    }
}

fn with_content_type(status: StatusCode, content_type: &'static str, body: Bytes) -> Response {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_text_response() {
        let response = Response::text(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_string(response).await, "boom");
    }

    #[tokio::test]
    async fn test_json_error_response() {
        let body = ErrorBody::new("no game 'x'").with_code("NOT_FOUND");
        let response = Response::json_error(StatusCode::NOT_FOUND, &body);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            body_string(response).await,
            r#"{"message":"no game 'x'","code":"NOT_FOUND"}"#
        );
    }

    #[test]
    fn test_resolved_operation_extension() {
        let mut response = Response::json(StatusCode::OK, "{}");
        assert!(response.resolved_operation().is_none());

        response.extensions_mut().insert(ResolvedOperation {
            service: "GameService".into(),
            operation: "GetByID".into(),
        });
        assert_eq!(
            response.resolved_operation().map(|op| op.operation.as_str()),
            Some("GetByID")
        );
    }
}
