//! Access log middleware.
//!
//! Emits one structured `tracing` event per request once the response is
//! known. Server errors log at `warn`, everything else at `info`.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response, ResponseExt};

/// Middleware that logs every request with its outcome.
///
/// Fields: `request_id`, `http.method`, `http.path`, `http.status_code`,
/// `duration_ms`, and `service`/`operation` when routing succeeded.
#[derive(Debug, Clone, Default)]
pub struct AccessLog {
    _private: (),
}

impl AccessLog {
    /// Creates the middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Middleware for AccessLog {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let method = request.method().clone();
            let path = request.uri().path().to_owned();

            let response = next.run(ctx, request).await;

            let status = response.status();
            let duration_ms = ctx.elapsed().as_secs_f64() * 1000.0;
            let (service, operation) = response
                .resolved_operation()
                .map_or(("", ""), |op| (op.service.as_str(), op.operation.as_str()));

            if status.is_server_error() {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    http.method = %method,
                    http.path = %path,
                    http.status_code = status.as_u16(),
                    duration_ms,
                    service,
                    operation,
                    "request failed"
                );
            } else {
                tracing::info!(
                    request_id = %ctx.request_id(),
                    http.method = %method,
                    http.path = %path,
                    http.status_code = status.as_u16(),
                    duration_ms,
                    service,
                    operation,
                    "request completed"
                );
            }

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResolvedOperation;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;

    #[tokio::test]
    async fn test_passes_response_through() {
        let mut ctx = MiddlewareContext::new();
        let request = http::Request::builder()
            .method("POST")
            .uri("/v2/game")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let next = Next::handler(|_ctx, _req| {
            Box::pin(async {
                let mut response = Response::json(StatusCode::CREATED, "{}");
                response.extensions_mut().insert(ResolvedOperation {
                    service: "GameService".into(),
                    operation: "Register".into(),
                });
                response
            })
        });

        let response = AccessLog::new().process(&mut ctx, request, next).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.resolved_operation().is_some());
    }
}
