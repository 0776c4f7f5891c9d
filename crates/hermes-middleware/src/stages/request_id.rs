//! Request ID middleware.
//!
//! Assigns every request a [`RequestId`] and echoes it back in the
//! `x-request-id` response header. Incoming IDs are only honoured when the
//! middleware is told to trust them; otherwise a fresh UUID v7 is used.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use hermes_core::RequestId;
use http::HeaderValue;

/// The header name for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that generates or propagates request IDs.
///
/// ```
/// use hermes_middleware::stages::RequestIdMiddleware;
/// use hermes_middleware::Middleware;
///
/// let edge = RequestIdMiddleware::new();
/// let internal = RequestIdMiddleware::trust_incoming();
/// assert_eq!(edge.name(), internal.name());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware {
    trust_incoming: bool,
}

impl RequestIdMiddleware {
    /// Always generates a new ID.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a valid incoming `x-request-id` when present.
    #[must_use]
    pub const fn trust_incoming() -> Self {
        Self {
            trust_incoming: true,
        }
    }

    fn incoming_id(&self, request: &Request) -> Option<RequestId> {
        if !self.trust_incoming {
            return None;
        }
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.parse().ok())
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = self.incoming_id(&request).unwrap_or_else(RequestId::new);
            ctx.set_request_id(request_id);

            let mut response = next.run(ctx, request).await;

            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            response
        })
    }
}
