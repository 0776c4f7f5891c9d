//! Ordered middleware chain.
//!
//! Middleware wraps dispatch in the order it was supplied: the first one is
//! the outermost, so it runs first on the way in and last on the way out.
//!
//! ```text
//!   [A, B]:  A-before -> B-before -> dispatch -> B-after -> A-after
//! ```

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use crate::types::{Request, Response};
use std::sync::Arc;

/// A shareable, type-erased middleware.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered, fixed list of middleware.
///
/// # Example
///
/// ```
/// use hermes_middleware::stages::{AccessLog, RequestIdMiddleware};
/// use hermes_middleware::Chain;
///
/// let chain = Chain::builder()
///     .with(RequestIdMiddleware::new())
///     .with(AccessLog::new())
///     .build();
///
/// assert_eq!(chain.names(), ["request_id", "access_log"]);
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    stages: Vec<BoxedMiddleware>,
}

impl Chain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// Creates a chain from already boxed middleware, outermost first.
    #[must_use]
    pub fn from_stages(stages: Vec<BoxedMiddleware>) -> Self {
        Self { stages }
    }

    /// Runs `request` through every stage and then `terminal`.
    pub async fn process<'a>(
        &'a self,
        ctx: &mut MiddlewareContext,
        request: Request,
        terminal: Next<'a>,
    ) -> Response {
        let mut next = terminal;
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next.run(ctx, request).await
    }

    /// Stage names, outermost first.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("stages", &self.names())
            .finish()
    }
}

/// Builder for [`Chain`].
#[derive(Default)]
pub struct ChainBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl ChainBuilder {
    /// Appends a stage inside the ones added so far.
    #[must_use]
    pub fn with<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared stage.
    #[must_use]
    pub fn with_boxed(mut self, middleware: BoxedMiddleware) -> Self {
        self.stages.push(middleware);
        self
    }

    /// Builds the chain.
    #[must_use]
    pub fn build(self) -> Chain {
        Chain {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResponseExt;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;

    #[tokio::test]
    async fn test_empty_chain_runs_dispatch() {
        let chain = Chain::new();
        assert!(chain.is_empty());

        let mut ctx = MiddlewareContext::new();
        let response = chain
            .process(
                &mut ctx,
                http::Request::new(Full::new(Bytes::new())),
                Next::handler(|_ctx, _req| {
                    Box::pin(async { Response::text(StatusCode::ACCEPTED, "ok") })
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_names_keep_order() {
        let noop = |name| {
            crate::FnMiddleware::new(name, |ctx, req, next| next.run(ctx, req))
        };
        let chain = Chain::builder().with(noop("a")).with(noop("b")).build();
        assert_eq!(chain.names(), ["a", "b"]);
        assert_eq!(chain.len(), 2);
        assert_eq!(format!("{chain:?}"), r#"Chain { stages: ["a", "b"] }"#);
    }
}
