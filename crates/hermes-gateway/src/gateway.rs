//! The gateway: registry, binder, responder and middleware in one place.
//!
//! Each request walks a fixed state machine:
//!
//! ```text
//!   Received ──► Matched ──► Bound ──► Invoked ──► Responded
//!       │           │                     │
//!       ▼           ▼                     ▼
//!   Unmatched    BindFailed      error / panic / deadline
//!     (404)      (400, 413)        (mapped status)
//! ```
//!
//! Every branch ends in a response. Handler panics are caught at a single
//! point around the handler call and answered with a 500.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use bytes::Bytes;
use futures_util::FutureExt;
use hermes_bind::Binder;
use hermes_core::{CancellationToken, RequestContext};
use hermes_middleware::{
    BoxFuture, Chain, ChainBuilder, Dispatch, Middleware, MiddlewareContext, Next, Request,
    ResolvedOperation, Response,
};
use hermes_router::RouteMatch;
use hermes_telemetry::{record_handler_fault, record_request, InFlightGuard};
use http_body_util::BodyExt;

use crate::config::GatewayConfig;
use crate::endpoint::{Endpoint, RawInput};
use crate::error::{DispatchError, GatewayError};
use crate::registry::Registry;
use crate::responder::Responder;

/// Service name used when none is configured.
pub const DEFAULT_GATEWAY_NAME: &str = "hermes";

/// The single HTTP entry point for a set of endpoints.
///
/// Endpoints are registered during startup; the first dispatched request
/// closes registration. Dispatch itself only reads shared state, so one
/// gateway serves any number of concurrent requests.
///
/// ```rust,ignore
/// use hermes_gateway::{Endpoint, Gateway};
/// use hermes_middleware::stages::AccessLog;
///
/// let mut gateway = Gateway::builder()
///     .name("GameService")
///     .path_prefix("/v2")
///     .middleware(AccessLog::new())
///     .build();
///
/// gateway.register(Endpoint::new(Method::GET, "/game/:ID", "GameService", "GetByID", get_by_id))?;
/// gateway.serve("0.0.0.0:9001").await?;
/// ```
#[derive(Debug)]
pub struct Gateway {
    name: String,
    config: GatewayConfig,
    registry: Registry,
    binder: Binder,
    chain: Chain,
    sealed: AtomicBool,
}

impl Gateway {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// Creates a gateway with default settings and no middleware.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }

    /// Service name used in logs and metrics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Construction settings.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The endpoint registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The middleware chain.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Adds an endpoint.
    ///
    /// # Errors
    ///
    /// [`GatewayError::RegistrationClosed`] once the gateway has dispatched
    /// a request or started serving, and [`GatewayError::InvalidPath`] if
    /// the path does not compile.
    pub fn register(&mut self, endpoint: Endpoint) -> Result<(), GatewayError> {
        if self.sealed.load(Ordering::Acquire) {
            return Err(GatewayError::RegistrationClosed);
        }
        self.registry.register(endpoint)
    }

    /// Adds several endpoints in order.
    pub fn register_all(
        &mut self,
        endpoints: impl IntoIterator<Item = Endpoint>,
    ) -> Result<(), GatewayError> {
        endpoints
            .into_iter()
            .try_for_each(|endpoint| self.register(endpoint))
    }

    pub(crate) fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    /// Answers one request.
    ///
    /// Never fails: every outcome, including handler panics, becomes a
    /// response.
    pub async fn handle(&self, request: Request) -> Response {
        self.handle_cancellable(request, CancellationToken::new())
            .await
    }

    /// Answers one request whose abandonment cancels `token`.
    ///
    /// Handlers observe `token` through their [`RequestContext`].
    pub async fn handle_cancellable(&self, request: Request, token: CancellationToken) -> Response {
        self.seal();

        let mut ctx = MiddlewareContext::new();
        ctx.set_cancellation_token(token);

        let routing = Routing(self);
        self.chain
            .process(&mut ctx, request, Next::dispatch(&routing))
            .await
    }

    fn route<'a>(&'a self, ctx: &MiddlewareContext, request: Request) -> BoxFuture<'a, Response> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        match self.registry.resolve(&method, &path) {
            Some(route) => {
                let endpoint = route.value;
                let mut rctx =
                    ctx.to_request_context(endpoint.service_name(), endpoint.operation_name());
                if let Some(timeout) = self.config.request_timeout() {
                    rctx = rctx.with_timeout(timeout);
                }
                Box::pin(self.dispatch(route, rctx, request))
            }
            None => {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    http.method = %method,
                    http.path = %path,
                    "no endpoint matched"
                );
                let err = DispatchError::RouteNotFound { method, path };
                Box::pin(std::future::ready(Responder::failure(&err)))
            }
        }
    }

    async fn dispatch(
        &self,
        route: RouteMatch<'_, Endpoint>,
        ctx: RequestContext,
        request: Request,
    ) -> Response {
        let _in_flight = InFlightGuard::new();
        let started = Instant::now();
        let endpoint = route.value;

        let (parts, body) = request.into_parts();
        let body = body
            .collect()
            .await
            .map(http_body_util::Collected::to_bytes)
            .unwrap_or_default();
        let input = RawInput {
            captures: &route.params,
            query: parts.uri.query().unwrap_or_default(),
            body: &body,
        };

        let outcome = self.invoke(endpoint, &ctx, input).await;
        if let Err(err) = &outcome {
            log_failure(&ctx, err);
        }

        let mut response = Responder::reply(endpoint.success_status(), outcome);
        record_request(
            endpoint.service_name(),
            endpoint.operation_name(),
            response.status().as_u16(),
            started.elapsed(),
        );
        response.extensions_mut().insert(ResolvedOperation {
            service: endpoint.service_name().to_string(),
            operation: endpoint.operation_name().to_string(),
        });
        response
    }

    /// Binds the request and runs the handler under panic recovery and the
    /// request deadline.
    async fn invoke(
        &self,
        endpoint: &Endpoint,
        ctx: &RequestContext,
        input: RawInput<'_>,
    ) -> Result<Bytes, DispatchError> {
        let started = panic::catch_unwind(AssertUnwindSafe(|| {
            endpoint.invoke(ctx, &self.binder, input)
        }));

        let running = match started {
            Ok(Ok(running)) => running,
            Ok(Err(bind_error)) => return Err(bind_error.into()),
            Err(payload) => return Err(self.fault(endpoint, payload.as_ref())),
        };

        let mut guarded = std::pin::pin!(AssertUnwindSafe(running).catch_unwind());

        let Some(remaining) = ctx.remaining() else {
            return guarded
                .await
                .unwrap_or_else(|payload| Err(self.fault(endpoint, payload.as_ref())));
        };

        match tokio::time::timeout(remaining, &mut guarded).await {
            Ok(finished) => {
                finished.unwrap_or_else(|payload| Err(self.fault(endpoint, payload.as_ref())))
            }
            Err(_) => {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    service = endpoint.service_name(),
                    operation = endpoint.operation_name(),
                    "deadline elapsed, cancelling handler"
                );
                ctx.cancellation_token().cancel();
                match guarded.await {
                    Ok(_) => Err(DispatchError::Timeout(remaining)),
                    Err(payload) => Err(self.fault(endpoint, payload.as_ref())),
                }
            }
        }
    }

    fn fault(&self, endpoint: &Endpoint, payload: &(dyn Any + Send)) -> DispatchError {
        record_handler_fault(endpoint.service_name(), endpoint.operation_name());
        DispatchError::Fault(panic_message(payload))
    }
}

/// Routing as the innermost link of the middleware chain.
struct Routing<'g>(&'g Gateway);

impl Dispatch for Routing<'_> {
    fn dispatch<'c>(
        &'c self,
        ctx: &'c mut MiddlewareContext,
        request: Request,
    ) -> BoxFuture<'c, Response> {
        self.0.route(ctx, request)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_failure(ctx: &RequestContext, err: &DispatchError) {
    let request_id = ctx.request_id();
    let service = ctx.service_name().unwrap_or_default();
    let operation = ctx.operation_name().unwrap_or_default();

    match err {
        DispatchError::Fault(message) => tracing::error!(
            %request_id, service, operation, error = %message,
            "handler panicked"
        ),
        DispatchError::Handler(rpc) if !rpc.is_classified() => tracing::error!(
            %request_id, service, operation, error = ?rpc,
            "handler failed"
        ),
        DispatchError::Serialization(source) => tracing::error!(
            %request_id, service, operation, error = %source,
            "response could not be encoded"
        ),
        DispatchError::Timeout(_) => tracing::warn!(
            %request_id, service, operation, error = %err,
            "handler timed out"
        ),
        other => tracing::debug!(
            %request_id, service, operation, error = %other,
            "request rejected"
        ),
    }
}

/// Builder for [`Gateway`].
///
/// Middleware runs in the order added: the first is outermost.
#[derive(Default)]
pub struct GatewayBuilder {
    name: Option<String>,
    config: Option<GatewayConfig>,
    path_prefix: Option<String>,
    chain: ChainBuilder,
}

impl GatewayBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the prefix prepended to every registered path.
    ///
    /// Takes precedence over the prefix in [`config`](Self::config).
    #[must_use]
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    /// Appends a middleware stage.
    #[must_use]
    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.chain = self.chain.with(middleware);
        self
    }

    /// Builds the gateway with an empty registry.
    #[must_use]
    pub fn build(self) -> Gateway {
        let mut config = self.config.unwrap_or_default();
        if let Some(prefix) = self.path_prefix {
            config = config.to_builder().path_prefix(prefix).build();
        }

        Gateway {
            name: self
                .name
                .unwrap_or_else(|| DEFAULT_GATEWAY_NAME.to_string()),
            registry: Registry::new(config.path_prefix()),
            binder: Binder::new().with_max_body_size(config.max_body_bytes()),
            chain: self.chain.build(),
            sealed: AtomicBool::new(false),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let payload: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(payload.as_ref()), "static str");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_builder_prefix_overrides_config() {
        let config = GatewayConfig::builder().path_prefix("/v1").build();
        let gateway = Gateway::builder()
            .name("GameService")
            .config(config)
            .path_prefix("/v2")
            .build();

        assert_eq!(gateway.name(), "GameService");
        assert_eq!(gateway.config().path_prefix(), "/v2");
        assert_eq!(gateway.registry().prefix(), "/v2");
    }

    #[test]
    fn test_default_name() {
        assert_eq!(Gateway::builder().build().name(), DEFAULT_GATEWAY_NAME);
    }
}
