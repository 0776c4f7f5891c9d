//! Endpoint records.
//!
//! An [`Endpoint`] pairs an HTTP method and path pattern with one typed
//! service operation. Construction erases the request and response types:
//! the endpoint knows how to bind its own request through a [`Binder`] and
//! how to encode its own response, so the gateway can dispatch any
//! endpoint without per-operation code.
//!
//! ```rust,ignore
//! use hermes_gateway::Endpoint;
//! use http::{Method, StatusCode};
//!
//! let get = Endpoint::new(Method::GET, "/game/:ID", "GameService", "GetByID", GetByID::new(repo.clone()));
//! let create = Endpoint::new(Method::POST, "/game", "GameService", "Register", Register::new(repo))
//!     .with_status(StatusCode::CREATED);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;
use hermes_bind::{BindError, Bindable, Binder};
use hermes_core::{Handler, RequestContext};
use hermes_middleware::BoxFuture;
use hermes_router::Params;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DispatchError;

/// Raw request inputs handed to the binder.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawInput<'r> {
    pub(crate) captures: &'r Params,
    pub(crate) query: &'r str,
    pub(crate) body: &'r [u8],
}

/// The future of a running handler, resolving to the encoded response.
pub(crate) type Invocation<'a> = BoxFuture<'a, Result<Bytes, DispatchError>>;

/// A type-erased operation.
pub(crate) trait Operation: Send + Sync + 'static {
    /// Binds the request and starts the handler.
    ///
    /// Binding runs synchronously; only the returned future suspends.
    fn invoke<'a>(
        &'a self,
        ctx: &'a RequestContext,
        binder: &Binder,
        input: RawInput<'_>,
    ) -> Result<Invocation<'a>, BindError>;
}

struct TypedOperation<H, Req, Res> {
    handler: H,
    _types: PhantomData<fn(Req) -> Res>,
}

impl<H, Req, Res> Operation for TypedOperation<H, Req, Res>
where
    H: Handler<Req, Res>,
    Req: Bindable + DeserializeOwned + Default + Send + 'static,
    Res: Serialize + Send + 'static,
{
    fn invoke<'a>(
        &'a self,
        ctx: &'a RequestContext,
        binder: &Binder,
        input: RawInput<'_>,
    ) -> Result<Invocation<'a>, BindError> {
        let request: Req = binder.bind_new(input.captures, input.query, input.body)?;
        let running = self.handler.handle(ctx, request);

        Ok(Box::pin(async move {
            let response = running.await?;
            serde_json::to_vec(&response)
                .map(Bytes::from)
                .map_err(DispatchError::Serialization)
        }))
    }
}

/// One registered operation.
///
/// Immutable once built; the gateway owns it after registration.
#[derive(Clone)]
pub struct Endpoint {
    method: Method,
    path: String,
    service_name: String,
    operation_name: String,
    success_status: StatusCode,
    operation: Arc<dyn Operation>,
}

impl Endpoint {
    /// Creates an endpoint for a typed handler.
    ///
    /// `Req` is bound from path captures, query string and JSON body; `Res`
    /// is written as JSON with the success status (200 unless changed with
    /// [`with_status`](Self::with_status)).
    pub fn new<H, Req, Res>(
        method: Method,
        path: impl Into<String>,
        service_name: impl Into<String>,
        operation_name: impl Into<String>,
        handler: H,
    ) -> Self
    where
        H: Handler<Req, Res>,
        Req: Bindable + DeserializeOwned + Default + Send + 'static,
        Res: Serialize + Send + 'static,
    {
        Self {
            method,
            path: path.into(),
            service_name: service_name.into(),
            operation_name: operation_name.into(),
            success_status: StatusCode::OK,
            operation: Arc::new(TypedOperation {
                handler,
                _types: PhantomData,
            }),
        }
    }

    /// Creates an endpoint at the default RPC route, `POST /{Service}.{Operation}`.
    ///
    /// Used for operations declared without an explicit HTTP binding.
    pub fn rpc<H, Req, Res>(
        service_name: impl Into<String>,
        operation_name: impl Into<String>,
        handler: H,
    ) -> Self
    where
        H: Handler<Req, Res>,
        Req: Bindable + DeserializeOwned + Default + Send + 'static,
        Res: Serialize + Send + 'static,
    {
        let service_name = service_name.into();
        let operation_name = operation_name.into();
        let path = format!("/{service_name}.{operation_name}");
        Self::new(Method::POST, path, service_name, operation_name, handler)
    }

    /// Sets the status written on success.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.success_status = status;
        self
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path pattern as given, without the gateway prefix.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Owning service.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Operation name.
    #[must_use]
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Status written on success.
    #[must_use]
    pub fn success_status(&self) -> StatusCode {
        self.success_status
    }

    pub(crate) fn invoke<'a>(
        &'a self,
        ctx: &'a RequestContext,
        binder: &Binder,
        input: RawInput<'_>,
    ) -> Result<Invocation<'a>, BindError> {
        self.operation.invoke(ctx, binder, input)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("service_name", &self.service_name)
            .field("operation_name", &self.operation_name)
            .field("success_status", &self.success_status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::{handler_fn, Empty, RpcError};

    fn ping() -> Endpoint {
        Endpoint::rpc(
            "Health",
            "Ping",
            handler_fn(|_ctx: &RequestContext, _req: Empty| async {
                Ok::<_, RpcError>("pong")
            }),
        )
    }

    #[test]
    fn test_rpc_route() {
        let endpoint = ping();
        assert_eq!(endpoint.method(), Method::POST);
        assert_eq!(endpoint.path(), "/Health.Ping");
        assert_eq!(endpoint.service_name(), "Health");
        assert_eq!(endpoint.operation_name(), "Ping");
        assert_eq!(endpoint.success_status(), StatusCode::OK);
    }

    #[test]
    fn test_with_status() {
        let endpoint = ping().with_status(StatusCode::CREATED);
        assert_eq!(endpoint.success_status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_invoke_encodes_response() {
        let endpoint = ping();
        let ctx = RequestContext::mock();
        let captures = Params::new();
        let input = RawInput {
            captures: &captures,
            query: "",
            body: b"",
        };

        let running = endpoint.invoke(&ctx, &Binder::new(), input).unwrap();
        assert_eq!(running.await.unwrap(), Bytes::from_static(b"\"pong\""));
    }

    #[test]
    fn test_invoke_rejects_malformed_body() {
        let endpoint = ping();
        let ctx = RequestContext::mock();
        let captures = Params::new();
        let input = RawInput {
            captures: &captures,
            query: "",
            body: b"{nope",
        };

        assert!(endpoint.invoke(&ctx, &Binder::new(), input).is_err());
    }
}
