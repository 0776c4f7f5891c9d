//! Handler trait for service operations.
//!
//! A [`Handler`] is one service method: it receives the bound request value
//! and returns either a response value or an [`RpcError`]. Binding and
//! encoding happen around it, in the gateway.

use crate::{RequestContext, RpcError};
use std::future::Future;
use std::marker::PhantomData;

/// A typed service operation.
///
/// # Example
///
/// ```rust,ignore
/// use hermes_core::{Handler, RequestContext, RpcError};
///
/// struct GetByID { repo: Repo }
///
/// impl Handler<GetByIDRequest, Game> for GetByID {
///     async fn handle(&self, _ctx: &RequestContext, req: GetByIDRequest) -> Result<Game, RpcError> {
///         self.repo
///             .get(&req.id)
///             .ok_or_else(|| RpcError::not_found(format!("no game '{}'", req.id)))
///     }
/// }
/// ```
pub trait Handler<Req, Res>: Send + Sync + 'static
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Runs the operation.
    ///
    /// Long-running work should watch [`RequestContext::cancelled`] and
    /// give up once the request is abandoned.
    fn handle(
        &self,
        ctx: &RequestContext,
        request: Req,
    ) -> impl Future<Output = Result<Res, RpcError>> + Send;
}

/// Adapts an async closure into a [`Handler`].
///
/// The closure receives the context by reference and must return a future
/// that does not borrow it; clone what you need first.
pub struct FnHandler<F, Req, Res, Fut> {
    func: F,
    _phantom: PhantomData<fn(Req) -> (Res, Fut)>,
}

impl<F, Req, Res, Fut> FnHandler<F, Req, Res, Fut>
where
    F: Fn(&RequestContext, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res, RpcError>> + Send + 'static,
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Wraps `func`.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, Req, Res, Fut> Handler<Req, Res> for FnHandler<F, Req, Res, Fut>
where
    F: Fn(&RequestContext, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res, RpcError>> + Send + 'static,
    Req: Send + 'static,
    Res: Send + 'static,
{
    fn handle(
        &self,
        ctx: &RequestContext,
        request: Req,
    ) -> impl Future<Output = Result<Res, RpcError>> + Send {
        (self.func)(ctx, request)
    }
}

/// Shorthand for [`FnHandler::new`].
///
/// ```
/// use hermes_core::{handler_fn, Handler, RequestContext, RpcError};
///
/// let echo = handler_fn(|_ctx: &RequestContext, name: String| async move {
///     Ok::<_, RpcError>(format!("hello {name}"))
/// });
///
/// let out = tokio_test::block_on(echo.handle(&RequestContext::mock(), "ada".into()));
/// assert_eq!(out.unwrap(), "hello ada");
/// ```
#[must_use]
pub const fn handler_fn<F, Req, Res, Fut>(func: F) -> FnHandler<F, Req, Res, Fut>
where
    F: Fn(&RequestContext, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res, RpcError>> + Send + 'static,
    Req: Send + 'static,
    Res: Send + 'static,
{
    FnHandler::new(func)
}

/// Request type for operations that take no input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Empty {}

/// Response type for operations that return no payload.
///
/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NoContent {}
