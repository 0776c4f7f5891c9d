//! Core middleware trait and types.
//!
//! A [`Middleware`] wraps everything after it in the chain. It receives the
//! request together with a [`Next`] and decides whether to call it: calling
//! `next.run` passes the request inward, returning without calling it
//! short-circuits the chain with a response of its own.
//!
//! # Example
//!
//! ```
//! use hermes_middleware::{BoxFuture, Middleware, MiddlewareContext, Next, Request, Response};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut MiddlewareContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let response = next.run(ctx, request).await;
//!             tracing::debug!(elapsed_ms = ctx.elapsed().as_millis() as u64, "done");
//!             response
//!         })
//!     }
//! }
//! ```

use crate::context::MiddlewareContext;
use crate::types::{Request, Response};
use std::future::Future;
use std::pin::Pin;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A request-wrapping stage.
///
/// # Invariants
///
/// - `next.run()` is called at most once; not calling it short-circuits
/// - the response of `next.run()` is returned or replaced, never dropped
///   without a response in its place
pub trait Middleware: Send + Sync + 'static {
    /// Stage name for logs.
    fn name(&self) -> &'static str;

    /// Processes the request, optionally delegating to `next`.
    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// The innermost link of a chain when it borrows shared state.
///
/// Unlike a [`Next::handler`] closure, the future may borrow from `self`
/// for as long as the context borrow lasts.
pub trait Dispatch: Send + Sync {
    /// Produces the response for a request that made it through the chain.
    fn dispatch<'c>(
        &'c self,
        ctx: &'c mut MiddlewareContext,
        request: Request,
    ) -> BoxFuture<'c, Response>;
}

type Handler<'a> =
    Box<dyn FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a>;

/// The rest of the chain, as seen from one middleware.
///
/// Consumed by [`run`](Self::run), so it can only be invoked once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

// Every variant stays covariant in 'a so a link can be shortened to the
// context borrow of the stage that runs it.
enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Dispatch(&'a dyn Dispatch),
    Handler(Handler<'a>),
}

impl<'a> Next<'a> {
    /// Wraps `next` in `middleware`.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// The innermost link as a closure.
    ///
    /// The returned future may not borrow the context; copy what is needed
    /// out of it first.
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// The innermost link as a borrowed [`Dispatch`] target.
    pub fn dispatch(target: &'a dyn Dispatch) -> Self {
        Self {
            inner: NextInner::Dispatch(target),
        }
    }

    /// Runs the rest of the chain.
    ///
    /// Only borrows `ctx` until the returned future completes, so the caller
    /// can keep using the context afterwards.
    pub fn run<'c>(self, ctx: &'c mut MiddlewareContext, request: Request) -> BoxFuture<'c, Response>
    where
        'a: 'c,
    {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next),
            NextInner::Dispatch(target) => target.dispatch(ctx, request),
            NextInner::Handler(handler) => handler(ctx, request),
        }
    }
}

/// A middleware built from a closure.
///
/// ```
/// use hermes_middleware::{FnMiddleware, Middleware};
///
/// let tag = FnMiddleware::new("tag", |ctx, request, next| {
///     Box::pin(async move {
///         let mut response = next.run(ctx, request).await;
///         response
///             .headers_mut()
///             .insert("x-served-by", http::HeaderValue::from_static("hermes"));
///         response
///     })
/// });
/// assert_eq!(tag.name(), "tag");
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut MiddlewareContext, Request, Next<'a>) -> BoxFuture<'a, Response>
        + Send
        + Sync
        + 'static,
{
    /// Creates a named middleware from `func`.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut MiddlewareContext, Request, Next<'a>) -> BoxFuture<'a, Response>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        (self.func)(ctx, request, next)
    }
}
