//! Middleware context.
//!
//! The [`MiddlewareContext`] carries per-request state through the chain.
//! When dispatch reaches the handler it is turned into the immutable
//! [`RequestContext`] the handler sees.

use hermes_core::{CancellationToken, RequestContext, RequestId};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// State that flows through the middleware chain.
///
/// # Example
///
/// ```
/// use hermes_middleware::MiddlewareContext;
///
/// #[derive(Clone)]
/// struct Tenant(&'static str);
///
/// let mut ctx = MiddlewareContext::new();
/// ctx.set_extension(Tenant("acme"));
/// assert_eq!(ctx.get_extension::<Tenant>().map(|t| t.0), Some("acme"));
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    request_id: RequestId,
    cancellation: CancellationToken,
    started_at: Instant,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates a context with a fresh request ID and cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            cancellation: CancellationToken::new(),
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Sets the request ID.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns the token cancelled when the request is abandoned.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Replaces the cancellation token.
    ///
    /// The serve loop uses this to tie the token to the connection.
    pub fn set_cancellation_token(&mut self, token: CancellationToken) {
        self.cancellation = token;
    }

    /// When the request entered the chain.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time since the request entered the chain.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value, replacing any previous one.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Builds the handler's context for `service`/`operation`.
    ///
    /// The handler context shares this context's cancellation token.
    #[must_use]
    pub fn to_request_context(&self, service: &str, operation: &str) -> RequestContext {
        RequestContext::with_request_id(self.request_id)
            .with_operation(service, operation)
            .with_cancellation(self.cancellation.clone())
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions() {
        #[derive(Debug, PartialEq)]
        struct Attempt(u32);

        let mut ctx = MiddlewareContext::new();
        assert!(ctx.get_extension::<Attempt>().is_none());

        ctx.set_extension(Attempt(1));
        ctx.set_extension(Attempt(2));
        assert_eq!(ctx.get_extension::<Attempt>(), Some(&Attempt(2)));

        assert_eq!(ctx.remove_extension::<Attempt>(), Some(Attempt(2)));
        assert!(ctx.get_extension::<Attempt>().is_none());
    }

    #[test]
    fn test_request_context_shares_token() {
        let ctx = MiddlewareContext::new();
        let req_ctx = ctx.to_request_context("GameService", "GetByID");

        assert_eq!(req_ctx.request_id(), ctx.request_id());
        assert_eq!(req_ctx.service_name(), Some("GameService"));

        ctx.cancellation_token().cancel();
        assert!(req_ctx.is_cancelled());
    }

    #[test]
    fn test_set_request_id() {
        let mut ctx = MiddlewareContext::new();
        let id = RequestId::new();
        ctx.set_request_id(id);
        assert_eq!(ctx.request_id(), id);
    }
}
