//! The endpoint registry.

use hermes_router::{PathPattern, RouteMatch, RouteTable};
use http::Method;

use crate::endpoint::Endpoint;
use crate::error::GatewayError;

/// Ordered collection of endpoints, looked up by method and path.
///
/// The path prefix is joined to each pattern at registration. When several
/// endpoints match a request, the one registered first wins.
#[derive(Debug, Default)]
pub struct Registry {
    prefix: String,
    routes: RouteTable<Endpoint>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: RouteTable::new(),
        }
    }

    /// The prefix joined to every registered path.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Adds an endpoint after those already registered.
    pub fn register(&mut self, endpoint: Endpoint) -> Result<(), GatewayError> {
        let pattern = PathPattern::compile(endpoint.path())
            .and_then(|pattern| pattern.with_prefix(&self.prefix))
            .map_err(|source| GatewayError::InvalidPath {
                operation: format!(
                    "{}.{}",
                    endpoint.service_name(),
                    endpoint.operation_name()
                ),
                source,
            })?;

        tracing::debug!(
            method = %endpoint.method(),
            path = %pattern,
            service = endpoint.service_name(),
            operation = endpoint.operation_name(),
            "endpoint registered"
        );

        self.routes
            .insert_compiled(endpoint.method().clone(), pattern, endpoint);
        Ok(())
    }

    /// Finds the endpoint for a request and its path captures.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, Endpoint>> {
        self.routes.resolve(method, path)
    }

    /// Registered endpoints in registration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.routes.iter().map(|route| route.value())
    }

    /// Number of registered endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
