//! Ordered route table.
//!
//! Routes are kept in registration order and resolved with a linear scan.
//! The first route whose method and pattern both match wins, so when two
//! patterns overlap (`/game/:ID` and `/game/latest`) the one registered
//! earlier takes the request.

use http::Method;

use crate::pattern::{PathPattern, PatternError};
use crate::RouteMatch;

/// A single registered route.
#[derive(Debug, Clone)]
pub struct Route<T> {
    method: Method,
    pattern: PathPattern,
    value: T,
}

impl<T> Route<T> {
    /// The HTTP method this route answers.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The compiled path pattern.
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The value stored with the route.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Routes in registration order.
///
/// # Example
///
/// ```rust
/// use hermes_router::RouteTable;
/// use http::Method;
///
/// let mut table = RouteTable::new();
/// table.insert(Method::GET, "/game/:ID", "GetByID").unwrap();
/// table.insert(Method::POST, "/game", "Register").unwrap();
///
/// let found = table.resolve(&Method::GET, "/game/42").unwrap();
/// assert_eq!(*found.value, "GetByID");
/// assert_eq!(found.params.get("ID"), Some("42"));
///
/// assert!(table.resolve(&Method::DELETE, "/game/42").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<T> {
    routes: Vec<Route<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Compiles `pattern` and appends a route.
    pub fn insert(&mut self, method: Method, pattern: &str, value: T) -> Result<(), PatternError> {
        let pattern = PathPattern::compile(pattern)?;
        self.insert_compiled(method, pattern, value);
        Ok(())
    }

    /// Appends a route with an already compiled pattern.
    pub fn insert_compiled(&mut self, method: Method, pattern: PathPattern, value: T) {
        self.routes.push(Route {
            method,
            pattern,
            value,
        });
    }

    /// Finds the first route matching `method` and `path`.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route
                    .pattern
                    .matches(path)
                    .map(|params| RouteMatch::new(&route.value, params))
            })
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route<T>> {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_method_and_path() {
        let mut table = RouteTable::new();
        table.insert(Method::GET, "/game/:ID", 1).unwrap();
        table.insert(Method::POST, "/game", 2).unwrap();

        assert_eq!(*table.resolve(&Method::GET, "/game/x").unwrap().value, 1);
        assert_eq!(*table.resolve(&Method::POST, "/game").unwrap().value, 2);
        assert!(table.resolve(&Method::GET, "/game").is_none());
        assert!(table.resolve(&Method::PUT, "/game/x").is_none());
        assert!(table.resolve(&Method::GET, "/nothing").is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let mut table = RouteTable::new();
        table.insert(Method::GET, "/game/:ID", "by-id").unwrap();
        table.insert(Method::GET, "/game/latest", "latest").unwrap();

        let found = table.resolve(&Method::GET, "/game/latest").unwrap();
        assert_eq!(*found.value, "by-id");
        assert_eq!(found.params.get("ID"), Some("latest"));
    }

    #[test]
    fn test_literal_first_when_registered_first() {
        let mut table = RouteTable::new();
        table.insert(Method::GET, "/game/latest", "latest").unwrap();
        table.insert(Method::GET, "/game/:ID", "by-id").unwrap();

        assert_eq!(*table.resolve(&Method::GET, "/game/latest").unwrap().value, "latest");
        assert_eq!(*table.resolve(&Method::GET, "/game/7").unwrap().value, "by-id");
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let mut table: RouteTable<()> = RouteTable::new();
        assert!(table.insert(Method::GET, "no-slash", ()).is_err());
        assert!(table.is_empty());
    }
}
