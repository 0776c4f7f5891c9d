//! Path matching for Hermes gateways.
//!
//! This crate compiles endpoint path patterns with named captures and
//! resolves request paths against an ordered table of routes.
//!
//! # Features
//!
//! - **Named captures**: `/game/:ID` or `/game/{ID}`, one segment each
//! - **Exact matching**: literal segments compare verbatim and the segment
//!   count must agree
//! - **Deterministic ties**: the first registered route wins
//! - **Decoded values**: captured segments are percent-decoded
//!
//! # Example
//!
//! ```rust
//! use hermes_router::RouteTable;
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.insert(Method::GET, "/v2/game/:ID", "GameService.GetByID").unwrap();
//!
//! let found = table.resolve(&Method::GET, "/v2/game/abcdef").unwrap();
//! assert_eq!(*found.value, "GameService.GetByID");
//! assert_eq!(found.params.get("ID"), Some("abcdef"));
//! ```
//!
//! # Resolution
//!
//! ```text
//!   GET /v2/game/abcdef
//!          │
//!          ▼
//!   ┌──────────────────────────────┐
//!   │ route 0  POST /v2/game        │  method differs, skip
//!   │ route 1  GET  /v2/game/:ID    │  match → {ID: "abcdef"}
//!   │ route 2  GET  /v2/game/latest │  never reached
//!   └──────────────────────────────┘
//! ```

mod params;
mod pattern;
mod table;

pub use params::Params;
pub use pattern::{PathPattern, PatternError, Segment};
pub use table::{Route, RouteTable};

/// A resolved route and the captures taken from the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered with the route.
    pub value: &'a T,
    /// Decoded path captures.
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a route match.
    #[must_use]
    pub fn new(value: &'a T, params: Params) -> Self {
        Self { value, params }
    }
}
