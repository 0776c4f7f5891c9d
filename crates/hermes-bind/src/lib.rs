//! # Hermes Bind
//!
//! Populates a typed request value from three sources, in precedence order:
//!
//! ```text
//!   path captures   /game/:ID            -> top-level fields, never overridden
//!   query string    ?p.limit=42&flag=1   -> dotted, case-insensitive addresses
//!   JSON body       {"id": "..", ...}    -> structural baseline, applied first
//! ```
//!
//! Destinations implement [`Bindable`], normally via `#[derive(Bindable)]`,
//! which flattens the value into a [`FieldTable`] of settable [`Coerce`]
//! leaves. The [`Binder`] then offers each path and query pair to the table.
//!
//! ## Example
//!
//! ```rust
//! use hermes_bind::{Bindable, Binder};
//! use hermes_router::Params;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize, Bindable)]
//! #[serde(default)]
//! struct Page {
//!     limit: u32,
//!     offset: u32,
//! }
//!
//! #[derive(Debug, Default, Deserialize, Bindable)]
//! #[serde(default)]
//! struct ListGames {
//!     owner: String,
//!     p: Page,
//! }
//!
//! let req: ListGames = Binder::new()
//!     .bind_new(&Params::new(), "owner=ada&P.Limit=10&p.offset=nope", b"")
//!     .unwrap();
//!
//! assert_eq!(req.owner, "ada");
//! assert_eq!(req.p.limit, 10);
//! assert_eq!(req.p.offset, 0);
//! ```
//!
//! ## Derive attributes
//!
//! The derive reads serde's `rename`, `rename_all`, `skip`,
//! `skip_deserializing` and `flatten`. It also accepts:
//!
//! - `#[bind(skip)]` on a field that is not itself `Bindable`
//! - `#[bind(crate = "path")]` on the container when this crate is reached
//!   through a re-export (e.g. `#[bind(crate = "hermes::bind")]`)

#![doc(html_root_url = "https://docs.rs/hermes-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate self as hermes_bind;

mod bindable;
mod binder;
mod coerce;
mod error;
mod table;

pub use bindable::Bindable;
pub use binder::{Binder, DEFAULT_MAX_BODY_SIZE};
pub use coerce::{parse_bool, Coerce};
pub use error::{BindError, BindErrorKind, BindSource, CoerceError};
pub use table::{Assignment, FieldPath, FieldTable};

/// Derives [`Bindable`] for a struct from its serde field names.
pub use hermes_macros::Bindable;
