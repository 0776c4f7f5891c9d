//! Procedural macros for Hermes.
//!
//! `#[derive(Bindable)]` generates the field descriptor the binder uses to
//! populate a request type. It walks named fields and registers each under
//! its serde name, so the struct binds from the query string under the same
//! names it deserializes from JSON.
//!
//! Use it through `hermes_bind::Bindable` (or `hermes::Bindable`), not from
//! this crate directly.

mod bindable;
mod parse;

use proc_macro::TokenStream;

/// Derives `hermes_bind::Bindable`.
///
/// Supported shapes:
///
/// - structs with named fields, each of which must be `Bindable`
/// - single-field tuple structs, which bind like their inner value
/// - unit structs, which have no fields
///
/// # Attributes
///
/// Read from serde: `rename`, `rename_all`, `skip`, `skip_deserializing`,
/// `flatten`. Own attributes:
///
/// - `#[bind(skip)]` / `#[bind(rename = "...")]` on fields
/// - `#[bind(crate = "...")]` on the container
///
/// # Optional nested structs
///
/// `Option<T>` is a leaf: it binds only when `T` is a scalar such as a
/// number, `bool`, `String` or `char`. An `Option` of a nested struct has no
/// addresses to offer, so the derive rejects it as not `Bindable`. Either
/// make the field a plain struct with `#[serde(default)]`, or mark it
/// `#[bind(skip)]`, in which case it is still filled from the JSON body.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default, Deserialize, Bindable)]
/// #[serde(default)]
/// struct Request {
///     #[serde(rename = "id")]
///     id: String,
///     #[serde(rename = "p")]
///     page: Page,
/// }
/// ```
///
/// # Generated Code
///
/// ```rust,ignore
/// impl ::hermes_bind::Bindable for Request {
///     fn describe<'__bind>(&'__bind mut self, path: &FieldPath, table: &mut FieldTable<'__bind>) {
///         let Self { id, page, .. } = self;
///         ::hermes_bind::Bindable::describe(id, &path.child("id"), table);
///         ::hermes_bind::Bindable::describe(page, &path.child("p"), table);
///     }
/// }
/// ```
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    bindable::expand_bindable(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
