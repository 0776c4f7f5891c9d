//! The request binder.

use crate::table::Assignment;
use crate::{BindError, BindSource, Bindable, FieldPath, FieldTable};
use hermes_router::Params;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Default maximum body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Populates typed request values from path captures, query and body.
///
/// Sources are applied in this order:
///
/// 1. A non-blank body is deserialized as JSON and replaces the destination.
///    A body that does not parse fails the bind.
/// 2. Path captures set top-level fields by name.
/// 3. Query pairs set fields by dotted address, except fields already set
///    from the path.
///
/// Names match case-insensitively. Unknown names, values that do not
/// coerce and query pairs that are not valid UTF-8 once decoded are
/// skipped.
///
/// The binder holds no state besides its limits; one instance can serve
/// every request concurrently.
///
/// # Example
///
/// ```rust
/// use hermes_bind::{Bindable, Binder};
/// use hermes_router::Params;
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize, Bindable)]
/// #[serde(default)]
/// struct GetGame {
///     #[serde(rename = "id")]
///     id: String,
///     verbose: bool,
/// }
///
/// let captures: Params = [("ID", "abcdef")].into_iter().collect();
/// let req: GetGame = Binder::new()
///     .bind_new(&captures, "id=zzzzzz&verbose=1&other=x", b"")
///     .unwrap();
///
/// assert_eq!(req.id, "abcdef");
/// assert!(req.verbose);
/// ```
#[derive(Debug, Clone)]
pub struct Binder {
    max_body_size: usize,
}

impl Binder {
    /// Creates a binder with the default body limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Sets the maximum accepted body size in bytes.
    #[must_use]
    pub const fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Returns the maximum accepted body size in bytes.
    #[must_use]
    pub const fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// Binds into `dest`.
    ///
    /// `query` is the raw query string, with or without its leading `?`.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] if the body is too large or is not valid JSON
    /// for `T`. Nothing else fails a bind.
    pub fn bind<T>(
        &self,
        captures: &Params,
        query: &str,
        body: &[u8],
        dest: &mut T,
    ) -> Result<(), BindError>
    where
        T: Bindable + DeserializeOwned,
    {
        self.bind_body(body, dest)?;

        let mut table = FieldTable::new();
        dest.describe(&FieldPath::root(), &mut table);

        for (name, value) in captures {
            apply(&mut table, BindSource::Path, name, value);
        }

        for (key, value) in parse_query(query) {
            apply(&mut table, BindSource::Query, &key, &value);
        }

        Ok(())
    }

    /// Binds into a fresh `T::default()`.
    ///
    /// # Errors
    ///
    /// Same as [`bind`](Self::bind).
    pub fn bind_new<T>(&self, captures: &Params, query: &str, body: &[u8]) -> Result<T, BindError>
    where
        T: Bindable + DeserializeOwned + Default,
    {
        let mut dest = T::default();
        self.bind(captures, query, body, &mut dest)?;
        Ok(dest)
    }

    fn bind_body<T: DeserializeOwned>(&self, body: &[u8], dest: &mut T) -> Result<(), BindError> {
        if body.len() > self.max_body_size {
            return Err(BindError::payload_too_large(self.max_body_size, body.len()));
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        *dest = serde_json::from_slice(body).map_err(BindError::malformed_body)?;
        Ok(())
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(table: &mut FieldTable<'_>, source: BindSource, key: &str, value: &str) {
    match table.assign(source, key, value) {
        Assignment::Set => {
            tracing::trace!(%source, field = key, "bound field");
        }
        Assignment::Unknown => {
            tracing::trace!(%source, field = key, "ignoring unknown field");
        }
        Assignment::Shadowed(by) => {
            tracing::debug!(%source, field = key, bound_by = %by, "field already bound");
        }
        Assignment::Rejected(err) => {
            tracing::debug!(%source, field = key, error = %err, "skipping value that does not coerce");
        }
    }
}

/// Splits a query string into decoded pairs.
///
/// `+` means a space. A pair whose key or value does not decode to UTF-8
/// is skipped; the rest of the query still binds.
fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match (decode_component(key), decode_component(value)) {
                (Some(key), Some(value)) => Some((key, value)),
                _ => {
                    tracing::debug!(pair, "skipping query pair that is not valid UTF-8");
                    None
                }
            }
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(Cow::into_owned)
}
