//! Flattened field addresses.
//!
//! A destination value is described as a table of dotted, lowercase
//! addresses, each pointing at one settable leaf:
//!
//! ```text
//! struct Request {            id          -> &mut String
//!     #[serde(rename = "id")] flaggeroo   -> &mut bool
//!     id: String,             p.limit     -> &mut u32
//!     ...                     p.offset    -> &mut u32
//!     p: Page { limit, .. }   p.order     -> &mut String
//! }
//! ```

use crate::{BindSource, Coerce, CoerceError};
use std::collections::HashMap;
use std::fmt;

/// The dotted address of a (possibly nested) field.
///
/// Addresses are stored lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    address: String,
    depth: usize,
}

impl FieldPath {
    /// The address of the destination value itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// The address of the field `name` inside this one.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let name = name.to_lowercase();
        let address = if self.address.is_empty() {
            name
        } else {
            format!("{}.{name}", self.address)
        };
        Self {
            address,
            depth: self.depth + 1,
        }
    }

    /// Returns the dotted address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Number of segments; zero for the root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true for the root address.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.depth == 0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// What happened to one key/value pair offered to a [`FieldTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// The field was set.
    Set,
    /// No field has this address.
    Unknown,
    /// The field was already set by a higher-precedence source.
    Shadowed(BindSource),
    /// The value did not coerce; the field is unchanged.
    Rejected(CoerceError),
}

struct Slot<'a> {
    path: FieldPath,
    target: &'a mut dyn Coerce,
    bound_by: Option<BindSource>,
}

/// Settable leaves of a destination value, by address.
///
/// Built by [`Bindable::describe`](crate::Bindable::describe). Holds
/// mutable borrows into the destination, so it lives only for one bind.
#[derive(Default)]
pub struct FieldTable<'a> {
    slots: Vec<Slot<'a>>,
    index: HashMap<String, usize>,
}

impl<'a> FieldTable<'a> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a leaf at `path`.
    ///
    /// When two leaves share an address the first one registered keeps it.
    /// The root address is never registered.
    pub fn insert(&mut self, path: &FieldPath, target: &'a mut dyn Coerce) {
        if path.is_root() || self.index.contains_key(path.as_str()) {
            tracing::trace!(field = %path, "ignoring unaddressable or duplicate field");
            return;
        }
        self.index.insert(path.as_str().to_owned(), self.slots.len());
        self.slots.push(Slot {
            path: path.clone(),
            target,
            bound_by: None,
        });
    }

    /// Returns true if a leaf has this address (case-insensitive).
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.index.contains_key(&address.to_lowercase())
    }

    /// Returns the registered addresses in description order.
    #[must_use]
    pub fn addresses(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.path.as_str()).collect()
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the destination has no addressable leaves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Offers `raw` from `source` to the leaf at `key`.
    ///
    /// Path values only reach top-level fields. A field offered a path
    /// value is never overwritten from the query, even when that value was
    /// rejected. Repeated values from the same source overwrite scalars and
    /// append to collections.
    pub fn assign(&mut self, source: BindSource, key: &str, raw: &str) -> Assignment {
        let Some(&position) = self.index.get(&key.to_lowercase()) else {
            return Assignment::Unknown;
        };
        let slot = &mut self.slots[position];

        if source == BindSource::Path && slot.path.depth() != 1 {
            return Assignment::Unknown;
        }
        match slot.bound_by {
            Some(BindSource::Path) if source != BindSource::Path => {
                return Assignment::Shadowed(BindSource::Path);
            }
            _ => {}
        }

        match slot.target.coerce(raw, slot.bound_by.is_none()) {
            Ok(()) => {
                slot.bound_by = Some(source);
                Assignment::Set
            }
            Err(err) => {
                if source == BindSource::Path {
                    slot.bound_by = Some(source);
                }
                Assignment::Rejected(err)
            }
        }
    }
}

impl fmt::Debug for FieldTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.addresses()).finish()
    }
}
