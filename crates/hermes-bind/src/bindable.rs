//! The capability every bind destination provides.

use crate::{FieldPath, FieldTable};

/// A value that can describe its settable leaves as a [`FieldTable`].
///
/// Structs usually derive this with `#[derive(Bindable)]`, which walks
/// named fields using their serde names. Leaves (numbers, `bool`,
/// `String`, `char`, and `Option`/`Vec` of those) register themselves at
/// the address they are given.
///
/// `Option` of a nested struct is not `Bindable`: there is no value to
/// describe until one exists. Such a field takes `#[bind(skip)]` and binds
/// from the body only.
///
/// # Example
///
/// A hand-written implementation for a struct with one nested field:
///
/// ```rust
/// use hermes_bind::{Bindable, FieldPath, FieldTable};
///
/// #[derive(Default)]
/// struct Page { limit: u32 }
///
/// impl Bindable for Page {
///     fn describe<'a>(&'a mut self, path: &FieldPath, table: &mut FieldTable<'a>) {
///         self.limit.describe(&path.child("limit"), table);
///     }
/// }
///
/// let mut page = Page::default();
/// let mut table = FieldTable::new();
/// page.describe(&FieldPath::root().child("p"), &mut table);
/// assert_eq!(table.addresses(), ["p.limit"]);
/// ```
pub trait Bindable {
    /// Registers every settable leaf below `path` into `table`.
    fn describe<'a>(&'a mut self, path: &FieldPath, table: &mut FieldTable<'a>);
}

macro_rules! leaf {
    ($($ty:ty),* $(,)?) => {$(
        impl Bindable for $ty {
            fn describe<'a>(&'a mut self, path: &FieldPath, table: &mut FieldTable<'a>) {
                table.insert(path, self);
            }
        }
    )*};
}

leaf!(bool, String, char);

impl<T> Bindable for Option<T>
where
    T: crate::Coerce + Default,
{
    fn describe<'a>(&'a mut self, path: &FieldPath, table: &mut FieldTable<'a>) {
        table.insert(path, self);
    }
}

impl<T> Bindable for Vec<T>
where
    T: crate::Coerce + Default,
{
    fn describe<'a>(&'a mut self, path: &FieldPath, table: &mut FieldTable<'a>) {
        table.insert(path, self);
    }
}

impl<T> Bindable for Box<T>
where
    T: Bindable + ?Sized,
{
    fn describe<'a>(&'a mut self, path: &FieldPath, table: &mut FieldTable<'a>) {
        (**self).describe(path, table);
    }
}

impl Bindable for () {
    fn describe<'a>(&'a mut self, _path: &FieldPath, _table: &mut FieldTable<'a>) {}
}

impl Bindable for hermes_core::Empty {
    fn describe<'a>(&'a mut self, _path: &FieldPath, _table: &mut FieldTable<'a>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BindSource;

    #[test]
    fn test_leaf_registers_at_given_path() {
        let mut flag = false;
        let mut table = FieldTable::new();
        flag.describe(&FieldPath::root().child("flag"), &mut table);
        assert_eq!(table.addresses(), ["flag"]);
    }

    #[test]
    fn test_boxed_value_delegates() {
        let mut boxed = Box::new(0_i32);
        let mut table = FieldTable::new();
        boxed.describe(&FieldPath::root().child("n"), &mut table);
        table.assign(BindSource::Query, "n", "-3");
        drop(table);
        assert_eq!(*boxed, -3);
    }

    #[test]
    fn test_empty_has_no_fields() {
        let mut empty = hermes_core::Empty {};
        let mut table = FieldTable::new();
        empty.describe(&FieldPath::root(), &mut table);
        assert!(table.is_empty());
    }
}
