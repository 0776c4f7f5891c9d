//! Text-to-value coercion for leaf fields.
//!
//! Path captures and query values arrive as text. A [`Coerce`] type knows
//! how to overwrite itself from one such value.

use crate::CoerceError;

/// A leaf field that can be set from a textual value.
///
/// `first` is true for the first value a bind pass writes into this field.
/// Scalars ignore it; collections use it to replace a body-supplied list
/// instead of appending to it.
pub trait Coerce {
    /// Overwrites `self` from `raw`.
    ///
    /// On error `self` must be left untouched.
    fn coerce(&mut self, raw: &str, first: bool) -> Result<(), CoerceError>;
}

/// Parses the boolean spellings accepted on the wire.
///
/// `true`/`1` and `false`/`0`, ASCII case-insensitive.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

impl Coerce for bool {
    fn coerce(&mut self, raw: &str, _first: bool) -> Result<(), CoerceError> {
        *self = parse_bool(raw).ok_or_else(|| CoerceError::new("bool", raw))?;
        Ok(())
    }
}

impl Coerce for String {
    fn coerce(&mut self, raw: &str, _first: bool) -> Result<(), CoerceError> {
        raw.clone_into(self);
        Ok(())
    }
}

impl Coerce for char {
    fn coerce(&mut self, raw: &str, _first: bool) -> Result<(), CoerceError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                *self = c;
                Ok(())
            }
            _ => Err(CoerceError::new("char", raw)),
        }
    }
}

/// Implements [`Coerce`] and [`Bindable`](crate::Bindable) for types whose
/// textual form is their [`FromStr`](std::str::FromStr) implementation.
///
/// The second argument names the kind in coercion errors.
///
/// ```rust
/// use hermes_bind::{bindable_from_str, Coerce};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Rating(u8);
///
/// impl std::str::FromStr for Rating {
///     type Err = std::num::ParseIntError;
///
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Rating)
///     }
/// }
///
/// bindable_from_str!(Rating => "rating");
///
/// let mut r = Rating::default();
/// r.coerce("5", true).unwrap();
/// assert_eq!(r, Rating(5));
/// assert!(r.coerce("five", true).is_err());
/// assert_eq!(r, Rating(5));
/// ```
#[macro_export]
macro_rules! bindable_from_str {
    ($($ty:ty => $kind:literal),* $(,)?) => {$(
        impl $crate::Coerce for $ty {
            fn coerce(
                &mut self,
                raw: &str,
                _first: bool,
            ) -> ::core::result::Result<(), $crate::CoerceError> {
                *self = raw
                    .parse::<$ty>()
                    .map_err(|_| $crate::CoerceError::new($kind, raw))?;
                ::core::result::Result::Ok(())
            }
        }

        impl $crate::Bindable for $ty {
            fn describe<'a>(
                &'a mut self,
                path: &$crate::FieldPath,
                table: &mut $crate::FieldTable<'a>,
            ) {
                table.insert(path, self);
            }
        }
    )*};
}

bindable_from_str! {
    i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64", i128 => "i128", isize => "isize",
    u8 => "u8", u16 => "u16", u32 => "u32", u64 => "u64", u128 => "u128", usize => "usize",
    f32 => "f32", f64 => "f64",
}

impl<T> Coerce for Option<T>
where
    T: Coerce + Default,
{
    fn coerce(&mut self, raw: &str, first: bool) -> Result<(), CoerceError> {
        match self {
            Some(inner) if !first => inner.coerce(raw, false),
            _ => {
                let mut value = T::default();
                value.coerce(raw, true)?;
                *self = Some(value);
                Ok(())
            }
        }
    }
}

impl<T> Coerce for Vec<T>
where
    T: Coerce + Default,
{
    fn coerce(&mut self, raw: &str, first: bool) -> Result<(), CoerceError> {
        let mut item = T::default();
        item.coerce(raw, true)?;
        if first {
            self.clear();
        }
        self.push(item);
        Ok(())
    }
}
