//! Path capture storage.
//!
//! A matched pattern yields one `(name, value)` pair per capture segment.
//! Most endpoints declare one or two captures, so pairs live inline in a
//! small vector and only spill to the heap for unusually deep patterns.

use smallvec::SmallVec;

/// Captures stored inline before spilling to the heap.
const INLINE_CAPTURES: usize = 4;

/// Named values captured from a request path.
///
/// Names keep the spelling used in the registered pattern (`/game/:ID`
/// yields `ID`). Values are already percent-decoded.
///
/// # Example
///
/// ```rust
/// use hermes_router::Params;
///
/// let mut params = Params::new();
/// params.push("ID", "abcdef");
///
/// assert_eq!(params.get("ID"), Some("abcdef"));
/// assert_eq!(params.get_ignore_case("id"), Some("abcdef"));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_CAPTURES]>,
}

impl Params {
    /// Creates an empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a capture set sized for `capacity` captures.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends a capture.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value captured under `name`, compared exactly.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value captured under `name`, ignoring ASCII case.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates captures in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N, V> FromIterator<(N, V)> for Params
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new_is_empty() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_get_is_exact() {
        let mut params = Params::new();
        params.push("ID", "abcdef");

        assert_eq!(params.get("ID"), Some("abcdef"));
        assert_eq!(params.get("id"), None);
    }

    #[test]
    fn test_get_ignore_case() {
        let mut params = Params::new();
        params.push("GameID", "42");

        assert_eq!(params.get_ignore_case("gameid"), Some("42"));
        assert_eq!(params.get_ignore_case("GAMEID"), Some("42"));
        assert_eq!(params.get_ignore_case("game"), None);
    }

    #[test]
    fn test_iter_keeps_pattern_order() {
        let params: Params = [("org", "acme"), ("id", "7")].into_iter().collect();

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("org", "acme"), ("id", "7")]);

        let via_ref: Vec<_> = (&params).into_iter().collect();
        assert_eq!(via_ref, pairs);
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let mut params = Params::with_capacity(2);
        for i in 0..10 {
            params.push(format!("k{i}"), format!("v{i}"));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(params.get("k7"), Some("v7"));
    }
}
