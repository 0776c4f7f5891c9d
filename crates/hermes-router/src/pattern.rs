//! Path pattern compilation and matching.
//!
//! Patterns are split on `/` into literal segments and named captures.
//! A capture is written `:Name` or `{Name}` and consumes exactly one
//! request path segment. Matching requires the same segment count, so
//! `/game/:ID` matches `/game/42` but never `/game` or `/game/42/moves`.
//!
//! Empty segments are dropped on both sides, which makes trailing and
//! repeated slashes insignificant.

use thiserror::Error;

use crate::params::Params;

/// Errors raised while compiling a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern does not start with `/`.
    #[error("path pattern '{pattern}' must start with '/'")]
    NotAbsolute {
        /// The offending pattern.
        pattern: String,
    },

    /// A capture segment has no name (`/game/:`).
    #[error("path pattern '{pattern}' contains an unnamed capture")]
    EmptyCapture {
        /// The offending pattern.
        pattern: String,
    },

    /// The same capture name appears twice.
    #[error("path pattern '{pattern}' captures '{name}' more than once")]
    DuplicateCapture {
        /// The offending pattern.
        pattern: String,
        /// The repeated capture name.
        name: String,
    },

    /// Multi-segment wildcards are not supported.
    #[error("path pattern '{pattern}' uses an unsupported wildcard segment '{segment}'")]
    Wildcard {
        /// The offending pattern.
        pattern: String,
        /// The wildcard segment.
        segment: String,
    },
}

/// One segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment verbatim.
    Literal(String),
    /// Captures the request segment under this name.
    Capture(String),
}

/// A compiled path pattern.
///
/// # Example
///
/// ```rust
/// use hermes_router::PathPattern;
///
/// let pattern = PathPattern::compile("/game/:ID").unwrap();
///
/// let params = pattern.matches("/game/abc%20def").unwrap();
/// assert_eq!(params.get("ID"), Some("abc def"));
///
/// assert!(pattern.matches("/game").is_none());
/// assert!(pattern.matches("/games/1").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compiles a pattern such as `/org/:Org/game/{id}`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute {
                pattern: pattern.to_string(),
            });
        }

        let mut segments = Vec::new();
        for raw in pattern.split('/').filter(|s| !s.is_empty()) {
            let segment = Self::parse_segment(pattern, raw)?;
            if let Segment::Capture(name) = &segment {
                let seen = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Capture(n) if n == name));
                if seen {
                    return Err(PatternError::DuplicateCapture {
                        pattern: pattern.to_string(),
                        name: name.clone(),
                    });
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    fn parse_segment(pattern: &str, raw: &str) -> Result<Segment, PatternError> {
        let capture = raw
            .strip_prefix(':')
            .or_else(|| raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')));

        if let Some(name) = capture {
            if name.is_empty() {
                return Err(PatternError::EmptyCapture {
                    pattern: pattern.to_string(),
                });
            }
            return Ok(Segment::Capture(name.to_string()));
        }

        if raw.starts_with('*') {
            return Err(PatternError::Wildcard {
                pattern: pattern.to_string(),
                segment: raw.to_string(),
            });
        }

        Ok(Segment::Literal(raw.to_string()))
    }

    /// Compiles `prefix` joined in front of this pattern.
    ///
    /// An empty prefix or `/` returns an identical pattern.
    pub fn with_prefix(&self, prefix: &str) -> Result<Self, PatternError> {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return Ok(self.clone());
        }
        Self::compile(&format!("{prefix}{}", self.raw))
    }

    /// Returns the pattern text as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Iterates the capture names in pattern order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Matches a request path, returning the decoded captures.
    ///
    /// The path must not include the query string.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut parts = path.split('/').filter(|s| !s.is_empty());
        let mut params = Params::with_capacity(self.segments.len());

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Capture(name) => {
                    let value = urlencoding::decode_binary(part.as_bytes());
                    params.push(name.as_str(), String::from_utf8_lossy(&value).into_owned());
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compile_colon_and_brace_captures() {
        let pattern = PathPattern::compile("/org/:Org/game/{id}").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("org".into()),
                Segment::Capture("Org".into()),
                Segment::Literal("game".into()),
                Segment::Capture("id".into()),
            ]
        );
        assert_eq!(pattern.capture_names().collect::<Vec<_>>(), vec!["Org", "id"]);
    }

    #[test]
    fn test_compile_rejects_bad_patterns() {
        assert!(matches!(
            PathPattern::compile("game/:ID"),
            Err(PatternError::NotAbsolute { .. })
        ));
        assert!(matches!(
            PathPattern::compile("/game/:"),
            Err(PatternError::EmptyCapture { .. })
        ));
        assert!(matches!(
            PathPattern::compile("/a/:id/b/{id}"),
            Err(PatternError::DuplicateCapture { .. })
        ));
        assert!(matches!(
            PathPattern::compile("/files/*rest"),
            Err(PatternError::Wildcard { .. })
        ));
    }

    #[test]
    fn test_exact_segment_count() {
        let pattern = PathPattern::compile("/game/:ID").unwrap();
        assert!(pattern.matches("/game/1").is_some());
        assert!(pattern.matches("/game").is_none());
        assert!(pattern.matches("/game/1/moves").is_none());
    }

    #[test]
    fn test_literals_compared_verbatim() {
        let pattern = PathPattern::compile("/Game/list").unwrap();
        assert!(pattern.matches("/Game/list").is_some());
        assert!(pattern.matches("/game/list").is_none());
    }

    #[test]
    fn test_captures_are_unescaped() {
        let pattern = PathPattern::compile("/user/:Name").unwrap();
        let params = pattern.matches("/user/j%C3%BCrgen%2Fx").unwrap();
        assert_eq!(params.get("Name"), Some("jürgen/x"));
    }

    #[test]
    fn test_trailing_and_double_slashes_ignored() {
        let pattern = PathPattern::compile("/game/:ID/").unwrap();
        assert_eq!(pattern.matches("//game//9/").unwrap().get("ID"), Some("9"));
    }

    #[test]
    fn test_root_pattern() {
        let pattern = PathPattern::compile("/").unwrap();
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("").is_some());
        assert!(pattern.matches("/x").is_none());
    }

    #[test]
    fn test_with_prefix() {
        let pattern = PathPattern::compile("/game/:ID").unwrap();
        let prefixed = pattern.with_prefix("/v2/").unwrap();
        assert_eq!(prefixed.as_str(), "/v2/game/:ID");
        assert!(prefixed.matches("/v2/game/1").is_some());
        assert!(prefixed.matches("/game/1").is_none());

        assert_eq!(pattern.with_prefix("").unwrap(), pattern);
        assert_eq!(pattern.with_prefix("/").unwrap(), pattern);
    }

    proptest! {
        #[test]
        fn prop_capture_roundtrips_any_segment(value in "[A-Za-z0-9_.~-]{1,24}") {
            let pattern = PathPattern::compile("/item/:Value/detail").unwrap();
            let path = format!("/item/{value}/detail");
            let params = pattern.matches(&path).unwrap();
            prop_assert_eq!(params.get("Value"), Some(value.as_str()));
        }

        #[test]
        fn prop_segment_count_mismatch_never_matches(extra in 1usize..5) {
            let pattern = PathPattern::compile("/a/:B/c").unwrap();
            let path = format!("/a/x/c{}", "/y".repeat(extra));
            prop_assert!(pattern.matches(&path).is_none());
        }
    }
}
