//! Wildcard patterns for the resource and action segments of a rule
//!
//! A segment is either the lone wildcard `*` (matches every string), plain
//! text (no wildcard), or text where each `*` stands for zero or more
//! characters. Patterns are compiled once into the literal pieces between the
//! wildcards and matched without a regex engine.
//!
//! Whether a pattern has to cover the whole candidate or may be found anywhere
//! inside it is decided by [`MatchMode`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a compiled pattern is applied to a candidate string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The pattern must cover the whole candidate: `user` does not match `superuser`
    #[default]
    Anchored,
    /// The pattern may be found anywhere in the candidate: `user` matches `superuser`
    Substring,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anchored => write!(f, "anchored"),
            Self::Substring => write!(f, "substring"),
        }
    }
}

/// Compiled form of a segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PatternKind {
    /// Lone `*`
    Any,
    /// Text without wildcards
    Literal(String),
    /// Literal pieces around each `*`, first and last may be empty
    Wildcard(Vec<String>),
}

/// Pattern matcher over resource or action names
///
/// # Examples
///
/// ```
/// use cretoai_rights::{MatchMode, Pattern};
///
/// let pattern = Pattern::compile("post*", MatchMode::Anchored);
/// assert!(pattern.matches("posts"));
/// assert!(!pattern.matches("reposts"));
///
/// let loose = Pattern::compile("post*", MatchMode::Substring);
/// assert!(loose.matches("reposts"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    /// Segment text as written in the rule
    raw: String,
    kind: PatternKind,
    mode: MatchMode,
}

impl Pattern {
    /// Compile a segment into a pattern
    pub fn compile(segment: &str, mode: MatchMode) -> Self {
        let kind = if segment == "*" {
            PatternKind::Any
        } else if segment.contains('*') {
            PatternKind::Wildcard(segment.split('*').map(str::to_string).collect())
        } else {
            PatternKind::Literal(segment.to_string())
        };

        Self {
            raw: segment.to_string(),
            kind,
            mode,
        }
    }

    /// Pattern matching every string
    pub fn any() -> Self {
        Self {
            raw: "*".to_string(),
            kind: PatternKind::Any,
            mode: MatchMode::default(),
        }
    }

    /// Whether this is the lone wildcard `*`
    pub fn is_any(&self) -> bool {
        matches!(self.kind, PatternKind::Any)
    }

    /// Whether the segment contains a wildcard anywhere
    pub fn has_wildcard(&self) -> bool {
        !matches!(self.kind, PatternKind::Literal(_))
    }

    /// Segment text as written in the rule
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match mode this pattern was compiled with
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Check a candidate against this pattern
    pub fn matches(&self, candidate: &str) -> bool {
        match (&self.kind, self.mode) {
            (PatternKind::Any, _) => true,
            (PatternKind::Literal(text), MatchMode::Anchored) => candidate == text,
            (PatternKind::Literal(text), MatchMode::Substring) => candidate.contains(text.as_str()),
            (PatternKind::Wildcard(pieces), MatchMode::Anchored) => match_anchored(pieces, candidate),
            (PatternKind::Wildcard(pieces), MatchMode::Substring) => match_in_order(pieces, candidate),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// First piece is a prefix, last piece a suffix, the rest float in order between them.
///
/// The prefix and suffix are stripped before the middle is searched so they
/// can never overlap.
fn match_anchored(pieces: &[String], candidate: &str) -> bool {
    // A segment with at least one `*` always splits into two or more pieces
    let [first, middle @ .., last] = pieces else {
        return false;
    };

    let Some(rest) = candidate.strip_prefix(first.as_str()) else {
        return false;
    };
    let Some(rest) = rest.strip_suffix(last.as_str()) else {
        return false;
    };

    match_in_order(middle, rest)
}

/// Every piece found in order, leftmost first.
///
/// Leftmost placement is always safe here: with only `*` wildcards, taking the
/// earliest occurrence leaves the most room for the pieces that follow.
fn match_in_order(pieces: &[String], candidate: &str) -> bool {
    let mut rest = candidate;
    for piece in pieces {
        match rest.find(piece.as_str()) {
            Some(idx) => rest = &rest[idx + piece.len()..],
            None => return false,
        }
    }
    true
}
