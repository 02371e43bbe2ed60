//! Domain types providing compile-time safety and self-documentation

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Punctuation removed from header cells along with whitespace.
///
/// Advisor headers carry decoration like `GFLOPS (%)` or
/// `Trip Counts [Average]`; normalization makes them addressable as plain
/// identifiers.
const STRIPPED_PUNCTUATION: [char; 6] = ['%', ',', '/', '(', ')', '['];

/// A normalized column key.
///
/// Header cells are lower-cased and stripped of whitespace and decoration
/// punctuation, so `"Self Time"` and `"self time"` both address the
/// `selftime` column. Keys constructed from already-normalized text (the
/// synthetic `child`/`subroutine`/`file`/`line` columns) pass through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey(String);

impl FieldKey {
    /// Normalize a raw header cell into a key.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let key = raw
            .chars()
            .filter(|c| {
                !c.is_whitespace() && !STRIPPED_PUNCTUATION.contains(c) && *c != ']'
            })
            .flat_map(char::to_lowercase)
            .collect();
        FieldKey(key)
    }

    /// The normalized key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldKey {
    fn from(raw: &str) -> Self {
        FieldKey::normalize(raw)
    }
}

/// Vectorization classification of a loop, derived from Advisor's `Type`
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopKind {
    Vectorized,
    Scalar,
}

impl LoopKind {
    /// Classify a raw `Type` cell. Any cell mentioning `Vectorized`
    /// (e.g. "Vectorized (Body)", "Vectorized (Remainder)") counts.
    #[must_use]
    pub fn from_type_cell(raw: &str) -> Self {
        if raw.contains("Vectorized") {
            LoopKind::Vectorized
        } else {
            LoopKind::Scalar
        }
    }
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopKind::Vectorized => write!(f, "Vectorized"),
            LoopKind::Scalar => write!(f, "Scalar"),
        }
    }
}
