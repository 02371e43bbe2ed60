//! Call-site string mini-grammar
//!
//! Advisor encodes the location of every loop in its "Function Call Sites
//! and Loops" column:
//!
//! ```text
//! [loop in depose_jxjyjz at current_deposition.F90:2681]
//! [child] [loop in depose_jxjyjz at current_deposition.F90:2681]
//! ```
//!
//! The grammar is positional, not delimiter-driven: a fixed-length prefix
//! (longer when the `[child]` marker is present), one trailing closing
//! bracket, a `" at "` separator and a `:`-separated file:line suffix.

use log::warn;

/// Prefix length for `[child] [loop in ` rows.
const CHILD_PREFIX_LEN: usize = 17;

/// Prefix length for `[loop in ` rows.
const PARENT_PREFIX_LEN: usize = 9;

/// Derived location fields parsed from one call-site string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// True when the string carries the `[child]` marker.
    pub child: bool,
    /// Enclosing subroutine, `"None"` when the string has no location.
    pub subroutine: String,
    /// Source file, `"None"` when the string has no location.
    pub file: String,
    /// Source line. `None` when the string carries no location at all;
    /// `Some(0)` when a location is present but its line text does not
    /// parse.
    pub line: Option<u32>,
}

impl Default for CallSite {
    fn default() -> Self {
        CallSite {
            child: false,
            subroutine: "None".to_string(),
            file: "None".to_string(),
            line: None,
        }
    }
}

impl CallSite {
    /// Parse one call-site string.
    ///
    /// Malformed strings (too short, missing `:` in the location suffix)
    /// are recoverable: they are logged and the affected fields keep their
    /// defaults.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        // The child marker sits one byte in: "[child] ..."
        let child = raw.as_bytes().get(1..6) == Some(b"child".as_slice());
        let mut site = CallSite { child, ..CallSite::default() };
        let prefix = if child { CHILD_PREFIX_LEN } else { PARENT_PREFIX_LEN };

        // Fixed-length prefix plus one trailing bracket
        let Some(inner) = raw.get(prefix..raw.len().saturating_sub(1)) else {
            warn!("call-site string too short to parse: {raw:?}");
            return site;
        };

        let Some((subroutine, location)) = inner.split_once(" at ") else {
            // Function entries have no location suffix; defaults apply.
            return site;
        };
        site.subroutine = subroutine.to_string();

        let Some((file, line)) = location.split_once(':') else {
            warn!("malformed call-site location (no ':'): {raw:?}");
            return site;
        };
        site.file = file.to_string();
        site.line = Some(line.parse().unwrap_or(0));
        site
    }
}

/// Whether a raw call-site cell marks a child row.
///
/// Matches the substring `"child"` strictly after the first byte. This is
/// looser than [`CallSite::parse`]'s positional check on purpose: it is
/// the row-classification rule the export format relies on.
#[must_use]
pub fn is_child_row(call_site: &str) -> bool {
    call_site.find("child").is_some_and(|pos| pos > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parent_call_site() {
        let site = CallSite::parse("[loop in depose_jxjyjz at current_deposition.F90:2681]");
        assert!(!site.child);
        assert_eq!(site.subroutine, "depose_jxjyjz");
        assert_eq!(site.file, "current_deposition.F90");
        assert_eq!(site.line, Some(2681));
    }

    #[test]
    fn test_parse_child_call_site() {
        let site = CallSite::parse("[child] [loop in field_gathering at field_gathering.F90:114]");
        assert!(site.child);
        assert_eq!(site.subroutine, "field_gathering");
        assert_eq!(site.file, "field_gathering.F90");
        assert_eq!(site.line, Some(114));
    }

    #[test]
    fn test_parse_without_location_keeps_defaults() {
        let site = CallSite::parse("[loop in __libm_exp_l9]");
        assert!(!site.child);
        assert_eq!(site.subroutine, "None");
        assert_eq!(site.file, "None");
        assert_eq!(site.line, None);
    }

    #[test]
    fn test_parse_missing_colon_is_recoverable() {
        let site = CallSite::parse("[loop in foo at somewhere]");
        assert_eq!(site.subroutine, "foo");
        assert_eq!(site.file, "None");
        assert_eq!(site.line, None);
    }

    #[test]
    fn test_parse_non_numeric_line_defaults_to_zero() {
        let site = CallSite::parse("[loop in foo at bar.F90:unknown]");
        assert_eq!(site.file, "bar.F90");
        assert_eq!(site.line, Some(0));
    }

    #[test]
    fn test_child_row_detection_skips_first_byte() {
        assert!(is_child_row("[child] [loop in foo at a.F90:1]"));
        assert!(!is_child_row("[loop in foo at a.F90:1]"));
        // A leading match does not classify the row as a child
        assert!(!is_child_row("child marker at position zero"));
    }

    #[test]
    fn test_too_short_string_keeps_defaults() {
        let site = CallSite::parse("[loop]");
        assert_eq!(site, CallSite::default());
    }
}
