//! Advisor report model (immutable, loaded from a CSV export)
//!
//! An export is a flat sequence of rows: tool preamble, one header row
//! (recognized by the literal `ID` in its first cell), then loop records.
//! Child records follow their parent directly in the file, so attachment
//! is positional: a child row always belongs to the most recently seen
//! top-level loop. The format has no deeper nesting.

use crate::callsite::{is_child_row, CallSite};
use crate::domain::{FieldKey, ReportError};
use log::warn;
use std::collections::HashMap;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Arithmetic intensity column.
pub const KEY_AI: &str = "ai";
/// Measured performance column.
pub const KEY_GFLOPS: &str = "gflops";
/// Self time column (values carry an `s` suffix).
pub const KEY_SELF_TIME: &str = "selftime";
/// Vectorization gain estimate column (values carry an `x` suffix).
pub const KEY_GAIN_ESTIMATE: &str = "gainestimate";
/// Loop type column ("Vectorized (Body)", "Scalar", ...).
pub const KEY_TYPE: &str = "type";
/// Raw call-site column, used as point labels by plotting frontends.
pub const KEY_CALL_SITES: &str = "functioncallsitesandloops";

/// Synthetic columns derived from the call-site string, appended after
/// the CSV columns in this order.
const SYNTHETIC_KEYS: [&str; 4] = ["child", "subroutine", "file", "line"];

/// Advisor prints `<0.01`-style placeholders when a value fell below its
/// measurement threshold; such loops count as having no data.
const BELOW_THRESHOLD_PREFIX: char = '<';

/// One profiled loop or function record.
///
/// Holds every CSV cell keyed by normalized column name, the derived
/// [`CallSite`] fields, and the child records attached to it (top-level
/// loops only; children have no children of their own).
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    fields: HashMap<FieldKey, String>,
    pub call_site: CallSite,
    pub children: Vec<Loop>,
}

impl Loop {
    /// Look up a field by normalized name.
    ///
    /// The four synthetic names (`child`, `subroutine`, `file`, `line`)
    /// resolve to the derived call-site fields; everything else resolves
    /// to the raw CSV cell. Returns `None` for unknown names.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "child" => Some(Cow::Borrowed(if self.call_site.child { "true" } else { "false" })),
            "subroutine" => Some(Cow::Borrowed(&self.call_site.subroutine)),
            "file" => Some(Cow::Borrowed(&self.call_site.file)),
            "line" => Some(match self.call_site.line {
                Some(n) => Cow::Owned(n.to_string()),
                None => Cow::Borrowed(""),
            }),
            _ => self.fields.get(key).map(|s| Cow::Borrowed(s.as_str())),
        }
    }

    /// Raw cell lookup with an empty-string default, for display code.
    #[must_use]
    pub fn get_or_empty(&self, key: &str) -> Cow<'_, str> {
        self.get(key).unwrap_or(Cow::Borrowed(""))
    }

    /// True when this loop has measured roofline data: `ai` and `gflops`
    /// both non-empty, and `ai` is not a below-threshold placeholder.
    #[must_use]
    pub fn has_data(&self) -> bool {
        let ai = self.get_or_empty(KEY_AI);
        let gflops = self.get_or_empty(KEY_GFLOPS);
        !ai.is_empty() && !ai.starts_with(BELOW_THRESHOLD_PREFIX) && !gflops.is_empty()
    }

    /// True when any child satisfies [`Loop::has_data`].
    #[must_use]
    pub fn child_has_data(&self) -> bool {
        self.children.iter().any(Loop::has_data)
    }

    /// True when the loop has at least one child record.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A parsed Advisor CSV export.
///
/// Construction is one-shot; the report is read-only afterwards and safe
/// to query from multiple threads.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorReport {
    /// Source path the report was parsed from.
    pub path: PathBuf,
    /// Normalized column names in header order, synthetic names last.
    pub keys: Vec<FieldKey>,
    /// Top-level loops in file order.
    pub loops: Vec<Loop>,
    /// Whole-column store: every raw cell across every row (parents and
    /// children intermixed, file order). All columns have equal length.
    data: HashMap<FieldKey, Vec<String>>,
}

impl AdvisorReport {
    /// Parse an Advisor CSV export.
    ///
    /// # Errors
    ///
    /// [`ReportError::Read`] when the file cannot be read, and
    /// [`ReportError::MissingHeader`] when no row's first cell contains
    /// the `ID` marker. No partial report is returned.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ReportError::Read { path: path.clone(), source })?;
        Self::from_csv_text(&text, path)
    }

    pub(crate) fn from_csv_text(text: &str, path: PathBuf) -> Result<Self, ReportError> {
        let records: Vec<Vec<String>> =
            read_records(text).into_iter().filter(|r| !r.is_empty()).collect();

        // Everything before the header row is tool preamble
        let header_idx = records
            .iter()
            .position(|r| r[0].contains("ID"))
            .ok_or(ReportError::MissingHeader { path: path.clone() })?;

        let mut keys: Vec<FieldKey> =
            records[header_idx].iter().map(|cell| FieldKey::normalize(cell)).collect();
        let csv_key_count = keys.len();
        keys.extend(SYNTHETIC_KEYS.iter().map(|k| FieldKey::normalize(k)));

        let mut data: HashMap<FieldKey, Vec<String>> =
            keys.iter().map(|k| (k.clone(), Vec::new())).collect();
        let mut loops: Vec<Loop> = Vec::new();

        for record in &records[header_idx + 1..] {
            let call_site_raw = record.get(1).map_or("", String::as_str);
            let call_site = CallSite::parse(call_site_raw);
            let synthetic = [
                if call_site.child { "true".to_string() } else { "false".to_string() },
                call_site.subroutine.clone(),
                call_site.file.clone(),
                call_site.line.map(|n| n.to_string()).unwrap_or_default(),
            ];

            let fields: HashMap<FieldKey, String> = keys[..csv_key_count]
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), record.get(i).cloned().unwrap_or_default()))
                .collect();
            let lp = Loop { fields, call_site, children: Vec::new() };

            if is_child_row(call_site_raw) {
                let Some(parent) = loops.last_mut() else {
                    warn!("child row before any top-level loop, skipping: {call_site_raw:?}");
                    continue;
                };
                parent.children.push(lp);
            } else {
                loops.push(lp);
            }

            // Column store gets every attached row, children included
            for (i, key) in keys[..csv_key_count].iter().enumerate() {
                let cell = record.get(i).cloned().unwrap_or_default();
                data.get_mut(key.as_str()).expect("key seeded above").push(cell);
            }
            for (key, value) in SYNTHETIC_KEYS.iter().zip(synthetic) {
                data.get_mut(*key).expect("key seeded above").push(value);
            }
        }

        Ok(AdvisorReport { path, keys, loops, data })
    }

    /// Every raw value of one column across all rows (parents and
    /// children intermixed, file order).
    #[must_use]
    pub fn column(&self, key: &str) -> Option<&[String]> {
        self.data.get(key).map(Vec::as_slice)
    }

    /// Total number of rows consumed after the header (parents plus
    /// children).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.loops.len() + self.loops.iter().map(|l| l.children.len()).sum::<usize>()
    }

    /// The raw call-site column, used as per-point labels by plotting
    /// frontends.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.column(KEY_CALL_SITES)
    }
}

/// Minimal RFC 4180 record reader.
///
/// Handles quoted fields (embedded separators, newlines and `""` escape
/// pairs) and both `\n` and `\r\n` terminators. Blank lines come back as
/// zero-field records so the caller can discard them.
fn read_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = true;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                flush_record(&mut records, &mut record, &mut field, field_started);
                field_started = false;
            }
            '\n' => {
                flush_record(&mut records, &mut record, &mut field, field_started);
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }
    flush_record(&mut records, &mut record, &mut field, field_started);
    records
}

fn flush_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    field_started: bool,
) {
    if record.is_empty() && !field_started {
        // Blank line: zero fields
        records.push(Vec::new());
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AdvisorReport {
        AdvisorReport::from_csv_text(text, PathBuf::from("test.csv")).unwrap()
    }

    const HEADER: &str = "ID,Function Call Sites and Loops,Self Time,Type,Gain Estimate,AI,GFLOPS";

    fn row(id: u32, call_site: &str, time: &str, kind: &str, gain: &str, ai: &str, gflops: &str) -> String {
        format!("{id},\"{call_site}\",{time},{kind},{gain},{ai},{gflops}")
    }

    #[test]
    fn test_preamble_rows_are_ignored() {
        let text = format!(
            "Intel Advisor export\n\n{HEADER}\n{}\n",
            row(1, "[loop in a at a.F90:1]", "1.0s", "Scalar", "", "0.5", "1.0")
        );
        let report = parse(&text);
        assert_eq!(report.loops.len(), 1);
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let text = "no header here\n1,2,3\n";
        let err = AdvisorReport::from_csv_text(text, PathBuf::from("x.csv")).unwrap_err();
        assert!(matches!(err, ReportError::MissingHeader { .. }));
    }

    #[test]
    fn test_child_rows_attach_to_most_recent_parent() {
        let text = format!(
            "{HEADER}\n{}\n{}\n{}\n{}\n",
            row(1, "[loop in a at a.F90:1]", "1.0s", "Scalar", "", "0.5", "1.0"),
            row(2, "[child] [loop in a at a.F90:1]", "0.2s", "Scalar", "", "0.1", "0.2"),
            row(3, "[child] [loop in a at a.F90:1]", "0.1s", "Scalar", "", "0.1", "0.1"),
            row(4, "[loop in b at b.F90:9]", "2.0s", "Scalar", "", "0.6", "2.0"),
        );
        let report = parse(&text);
        assert_eq!(report.loops.len(), 2);
        assert_eq!(report.loops[0].children.len(), 2);
        assert_eq!(report.loops[1].children.len(), 0);
        assert_eq!(report.row_count(), 4);
    }

    #[test]
    fn test_column_store_includes_children_in_file_order() {
        let text = format!(
            "{HEADER}\n{}\n{}\n{}\n",
            row(1, "[loop in a at a.F90:1]", "1.0s", "Scalar", "", "0.5", "1.0"),
            row(2, "[child] [loop in a at a.F90:1]", "0.2s", "Scalar", "", "0.1", "0.2"),
            row(3, "[loop in b at b.F90:9]", "2.0s", "Scalar", "", "0.6", "2.0"),
        );
        let report = parse(&text);
        assert_eq!(report.column("selftime").unwrap(), ["1.0s", "0.2s", "2.0s"]);
        // All columns equal length, synthetic ones included
        for key in &report.keys {
            assert_eq!(report.column(key.as_str()).unwrap().len(), 3, "column {key}");
        }
        assert_eq!(report.column("file").unwrap(), ["a.F90", "a.F90", "b.F90"]);
        assert_eq!(report.column("child").unwrap(), ["false", "true", "false"]);
    }

    #[test]
    fn test_synthetic_fields_resolve_on_loops() {
        let text = format!(
            "{HEADER}\n{}\n",
            row(1, "[loop in a at a.F90:42]", "1.0s", "Scalar", "", "0.5", "1.0")
        );
        let report = parse(&text);
        let lp = &report.loops[0];
        assert_eq!(lp.get("subroutine").unwrap(), "a");
        assert_eq!(lp.get("file").unwrap(), "a.F90");
        assert_eq!(lp.get("line").unwrap(), "42");
        assert_eq!(lp.get("child").unwrap(), "false");
        assert_eq!(lp.get("ai").unwrap(), "0.5");
        assert!(lp.get("no_such_column").is_none());
    }

    #[test]
    fn test_below_threshold_placeholder_counts_as_no_data() {
        let text = format!(
            "{HEADER}\n{}\n{}\n",
            row(1, "[loop in a at a.F90:1]", "1.0s", "Scalar", "", "<0.01", "1.0"),
            row(2, "[loop in b at b.F90:2]", "1.0s", "Scalar", "", "", ""),
        );
        let report = parse(&text);
        assert!(!report.loops[0].has_data());
        assert!(!report.loops[1].has_data());
    }

    #[test]
    fn test_quoted_fields_with_embedded_separators() {
        let text = format!(
            "{HEADER}\n1,\"[loop in f<a, b> at tmpl.cpp:7]\",1.0s,Scalar,,0.5,1.0\n"
        );
        let report = parse(&text);
        assert_eq!(report.loops[0].get("file").unwrap(), "tmpl.cpp");
        assert_eq!(report.loops[0].get("line").unwrap(), "7");
    }

    #[test]
    fn test_orphan_child_row_is_skipped() {
        let text = format!(
            "{HEADER}\n{}\n{}\n",
            row(1, "[child] [loop in a at a.F90:1]", "0.2s", "Scalar", "", "0.1", "0.2"),
            row(2, "[loop in b at b.F90:9]", "2.0s", "Scalar", "", "0.6", "2.0"),
        );
        let report = parse(&text);
        assert_eq!(report.loops.len(), 1);
        assert_eq!(report.row_count(), 1);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = format!(
            "{HEADER}\n{}\n{}\n",
            row(1, "[loop in a at a.F90:1]", "1.0s", "Scalar", "", "0.5", "1.0"),
            row(2, "[child] [loop in a at a.F90:1]", "0.2s", "Scalar", "", "0.1", "0.2"),
        );
        assert_eq!(parse(&text), parse(&text));
    }
}
