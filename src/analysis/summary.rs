//! Flat summaries of the loops that carry measured roofline data
//!
//! A summary is the fully-coerced view of one emitted loop or child:
//! numbers instead of suffixed strings, a vectorization classification,
//! and the derived location fields. This is the "view model" the table
//! renderer and the scatter exporter consume.

use crate::domain::LoopKind;
use crate::report::{
    AdvisorReport, Loop, KEY_AI, KEY_CALL_SITES, KEY_GAIN_ESTIMATE, KEY_GFLOPS, KEY_SELF_TIME,
    KEY_TYPE,
};
use crate::value::to_number;
use log::info;
use serde::Serialize;

/// One loop (or child) with data, fully coerced.
#[derive(Debug, Clone, Serialize)]
pub struct LoopSummary {
    /// Dense index in emission order, not the export's ID column.
    pub id: usize,
    /// Arithmetic intensity (flops/byte).
    pub ai: f64,
    /// Measured performance (Gflop/s).
    pub gflops: f64,
    /// Self time in seconds.
    pub time: f64,
    /// Estimated vectorization gain; 0 for scalar loops. Always taken
    /// from the top-level loop, gains are not attached to children.
    pub gain: f64,
    pub kind: LoopKind,
    pub subroutine: String,
    pub file: String,
    pub line: u32,
    /// Raw call-site text, used as a point label by plotting frontends.
    pub call_site: String,
}

/// Sort orders for [`sort_summaries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SummarySort {
    File,
    Subroutine,
    Time,
    Ai,
    Gflops,
}

/// Build the summary list: every `has_data()` top-level loop, falling
/// back to the children with data when the loop itself has none. Emission
/// order is file order.
#[must_use]
pub fn summarize(report: &AdvisorReport) -> Vec<LoopSummary> {
    let mut out = Vec::new();
    for lp in &report.loops {
        if lp.has_data() {
            out.push(summary_of(lp, lp, out.len()));
        } else if lp.child_has_data() {
            for child in lp.children.iter().filter(|c| c.has_data()) {
                out.push(summary_of(child, lp, out.len()));
            }
        }
    }
    out
}

fn summary_of(lp: &Loop, gain_source: &Loop, id: usize) -> LoopSummary {
    let kind = LoopKind::from_type_cell(&lp.get_or_empty(KEY_TYPE));
    let gain = match kind {
        LoopKind::Vectorized => {
            to_number(&gain_source.get_or_empty(KEY_GAIN_ESTIMATE)).unwrap_or(0.0)
        }
        LoopKind::Scalar => 0.0,
    };
    LoopSummary {
        id,
        ai: to_number(&lp.get_or_empty(KEY_AI)).unwrap_or(0.0),
        gflops: to_number(&lp.get_or_empty(KEY_GFLOPS)).unwrap_or(0.0),
        time: to_number(&lp.get_or_empty(KEY_SELF_TIME)).unwrap_or(0.0),
        gain,
        kind,
        subroutine: lp.call_site.subroutine.clone(),
        file: lp.call_site.file.clone(),
        line: lp.call_site.line.unwrap_or(0),
        call_site: lp.get_or_empty(KEY_CALL_SITES).into_owned(),
    }
}

/// Stable sort by the chosen key.
pub fn sort_summaries(summaries: &mut [LoopSummary], key: SummarySort) {
    match key {
        SummarySort::File => summaries.sort_by(|a, b| a.file.cmp(&b.file)),
        SummarySort::Subroutine => summaries.sort_by(|a, b| a.subroutine.cmp(&b.subroutine)),
        SummarySort::Time => summaries.sort_by(|a, b| b.time.total_cmp(&a.time)),
        SummarySort::Ai => summaries.sort_by(|a, b| b.ai.total_cmp(&a.ai)),
        SummarySort::Gflops => summaries.sort_by(|a, b| b.gflops.total_cmp(&a.gflops)),
    }
}

/// Drop every summary whose file matches; returns how many were removed.
pub fn exclude_file(summaries: &mut Vec<LoopSummary>, file: &str) -> usize {
    let before = summaries.len();
    summaries.retain(|s| s.file != file);
    let removed = before - summaries.len();
    info!("excluded {removed} loops from {file}");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const HEADER: &str = "ID,Function Call Sites and Loops,Self Time,Type,Gain Estimate,AI,GFLOPS";

    fn report(rows: &[String]) -> AdvisorReport {
        let text = format!("{HEADER}\n{}\n", rows.join("\n"));
        AdvisorReport::from_csv_text(&text, PathBuf::from("summary-test.csv")).unwrap()
    }

    fn row(call_site: &str, time: &str, kind: &str, gain: &str, ai: &str, gflops: &str) -> String {
        format!("1,\"{call_site}\",{time},{kind},{gain},{ai},{gflops}")
    }

    #[test]
    fn test_vectorized_loop_carries_gain() {
        let r = report(&[row(
            "[loop in a at a.F90:1]",
            "0.5s",
            "Vectorized (Body)",
            "2.91x",
            "0.33",
            "5.0",
        )]);
        let summaries = summarize(&r);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.kind, LoopKind::Vectorized);
        assert!((s.gain - 2.91).abs() < 1e-9);
        assert!((s.time - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_scalar_loop_has_zero_gain_even_with_estimate() {
        let r = report(&[row("[loop in a at a.F90:1]", "0.5s", "Scalar", "1.7x", "0.33", "5.0")]);
        let s = &summarize(&r)[0];
        assert_eq!(s.kind, LoopKind::Scalar);
        assert_eq!(s.gain, 0.0);
    }

    #[test]
    fn test_child_fallback_takes_gain_from_parent() {
        let r = report(&[
            row("[loop in p at p.F90:10]", "1.0s", "Vectorized (Body)", "3.5x", "", ""),
            row(
                "[child] [loop in p at p.F90:10]",
                "0.4s",
                "Vectorized (Remainder)",
                "",
                "0.2",
                "1.1",
            ),
        ]);
        let summaries = summarize(&r);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert!((s.gain - 3.5).abs() < 1e-9);
        assert!((s.ai - 0.2).abs() < 1e-9);
        assert_eq!(s.line, 10);
    }

    #[test]
    fn test_ids_are_dense_and_ordered() {
        let r = report(&[
            row("[loop in a at a.F90:1]", "1.0s", "Scalar", "", "0.5", "1.0"),
            row("[loop in skip at s.F90:2]", "1.0s", "Scalar", "", "", ""),
            row("[loop in b at b.F90:3]", "2.0s", "Scalar", "", "0.6", "2.0"),
        ]);
        let summaries = summarize(&r);
        assert_eq!(summaries.iter().map(|s| s.id).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(summaries[1].subroutine, "b");
    }

    #[test]
    fn test_sort_by_file_is_stable() {
        let r = report(&[
            row("[loop in b1 at b.F90:1]", "1.0s", "Scalar", "", "0.5", "1.0"),
            row("[loop in a1 at a.F90:2]", "1.0s", "Scalar", "", "0.6", "2.0"),
            row("[loop in b2 at b.F90:3]", "1.0s", "Scalar", "", "0.7", "3.0"),
        ]);
        let mut summaries = summarize(&r);
        sort_summaries(&mut summaries, SummarySort::File);
        let subs: Vec<_> = summaries.iter().map(|s| s.subroutine.as_str()).collect();
        assert_eq!(subs, vec!["a1", "b1", "b2"]);
    }

    #[test]
    fn test_sort_by_time_descends() {
        let r = report(&[
            row("[loop in a at a.F90:1]", "0.1s", "Scalar", "", "0.5", "1.0"),
            row("[loop in b at b.F90:2]", "0.9s", "Scalar", "", "0.6", "2.0"),
        ]);
        let mut summaries = summarize(&r);
        sort_summaries(&mut summaries, SummarySort::Time);
        assert_eq!(summaries[0].subroutine, "b");
    }

    #[test]
    fn test_exclude_file_reports_count() {
        let r = report(&[
            row("[loop in a at a.F90:1]", "1.0s", "Scalar", "", "0.5", "1.0"),
            row("[loop in b at b.F90:2]", "1.0s", "Scalar", "", "0.6", "2.0"),
            row("[loop in c at a.F90:3]", "1.0s", "Scalar", "", "0.7", "3.0"),
        ]);
        let mut summaries = summarize(&r);
        let removed = exclude_file(&mut summaries, "a.F90");
        assert_eq!(removed, 2);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].file, "b.F90");
    }
}
