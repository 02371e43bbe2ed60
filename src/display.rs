//! Terminal tables for loops and summaries

use crate::analysis::LoopSummary;
use crate::report::{AdvisorReport, Loop, KEY_AI, KEY_GFLOPS, KEY_SELF_TIME};
use std::fmt::Write;

/// Truncate to at most `width` characters.
fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Render the loop forest as a fixed-width table.
///
/// `only_with_data` hides loops (and children) without measured roofline
/// data; `include_children` controls whether child rows are listed under
/// their parent.
#[must_use]
pub fn render_loops(report: &AdvisorReport, include_children: bool, only_with_data: bool) -> String {
    let mut out = String::new();
    let with_children = report.loops.iter().filter(|l| l.has_children()).count();
    let _ = writeln!(out, "report: {}", report.path.display());
    let _ = writeln!(out, "loops: {} ({} with children)", report.loops.len(), with_children);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        " {:>4} {:9} {:30} {:25} {:>6} {:>10} {:>10} {:>10}",
        "id", "", "subroutine", "file", "line", "AI", "gflops", "time"
    );
    let _ = writeln!(out, " {}", "-".repeat(110));

    for lp in &report.loops {
        if !only_with_data || lp.has_data() {
            loop_row(&mut out, lp, "Loop:");
        }
        if !include_children {
            continue;
        }
        for child in &lp.children {
            if !only_with_data || child.has_data() {
                loop_row(&mut out, child, "| Child:");
            }
        }
    }
    out
}

fn loop_row(out: &mut String, lp: &Loop, tag: &str) {
    let site = &lp.call_site;
    let line = site.line.map(|n| n.to_string()).unwrap_or_default();
    let _ = writeln!(
        out,
        " {:>4} {:9} {:30} {:25} {:>6} {:>10} {:>10} {:>10}",
        clip(&lp.get_or_empty("id"), 4),
        tag,
        clip(&site.subroutine, 30),
        clip(&site.file, 25),
        line,
        clip(&lp.get_or_empty(KEY_AI), 10),
        clip(&lp.get_or_empty(KEY_GFLOPS), 10),
        clip(&lp.get_or_empty(KEY_SELF_TIME), 10),
    );
}

/// Render the summary list as a fixed-width table.
#[must_use]
pub fn render_summaries(summaries: &[LoopSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "loops with data: {}", summaries.len());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        " {:>4} {:20} {:40} {:>6} {:>10} {:>10} {:>10} {:>6} {:10}",
        "id", "file", "subroutine", "line", "flop/byte", "gflop/s", "time(s)", "gain", "type"
    );
    let _ = writeln!(out, " {}", "-".repeat(120));
    for s in summaries {
        let _ = writeln!(
            out,
            " {:>4} {:20} {:40} {:>6} {:>10.4} {:>10.4} {:>10.4} {:>6.2} {:10}",
            s.id,
            clip(&s.file, 20),
            clip(&s.subroutine, 40),
            s.line,
            s.ai,
            s.gflops,
            s.time,
            s.gain,
            s.kind.to_string(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::summarize;
    use std::path::PathBuf;

    const HEADER: &str = "ID,Function Call Sites and Loops,Self Time,Type,Gain Estimate,AI,GFLOPS";

    fn report() -> AdvisorReport {
        let text = format!(
            "{HEADER}\n\
             7,\"[loop in depose at current_deposition.F90:2681]\",0.36s,Vectorized (Body),2.9x,0.33,5.04\n\
             8,\"[child] [loop in depose at current_deposition.F90:2681]\",0.01s,Vectorized (Remainder),,,\n\
             9,\"[loop in gather at field_gathering.F90:114]\",0.2s,Scalar,,,\n"
        );
        AdvisorReport::from_csv_text(&text, PathBuf::from("display-test.csv")).unwrap()
    }

    #[test]
    fn test_loop_table_hides_rows_without_data() {
        let table = render_loops(&report(), true, true);
        assert!(table.contains("depose"));
        assert!(!table.contains("gather"));
        assert!(!table.contains("Child"));
    }

    #[test]
    fn test_loop_table_shows_all_when_requested() {
        let table = render_loops(&report(), true, false);
        assert!(table.contains("gather"));
        assert!(table.contains("| Child:"));
    }

    #[test]
    fn test_summary_table_lists_counts_and_kind() {
        let summaries = summarize(&report());
        let table = render_summaries(&summaries);
        assert!(table.contains("loops with data: 1"));
        assert!(table.contains("Vectorized"));
        assert!(table.contains("current_deposition.F90"));
    }
}
