//! Filtered projection queries over a parsed report
//!
//! `field_array` walks the loop forest in parse order and projects one
//! field into a flat sequence. A top-level loop with measured data is
//! emitted directly; one without data falls back to its children. Filters
//! are always evaluated against the fields of the record being emitted,
//! so a child is filtered by its own file/line, not its parent's.

use crate::analysis::filter::{passes_all, Filter};
use crate::report::{AdvisorReport, KEY_GAIN_ESTIMATE};
use crate::value::{to_number, CellValue};

impl AdvisorReport {
    /// Project one field across every loop (or child) with data that
    /// passes all `filters`, in file order.
    ///
    /// Values are numerically coerced where possible, so the output is a
    /// mixed-type sequence in general; for numeric columns (`ai`,
    /// `gflops`, `selftime`) it is uniformly numeric under well-formed
    /// input. `gainestimate` is the one field read from the parent loop
    /// when a child is emitted: the export only attaches gain estimates
    /// at the loop level.
    #[must_use]
    pub fn field_array(
        &self,
        field: &str,
        include_children: bool,
        filters: &[Filter],
    ) -> Vec<CellValue> {
        let mut out = Vec::new();

        for lp in &self.loops {
            if lp.has_data() {
                if passes_all(filters, lp) {
                    out.push(CellValue::coerce(&lp.get_or_empty(field)));
                }
            } else if include_children && lp.child_has_data() {
                for child in lp.children.iter().filter(|c| c.has_data()) {
                    if !passes_all(filters, child) {
                        continue;
                    }
                    let source = if field == KEY_GAIN_ESTIMATE { lp } else { child };
                    out.push(CellValue::coerce(&source.get_or_empty(field)));
                }
            }
        }
        out
    }

    /// Sum one column over every row of the report, parents and children
    /// alike, skipping cells that do not coerce to a number.
    ///
    /// The export may list loops the profiled run never executed, so this
    /// can overestimate; the Advisor GUI summary is authoritative when
    /// that matters. This matches the upstream tool semantics on purpose.
    #[must_use]
    pub fn column_sum(&self, key: &str) -> f64 {
        self.column(key)
            .map_or(0.0, |cells| cells.iter().filter_map(|c| to_number(c)).sum())
    }
}
