//! Query engine: filters, projections and summaries

pub mod filter;
pub mod query;
pub mod summary;

pub use filter::{passes_all, CustomPredicate, Filter, FilterValue, Predicate, TypeMismatch};
pub use summary::{exclude_file, sort_summaries, summarize, LoopSummary, SummarySort};
