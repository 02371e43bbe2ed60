//! CLI argument definitions

use crate::analysis::SummarySort;
use crate::roofline::Machine;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "advisor-scope",
    about = "Query Intel Advisor CSV exports and build roofline series",
    after_help = "\
EXAMPLES:
    advisor-scope print run1.csv
    advisor-scope array run1.csv --field ai --file current_deposition.F90 --lines 2681,2730
    advisor-scope sum run1.csv --key selftime
    advisor-scope export run1.csv --out scatter.json --size-key selftime
    advisor-scope roofline --sde sde.out --vtune vtune.out --time 1.8 --machine cori"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the loops of a report in a table
    Print {
        /// Advisor CSV export
        report: PathBuf,

        /// Include loops without measured roofline data
        #[arg(long)]
        all: bool,

        /// Hide child rows
        #[arg(long)]
        no_children: bool,
    },

    /// List the loops with data, fully coerced
    Summary {
        /// Advisor CSV export
        report: PathBuf,

        /// Sort order
        #[arg(long, value_enum)]
        sort_by: Option<SummarySort>,

        /// Drop loops from this source file
        #[arg(long, value_name = "FILE")]
        exclude_file: Option<String>,
    },

    /// Project one field into a flat array
    Array {
        /// Advisor CSV export
        report: PathBuf,

        /// Normalized field name (e.g. ai, gflops, selftime)
        #[arg(long)]
        field: String,

        /// Keep only loops from this source file
        #[arg(long)]
        file: Option<String>,

        /// Keep only loops at these source lines
        #[arg(long, value_delimiter = ',')]
        lines: Option<Vec<i64>>,

        /// Do not fall back to children when a loop lacks data
        #[arg(long)]
        no_children: bool,
    },

    /// Sum one column over every row of the report
    Sum {
        /// Advisor CSV export
        report: PathBuf,

        /// Normalized column name
        #[arg(long)]
        key: String,
    },

    /// Write a scatter series (x, y, size, color, labels) as JSON
    Export {
        /// Advisor CSV export
        report: PathBuf,

        /// Output path
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Column for marker sizes (fixed size when omitted)
        #[arg(long)]
        size_key: Option<String>,

        /// Column for marker colors (fixed color when omitted)
        #[arg(long)]
        color_key: Option<String>,

        /// Keep only loops from this source file
        #[arg(long)]
        file: Option<String>,

        /// Keep only loops at these source lines
        #[arg(long, value_delimiter = ',')]
        lines: Option<Vec<i64>>,
    },

    /// Combine SDE and VTune dumps into roofline chart JSON
    Roofline {
        /// SDE instruction-mix dump(s)
        #[arg(long, required = true, num_args = 1..)]
        sde: Vec<PathBuf>,

        /// VTune memory-traffic dump(s), one per SDE dump
        #[arg(long, required = true, num_args = 1..)]
        vtune: Vec<PathBuf>,

        /// Kernel runtime(s) in seconds, one per SDE dump
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        time: Vec<f64>,

        /// Peak table to draw ceilings from
        #[arg(long, value_enum, default_value_t = Machine::Cori)]
        machine: Machine,

        /// Core count for the compute peak
        #[arg(long, default_value_t = 32)]
        ncore: u32,

        /// Socket count for the bandwidth peak
        #[arg(long, default_value_t = 2)]
        nsocket: u32,

        /// Output path (stdout when omitted)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}
