//! advisor-scope - Main Entry Point
//!
//! Thin command dispatch over the library: parse a report (or the
//! SDE/VTune dumps), run the requested query, print or serialize the
//! result.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;

use advisor_scope::analysis::{exclude_file, sort_summaries, summarize, Filter};
use advisor_scope::cli::{Args, Command};
use advisor_scope::display::{render_loops, render_summaries};
use advisor_scope::export::{ScatterSeries, ScatterSpec, SeriesSource};
use advisor_scope::report::AdvisorReport;
use advisor_scope::roofline::{RooflineChart, RooflineDataset, SdeReport, VtuneReport};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.to_string().to_lowercase().contains("one --vtune and one --time") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

/// Build the filter list shared by `array` and `export`.
fn location_filters(file: Option<String>, lines: Option<Vec<i64>>) -> Vec<Filter> {
    let mut filters = Vec::new();
    if let Some(file) = file {
        filters.push(Filter::equals("file", &file));
    }
    if let Some(lines) = lines {
        filters.push(Filter::member_of("line", lines));
    }
    filters
}

fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Print { report, all, no_children } => {
            let report = AdvisorReport::from_file(&report)?;
            print!("{}", render_loops(&report, !no_children, !all));
        }

        Command::Summary { report, sort_by, exclude_file: excluded } => {
            let report = AdvisorReport::from_file(&report)?;
            let mut summaries = summarize(&report);
            if let Some(file) = excluded {
                let removed = exclude_file(&mut summaries, &file);
                if !args.quiet {
                    eprintln!("excluded {removed} loops from {file}");
                }
            }
            if let Some(key) = sort_by {
                sort_summaries(&mut summaries, key);
            }
            print!("{}", render_summaries(&summaries));
        }

        Command::Array { report, field, file, lines, no_children } => {
            let report = AdvisorReport::from_file(&report)?;
            let filters = location_filters(file, lines);
            for value in report.field_array(&field, !no_children, &filters) {
                println!("{value}");
            }
        }

        Command::Sum { report, key } => {
            let report = AdvisorReport::from_file(&report)?;
            println!("{}", report.column_sum(&key));
        }

        Command::Export { report, out, size_key, color_key, file, lines } => {
            let report = AdvisorReport::from_file(&report)?;
            let mut spec = ScatterSpec {
                filters: location_filters(file, lines),
                ..ScatterSpec::default()
            };
            if let Some(key) = size_key {
                spec.size = SeriesSource::Key(key);
            }
            if let Some(key) = color_key {
                spec.color = SeriesSource::Key(key);
            }
            let series = ScatterSeries::from_report(&report, &spec);

            let out_file = File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            series.write_json(BufWriter::new(out_file))?;
            if !args.quiet {
                println!("saved: {} ({} points)", out.display(), series.len());
            }
        }

        Command::Roofline { sde, vtune, time, machine, ncore, nsocket, out } => {
            anyhow::ensure!(
                sde.len() == vtune.len() && sde.len() == time.len(),
                "each --sde dump needs exactly one --vtune and one --time \
                 (got {} / {} / {})",
                sde.len(),
                vtune.len(),
                time.len()
            );
            let mut points = Vec::with_capacity(sde.len());
            for ((sde_path, vtune_path), elapsed) in sde.iter().zip(&vtune).zip(time) {
                let sde = SdeReport::from_file(sde_path)?;
                let vtune = VtuneReport::from_file(vtune_path)?;
                points.push(RooflineDataset::new(&sde, &vtune, elapsed)?);
            }
            let chart = RooflineChart::new(machine, ncore, nsocket, points);

            match out {
                Some(path) => {
                    let out_file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    chart.write_json(BufWriter::new(out_file))?;
                    if !args.quiet {
                        println!("saved: {}", path.display());
                    }
                }
                None => chart.write_json(std::io::stdout().lock())?,
            }
        }
    }
    Ok(())
}
