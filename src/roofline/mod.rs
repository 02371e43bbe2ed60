//! Roofline inputs and ceiling series
//!
//! SDE and VTune diagnostic dumps are line-oriented `key = value` text
//! produced by the instruction-mix and memory-traffic collection scripts.
//! This module extracts the two scalar throughput totals (Gflops moved by
//! the FP units, Gbytes moved by the memory system), combines them into
//! arithmetic-intensity datasets, and samples the machine ceilings into
//! plain numeric series for a plotting frontend. No plotting happens
//! here.

use crate::domain::RooflineError;
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-width FP operation counters SDE reports alongside the totals.
const FP_BREAKDOWN_KEYS: [&str; 8] = [
    "fp_double_1",
    "fp_double_2",
    "fp_double_4",
    "fp_double_8",
    "fp_single_1",
    "fp_single_2",
    "fp_single_4",
    "fp_single_8",
];

/// Totals extracted from an SDE instruction-mix dump.
#[derive(Debug, Clone, PartialEq)]
pub struct SdeReport {
    pub path: PathBuf,
    /// Total FP operations, in Gflops.
    pub gflops: f64,
    /// Total bytes read, in Gbytes (L1 traffic).
    pub gbytes: f64,
    /// Per-vector-width FP op counts in Gflops, where present.
    pub fp_breakdown: BTreeMap<String, f64>,
}

impl SdeReport {
    /// Parse an SDE dump.
    ///
    /// # Errors
    ///
    /// I/O failures, and [`RooflineError::MissingCounter`] when either
    /// mandatory total is absent.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RooflineError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path)?;

        let mut gflops = None;
        let mut gbytes = None;
        let mut fp_breakdown = BTreeMap::new();

        for line in text.lines() {
            if let Some(value) = counter_value(line, "Total FLOPs") {
                gflops = Some(parse_giga("Total FLOPs", &path, value)?);
            } else if let Some(value) = counter_value(line, "Total Bytes read") {
                gbytes = Some(parse_giga("Total Bytes read", &path, value)?);
            } else {
                for key in FP_BREAKDOWN_KEYS {
                    let Some(value) = counter_value(line, key) else { continue };
                    match value.trim().parse::<i64>() {
                        #[allow(clippy::cast_precision_loss)]
                        Ok(n) => {
                            fp_breakdown.insert(key.to_string(), n as f64 * 1e-9);
                        }
                        Err(_) => warn!("skipping malformed counter {key:?}: {value:?}"),
                    }
                    break;
                }
            }
        }

        let gflops = gflops
            .ok_or(RooflineError::MissingCounter { counter: "Total FLOPs", path: path.clone() })?;
        let gbytes = gbytes.ok_or(RooflineError::MissingCounter {
            counter: "Total Bytes read",
            path: path.clone(),
        })?;
        Ok(SdeReport { path, gflops, gbytes, fp_breakdown })
    }
}

/// Total extracted from a VTune memory-traffic dump.
#[derive(Debug, Clone, PartialEq)]
pub struct VtuneReport {
    pub path: PathBuf,
    /// Total DRAM bytes, in Gbytes.
    pub gbytes: f64,
}

impl VtuneReport {
    /// Parse a VTune dump.
    ///
    /// # Errors
    ///
    /// I/O failures, and [`RooflineError::MissingCounter`] when the
    /// `Total Bytes` line is absent.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RooflineError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path)?;
        for line in text.lines() {
            if let Some(value) = counter_value(line, "Total Bytes") {
                let gbytes = parse_giga("Total Bytes", &path, value)?;
                return Ok(VtuneReport { path, gbytes });
            }
        }
        Err(RooflineError::MissingCounter { counter: "Total Bytes", path })
    }
}

/// Match one `key = value` line and return the value text.
fn counter_value<'a>(line: &'a str, counter: &str) -> Option<&'a str> {
    if !line.contains(counter) {
        return None;
    }
    line.split_once('=').map(|(_, value)| value)
}

/// Parse an integer counter and scale to giga-units.
#[allow(clippy::cast_precision_loss)]
fn parse_giga(counter: &'static str, path: &Path, raw: &str) -> Result<f64, RooflineError> {
    raw.trim().parse::<i64>().map(|n| n as f64 * 1e-9).map_err(|_| {
        RooflineError::MalformedCounter { counter, path: path.to_path_buf(), raw: raw.to_string() }
    })
}

/// One measured kernel: SDE flops against VTune DRAM traffic over the
/// kernel's wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RooflineDataset {
    /// Flops per DRAM byte.
    pub ai_dram: f64,
    /// Flops per L1 byte (SDE sees the traffic closest to the core).
    pub ai_l1: f64,
    /// Achieved performance in Gflop/s.
    pub gflops_per_sec: f64,
}

impl RooflineDataset {
    /// Combine one SDE and one VTune dump with the kernel runtime.
    ///
    /// # Errors
    ///
    /// [`RooflineError::InvalidElapsed`] when `elapsed_secs` is not
    /// positive.
    pub fn new(
        sde: &SdeReport,
        vtune: &VtuneReport,
        elapsed_secs: f64,
    ) -> Result<Self, RooflineError> {
        if elapsed_secs <= 0.0 {
            return Err(RooflineError::InvalidElapsed(elapsed_secs));
        }
        Ok(RooflineDataset {
            ai_dram: sde.gflops / vtune.gbytes,
            ai_l1: sde.gflops / sde.gbytes,
            gflops_per_sec: sde.gflops / elapsed_secs,
        })
    }
}

/// Machines with known peak tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Machine {
    /// Cori (Haswell partition).
    Cori,
    /// Edison (Ivy Bridge).
    Edison,
    /// Carl KNL white boxes, MCDRAM flat mode.
    CarlMcdram,
    /// Carl KNL white boxes, DDR only.
    CarlDdr,
}

impl Machine {
    /// Peak compute in Gflop/s for `ncore` cores.
    #[must_use]
    pub fn peak_gflops(self, ncore: u32) -> f64 {
        let per_core = match self {
            Machine::Cori => 36.8,
            Machine::Edison => 19.2,
            Machine::CarlMcdram | Machine::CarlDdr => 2252.0 / 64.0,
        };
        per_core * f64::from(ncore)
    }

    /// Peak memory bandwidth in Gbyte/s for `nsocket` sockets.
    #[must_use]
    pub fn peak_bandwidth(self, nsocket: u32) -> f64 {
        let per_socket = match self {
            Machine::Cori => 68.0,
            Machine::Edison => 25.6,
            Machine::CarlMcdram => 460.0,
            Machine::CarlDdr => 90.0,
        };
        per_socket * f64::from(nsocket)
    }
}

/// One sampled ceiling: `min(peak / divisor, ai * bandwidth)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ceiling {
    pub label: &'static str,
    /// Fraction of full peak this ceiling represents (1 = full peak).
    pub divisor: u32,
    pub gflops: Vec<f64>,
}

/// Divisor ladder from scalar no-FMA up to full vector+FMA peak.
const CEILING_LADDER: [(u32, &str); 4] =
    [(8, "scalar"), (4, "fma"), (2, "vectorized"), (1, "vectorized+fma")];

/// Sample the four standard ceilings over the given AI axis.
#[must_use]
pub fn ceilings(peak_gflops: f64, peak_bandwidth: f64, ai: &[f64]) -> Vec<Ceiling> {
    CEILING_LADDER
        .iter()
        .map(|&(divisor, label)| Ceiling {
            label,
            divisor,
            gflops: ai
                .iter()
                .map(|&x| (peak_gflops / f64::from(divisor)).min(x * peak_bandwidth))
                .collect(),
        })
        .collect()
}

/// Log-spaced AI axis: `num` points from `10^start_exp` to `10^end_exp`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn log_space(start_exp: f64, end_exp: f64, num: usize) -> Vec<f64> {
    if num == 0 {
        return Vec::new();
    }
    if num == 1 {
        return vec![10f64.powf(start_exp)];
    }
    let step = (end_exp - start_exp) / (num - 1) as f64;
    (0..num).map(|i| 10f64.powf(start_exp + step * i as f64)).collect()
}

/// Default AI axis used by the exporter: 200 points over `[0.1, ~31.6]`.
#[must_use]
pub fn default_ai_axis() -> Vec<f64> {
    log_space(-1.0, 1.5, 200)
}

/// Everything a plotting frontend needs for one roofline figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RooflineChart {
    pub ai: Vec<f64>,
    pub ceilings: Vec<Ceiling>,
    pub points: Vec<RooflineDataset>,
}

impl RooflineChart {
    /// Assemble ceilings and measured points over the default AI axis.
    #[must_use]
    pub fn new(machine: Machine, ncore: u32, nsocket: u32, points: Vec<RooflineDataset>) -> Self {
        let ai = default_ai_axis();
        let ceilings =
            ceilings(machine.peak_gflops(ncore), machine.peak_bandwidth(nsocket), &ai);
        RooflineChart { ai, ceilings, points }
    }

    /// Serialize as JSON for the plotting collaborator.
    ///
    /// # Errors
    ///
    /// Serialization or write failures.
    pub fn write_json(&self, writer: impl std::io::Write) -> Result<(), crate::domain::ExportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
