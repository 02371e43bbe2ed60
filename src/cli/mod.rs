//! Command-line interface for advisor-scope
//!
//! This module contains CLI argument parsing and configuration

pub mod args;

pub use args::{Args, Command};
