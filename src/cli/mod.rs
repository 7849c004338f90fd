//! CLI module for olm
//!
//! Provides command-line interface for:
//! - list: Show known outbreaks
//! - get: Download an outbreak's latest linelist
//! - lint: Check a linelist against its schema

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, LintArgs, ReportFormat};
pub use commands::{get, lint, list, run, run_command, severity_for, Context, Outcome};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_file, write_line};
