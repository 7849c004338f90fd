//! CLI argument definitions using clap
//!
//! Commands:
//! - olm list
//! - olm get <outbreak> [--output <path>]
//! - olm lint [<outbreak>] [--data <src>] [--schema <src>] [--ignore a,b]

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// olm - check outbreak linelists against their schema
#[derive(Parser, Debug)]
#[command(name = "olm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to an outbreak registry file, replacing the built-in outbreaks
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Log progress to stderr (-v for info, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List known outbreaks
    List,

    /// Download the latest linelist of an outbreak
    Get {
        /// Outbreak name
        outbreak: String,

        /// Output file (default: <outbreak>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a linelist against its schema
    Lint(LintArgs),
}

/// Arguments of `olm lint`
#[derive(Args, Debug, Clone, Default)]
pub struct LintArgs {
    /// Outbreak name; supplies default data and schema locations
    pub outbreak: Option<String>,

    /// Linelist path or URL
    #[arg(long)]
    pub data: Option<String>,

    /// Schema path or URL
    #[arg(long)]
    pub schema: Option<String>,

    /// Comma-separated field names to ignore
    #[arg(long, default_value = "")]
    pub ignore: String,

    /// Column identifying rows in the report
    #[arg(long)]
    pub id_column: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Output format of `olm lint`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
