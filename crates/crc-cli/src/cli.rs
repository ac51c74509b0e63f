//! Command-line arguments for `crc-quality`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "crc-quality",
    version,
    about = "Normalize colorectal registry exports and run data-quality rules",
    long_about = "Validate the structure of a colorectal cancer registry XML export,\n\
                  extract patient records into entity tables, and evaluate the\n\
                  data-quality rule catalog over them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML configuration file; command-line flags take precedence.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the structural pre-check and print `valid` or the diagnostic.
    Validate(ValidateArgs),

    /// Validate, extract, and export one CSV per entity table.
    Extract(ExtractArgs),

    /// Run the full pipeline and print a rule summary.
    Check(CheckArgs),

    /// List the rule catalog.
    Rules,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Registry XML export.
    #[arg(value_name = "XML")]
    pub input: PathBuf,
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// Registry XML export.
    #[arg(value_name = "XML")]
    pub input: PathBuf,

    /// Output directory (default: `output/` next to the input).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip the structural pre-check.
    #[arg(long = "no-structure-check")]
    pub no_structure_check: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Registry XML export.
    #[arg(value_name = "XML")]
    pub input: PathBuf,

    /// Output directory (default: `output/` next to the input).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Date treated as "now" by the future-date rules (YYYY-MM-DD).
    #[arg(long = "reference-date", value_name = "DATE")]
    pub reference_date: Option<NaiveDate>,

    /// Evaluate only the named rule; repeat for several.
    #[arg(long = "rule", value_name = "NAME")]
    pub rules: Vec<String>,

    /// Evaluate rules one after another on the calling thread.
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Exit with status 3 when any warning rule reports violations.
    #[arg(long = "fail-on-violations")]
    pub fail_on_violations: bool,

    /// Skip the structural pre-check.
    #[arg(long = "no-structure-check")]
    pub no_structure_check: bool,

    /// Evaluate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
