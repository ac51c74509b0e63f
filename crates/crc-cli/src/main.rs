//! Colorectal registry quality CLI.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use crc_cli::config::Config;
use crc_cli::logging::{LogConfig, LogFormat, init_logging};
use crc_model::RegistryError;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_check, run_extract, run_rules, run_validate};
use crate::summary::print_check_summary;

/// Exit status for a failed pipeline.
const EXIT_FAILURE: u8 = 1;
/// Exit status when the export fails the structural pre-check.
const EXIT_STRUCTURAL: u8 = 2;
/// Exit status for `--fail-on-violations` with warning violations.
const EXIT_VIOLATIONS: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::from(EXIT_FAILURE);
    }
    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => return report_error(&error),
    };
    match cli.command {
        Command::Validate(args) => match run_validate(&args) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(EXIT_STRUCTURAL),
            Err(error) => report_error(&error),
        },
        Command::Extract(args) => match run_extract(&args, config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => report_error(&error),
        },
        Command::Check(args) => match run_check(&args, config) {
            Ok(run) => {
                print_check_summary(&run, args.dry_run);
                if args.fail_on_violations && run.report.has_warning_violations() {
                    ExitCode::from(EXIT_VIOLATIONS)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => report_error(&error),
        },
        Command::Rules => {
            run_rules();
            ExitCode::SUCCESS
        }
    }
}

fn report_error(error: &anyhow::Error) -> ExitCode {
    eprintln!("error: {error:#}");
    let structural = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<RegistryError>())
        .any(RegistryError::is_structural);
    if structural {
        ExitCode::from(EXIT_STRUCTURAL)
    } else {
        ExitCode::from(EXIT_FAILURE)
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
