use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};

use crc_cli::config::{Config, Overrides};
use crc_cli::pipeline::{self, CheckRun};
use crc_validate::Rule;

use crate::cli::{CheckArgs, ExtractArgs, ValidateArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

/// Spinner on stderr, hidden when stderr is not a terminal.
fn spinner() -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Prints the pre-check result; `Ok(false)` when the export is invalid.
pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    let message = pipeline::structure_message(&args.input)?;
    println!("{message}");
    Ok(message == "valid")
}

pub fn run_extract(args: &ExtractArgs, config: Config) -> Result<()> {
    let config = config.with_overrides(&Overrides {
        output_dir: args.output_dir.clone(),
        skip_structure_check: args.no_structure_check,
        ..Overrides::default()
    });
    let bar = spinner();
    bar.set_message("Extracting records");
    let result = pipeline::run_extract(&args.input, &config);
    bar.finish_and_clear();
    let exported = result?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    for entry in exported {
        table.add_row(vec![
            Cell::new(entry.kind.label()),
            Cell::new(entry.rows),
            Cell::new(entry.path.display()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check(args: &CheckArgs, config: Config) -> Result<CheckRun> {
    let config = config.with_overrides(&Overrides {
        output_dir: args.output_dir.clone(),
        reference_date: args.reference_date,
        rules: args.rules.clone(),
        sequential: args.sequential,
        skip_structure_check: args.no_structure_check,
    });
    let bar = spinner();
    let result = pipeline::run_check(&args.input, &config, args.dry_run, |stage| {
        bar.set_message(stage.message());
    });
    bar.finish_and_clear();
    result
}

pub fn run_rules() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Name"),
        header_cell("Family"),
        header_cell("Title"),
    ]);
    apply_table_style(&mut table);
    for rule in Rule::all() {
        let number = match rule.number() {
            Some(number) => Cell::new(number),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            number,
            Cell::new(rule.name()),
            Cell::new(rule.family()),
            Cell::new(rule.title()),
        ]);
    }
    println!("{table}");
}
