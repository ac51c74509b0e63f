use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crc_cli::pipeline::CheckRun;
use crc_validate::{RuleFamily, RuleOutcome};

pub fn print_check_summary(run: &CheckRun, dry_run: bool) {
    println!("Input: {}", run.summary.input);
    println!("SHA-256: {}", run.summary.input_sha256);
    println!("Reference date: {}", run.summary.reference_date);
    println!(
        "Patients: {}  Entities: {}",
        run.report.patients, run.report.entities
    );
    if dry_run {
        println!("Output: (dry run)");
    } else {
        println!(
            "Output: {} ({} files)",
            run.output_dir.display(),
            run.outputs.len()
        );
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Rule"),
        header_cell("Family"),
        header_cell("Total"),
        header_cell("Violations"),
        header_cell("Uncomputed"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut total_violations = 0usize;
    for outcome in &run.report.outcomes {
        total_violations += outcome.violations;
        table.add_row(outcome_row(outcome));
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(total_violations, Color::Red).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!("Finished in {:.2}s", run.duration.as_secs_f64());
}

fn outcome_row(outcome: &RuleOutcome) -> Vec<Cell> {
    let number = match outcome.rule.number() {
        Some(number) => Cell::new(number),
        None => dim_cell("-"),
    };
    let (family, color) = match outcome.family() {
        RuleFamily::Warning => (Cell::new("warning").fg(Color::Yellow), Color::Red),
        RuleFamily::Report => (Cell::new("report").fg(Color::Blue), Color::Yellow),
    };
    vec![
        number,
        Cell::new(&outcome.name),
        family,
        Cell::new(outcome.total),
        count_cell(outcome.violations, color),
        count_cell(outcome.uncomputed, Color::DarkGrey),
    ]
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
