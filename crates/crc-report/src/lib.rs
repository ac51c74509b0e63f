//! Output adapters for registry quality runs.
//!
//! - **chart**: `{"Records": [...], "Count": [...]}` JSON per rule outcome
//! - **violations**: CSV copies of the violating rows
//! - **summary**: run summary with the input fingerprint and per-rule tallies
//! - **entities**: flat CSV export of every entity table

mod chart;
mod entities;
mod summary;
mod violations;

pub use chart::write_chart_json;
pub use entities::{ExportedTable, export_entities};
pub use summary::{RuleTally, RunSummary, file_sha256, sha256_hex, write_run_summary};
pub use violations::write_violations_csv;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crc_validate::RuleReport;

/// Writes the chart JSON and violations CSV of every outcome in `report`.
pub fn write_rule_outputs(output_dir: &Path, report: &RuleReport) -> Result<Vec<PathBuf>> {
    let charts = output_dir.join("charts");
    let violations = output_dir.join("violations");
    for dir in [&charts, &violations] {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }

    let mut outputs = Vec::with_capacity(report.outcomes.len() * 2);
    for outcome in &report.outcomes {
        outputs.push(write_chart_json(&charts, outcome)?);
        outputs.push(write_violations_csv(&violations, outcome)?);
    }
    tracing::info!(files = outputs.len(), dir = %output_dir.display(), "rule outputs written");
    Ok(outputs)
}
