use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crc_validate::RuleOutcome;

/// Writes `<dir>/<name>.json` holding the outcome's chart data.
pub fn write_chart_json(dir: &Path, outcome: &RuleOutcome) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", outcome.name));
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &outcome.chart)
        .with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(rule = %outcome.name, path = %path.display(), "chart written");
    Ok(path)
}
