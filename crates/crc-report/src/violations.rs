use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, SerWriter};

use crc_validate::RuleOutcome;

/// Writes `<dir>/<name>.csv` with the violating rows.
///
/// The header row is written even when the rule flagged nothing.
pub fn write_violations_csv(dir: &Path, outcome: &RuleOutcome) -> Result<PathBuf> {
    let path = dir.join(format!("{}.csv", outcome.name));
    let mut file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let mut rows = outcome.rows.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut rows)
        .with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(
        rule = %outcome.name,
        rows = rows.height(),
        path = %path.display(),
        "violations written"
    );
    Ok(path)
}
