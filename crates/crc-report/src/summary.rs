//! Run summary and input fingerprint.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crc_validate::{RuleFamily, RuleOutcome, RuleReport};

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 of a file, read in buffered chunks.
pub fn file_sha256(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = reader
            .read(&mut buffer)
            .with_context(|| format!("read {}", path.display()))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Counts of one rule outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTally {
    pub name: String,
    pub family: RuleFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    pub total: usize,
    pub violations: usize,
    pub uncomputed: usize,
}

impl From<&RuleOutcome> for RuleTally {
    fn from(outcome: &RuleOutcome) -> Self {
        Self {
            name: outcome.name.clone(),
            family: outcome.family(),
            number: outcome.rule.number(),
            total: outcome.total,
            violations: outcome.violations,
            uncomputed: outcome.uncomputed,
        }
    }
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub input: String,
    pub input_sha256: String,
    pub reference_date: NaiveDate,
    pub patients: usize,
    pub entities: usize,
    pub violations: usize,
    pub rules: Vec<RuleTally>,
}

impl RunSummary {
    pub fn new(
        input: &Path,
        input_sha256: String,
        reference_date: NaiveDate,
        report: &RuleReport,
    ) -> Self {
        Self {
            input: input.display().to_string(),
            input_sha256,
            reference_date,
            patients: report.patients,
            entities: report.entities,
            violations: report.total_violations(),
            rules: report.outcomes.iter().map(RuleTally::from).collect(),
        }
    }
}

/// Writes `<dir>/summary.json`.
pub fn write_run_summary(dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join("summary.json");
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        patients = summary.patients,
        violations = summary.violations,
        "run summary written"
    );
    Ok(path)
}
