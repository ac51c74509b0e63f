//! Extraction, evaluation and output stages behind the subcommands.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use crc_ingest::{XmlDocument, load_bundles_from_path, validation_message};
use crc_model::{EntityTables, ExtractOptions, RecordBundle};
use crc_report::{
    ExportedTable, RunSummary, export_entities, file_sha256, write_rule_outputs,
    write_run_summary,
};
use crc_validate::{RuleEngine, RuleReport};

use crate::config::Config;
use crate::logging::redact_value;

/// Pipeline stages, reported to the caller as they start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fingerprint,
    Extract,
    Evaluate,
    Write,
}

impl Stage {
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Fingerprint => "Hashing input",
            Self::Extract => "Extracting records",
            Self::Evaluate => "Evaluating rules",
            Self::Write => "Writing outputs",
        }
    }
}

/// Result of the structural pre-check on a file.
pub fn structure_message(input: &Path) -> Result<String> {
    let xml = std::fs::read_to_string(input)
        .with_context(|| format!("read {}", input.display()))?;
    let document =
        XmlDocument::parse(&xml).with_context(|| format!("parse {}", input.display()))?;
    Ok(validation_message(&document.root))
}

pub fn load_tables(input: &Path, options: &ExtractOptions) -> Result<EntityTables> {
    let bundles = load_bundles_from_path(input, options)
        .with_context(|| format!("extract {}", input.display()))?;
    for bundle in &bundles {
        debug!(
            identifier = redact_value(bundle.patient.identifier.as_deref().unwrap_or("")),
            entities = bundle.entity_count(),
            "patient loaded"
        );
    }
    info!(
        patients = bundles.len(),
        entities = bundles.iter().map(RecordBundle::entity_count).sum::<usize>(),
        "records extracted"
    );
    Ok(EntityTables::from_bundles(bundles))
}

/// Extracts `input` and writes one CSV per entity table.
pub fn run_extract(input: &Path, config: &Config) -> Result<Vec<ExportedTable>> {
    let span = info_span!("extract_command", input = %input.display());
    let _guard = span.enter();
    let tables = load_tables(input, &config.extract)?;
    export_entities(&config.output_dir(input).join("entities"), &tables)
}

pub struct CheckRun {
    pub tables: EntityTables,
    pub report: RuleReport,
    pub summary: RunSummary,
    /// Files written; empty on a dry run.
    pub outputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub duration: Duration,
}

/// Full pipeline: fingerprint, extract, evaluate, and write outputs unless
/// `dry_run` is set.
pub fn run_check(
    input: &Path,
    config: &Config,
    dry_run: bool,
    mut on_stage: impl FnMut(Stage),
) -> Result<CheckRun> {
    let span = info_span!("check", input = %input.display(), dry_run);
    let _guard = span.enter();
    let started = Instant::now();

    on_stage(Stage::Fingerprint);
    let fingerprint = file_sha256(input)?;

    on_stage(Stage::Extract);
    let tables = load_tables(input, &config.extract)?;

    on_stage(Stage::Evaluate);
    let report = RuleEngine::new(config.rules.clone())
        .evaluate(&tables)
        .context("evaluate rules")?;
    let summary = RunSummary::new(input, fingerprint, config.rules.reference_date, &report);

    let output_dir = config.output_dir(input);
    let mut outputs = Vec::new();
    if dry_run {
        info!("dry run, no outputs written");
    } else {
        on_stage(Stage::Write);
        if config.output.rules {
            outputs.extend(write_rule_outputs(&output_dir, &report)?);
        }
        if config.output.entities {
            let exported = export_entities(&output_dir.join("entities"), &tables)?;
            outputs.extend(exported.into_iter().map(|table| table.path));
        }
        if config.output.summary {
            outputs.push(write_run_summary(&output_dir, &summary)?);
        }
    }

    let duration = started.elapsed();
    info!(
        patients = report.patients,
        outcomes = report.outcomes.len(),
        violations = report.total_violations(),
        files = outputs.len(),
        duration_ms = duration.as_millis(),
        "check complete"
    );
    Ok(CheckRun {
        tables,
        report,
        summary,
        outputs,
        output_dir,
        duration,
    })
}
