//! Run configuration: an optional TOML file with command-line flags on top.
//!
//! ```toml
//! [rules]
//! reference_date = "2024-01-31"
//! parallel = true
//! rules = ["diagnosis_in_future"]
//!
//! [extract]
//! validate_structure = true
//!
//! [output]
//! dir = "quality"
//! rules = true
//! summary = true
//! entities = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crc_model::{ExtractOptions, RuleOptions};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RuleOptions,
    pub extract: ExtractOptions,
    pub output: OutputOptions,
}

/// Which outputs a check run writes, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Defaults to `output/` next to the input file.
    pub dir: Option<PathBuf>,
    /// Chart JSON and violations CSV per rule outcome.
    pub rules: bool,
    pub summary: bool,
    /// Flat CSV per entity table.
    pub entities: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: None,
            rules: true,
            summary: true,
            entities: false,
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub reference_date: Option<NaiveDate>,
    pub rules: Vec<String>,
    pub sequential: bool,
    pub skip_structure_check: bool,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// The file at `path`, or the defaults when no file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(dir) = &overrides.output_dir {
            self.output.dir = Some(dir.clone());
        }
        if let Some(date) = overrides.reference_date {
            self.rules.reference_date = date;
        }
        if !overrides.rules.is_empty() {
            self.rules.rules = overrides.rules.clone();
        }
        if overrides.sequential {
            self.rules.parallel = false;
        }
        if overrides.skip_structure_check {
            self.extract.validate_structure = false;
        }
        self
    }

    pub fn output_dir(&self, input: &Path) -> PathBuf {
        self.output.dir.clone().unwrap_or_else(|| {
            input
                .parent()
                .map_or_else(|| PathBuf::from("output"), |parent| parent.join("output"))
        })
    }
}
