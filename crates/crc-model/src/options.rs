//! Configuration options for extraction and rule evaluation.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Options controlling rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// The "now" used by every rule that flags dates in the future.
    ///
    /// Defaults to the local current date; pin it for reproducible runs.
    pub reference_date: NaiveDate,

    /// Evaluate rules on worker threads.
    pub parallel: bool,

    /// Rule names to evaluate. Empty means the whole catalog.
    pub rules: Vec<String>,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            reference_date: Local::now().date_naive(),
            parallel: true,
            rules: Vec::new(),
        }
    }
}

impl RuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Vec<String>) -> Self {
        self.rules = rules;
        self
    }

    /// Whether the rule called `name` is selected.
    pub fn selects(&self, name: &str) -> bool {
        self.rules.is_empty() || self.rules.iter().any(|rule| rule == name)
    }
}

/// Options controlling extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Run the structural pre-check before extracting.
    pub validate_structure: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            validate_structure: true,
        }
    }
}
