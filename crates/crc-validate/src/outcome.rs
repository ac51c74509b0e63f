//! Per-rule results.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crc_model::{EntityKind, RegistryError, Result};

use crate::catalog::{Rule, RuleFamily};
use crate::frame::{RowSchema, RowTable, Value};

/// The `{"Records": [...], "Count": [...]}` shape consumed by chart adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(rename = "Records")]
    pub records: Vec<String>,
    #[serde(rename = "Count")]
    pub count: Vec<usize>,
}

impl ChartData {
    /// Default chart: number of records examined against violations.
    pub fn tally(name: &str, total: usize, violations: usize) -> Self {
        Self {
            records: vec!["Number of records".to_string(), name.to_string()],
            count: vec![total, violations],
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, usize)>) -> Self {
        let (records, count) = pairs.into_iter().unzip();
        Self { records, count }
    }
}

/// Result of one rule over one scope.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// `<rule>` or `<rule>_<scope>`.
    pub name: String,
    pub rule: Rule,
    pub scope: Option<EntityKind>,
    /// Rows examined, including uncomputed ones.
    pub total: usize,
    pub violations: usize,
    /// Rows whose verdict depended on an absent value.
    pub uncomputed: usize,
    /// Copies of the violating rows.
    pub rows: DataFrame,
    pub chart: ChartData,
}

impl RuleOutcome {
    pub fn family(&self) -> RuleFamily {
        self.rule.family()
    }

    pub fn has_violations(&self) -> bool {
        self.violations > 0
    }

    /// Rows examined that produced a verdict.
    pub fn computed(&self) -> usize {
        self.total - self.uncomputed
    }
}

/// Running tally for one rule evaluation.
///
/// Every examined row goes through [`Evaluation::record`]: `None` marks it
/// uncomputed, `Some(true)` a violation whose row is copied into the table.
/// The first row that does not fit the table fails [`Evaluation::finish`].
#[derive(Debug)]
pub struct Evaluation {
    total: usize,
    violations: usize,
    uncomputed: usize,
    table: RowTable,
    chart: Option<ChartData>,
    error: Option<RegistryError>,
}

impl Evaluation {
    pub fn new(schema: RowSchema) -> Self {
        Self::with_table(schema.table())
    }

    pub fn with_table(table: RowTable) -> Self {
        Self {
            total: 0,
            violations: 0,
            uncomputed: 0,
            table,
            chart: None,
            error: None,
        }
    }

    pub fn record(&mut self, verdict: Option<bool>, row: impl FnOnce() -> Vec<Value>) {
        self.total += 1;
        match verdict {
            None => self.uncomputed += 1,
            Some(true) => {
                self.violations += 1;
                self.push_row(row());
            }
            Some(false) => {}
        }
    }

    /// Replaces the default tally chart.
    pub fn set_chart(&mut self, chart: ChartData) {
        self.chart = Some(chart);
    }

    /// Counts rows examined outside [`Evaluation::record`].
    pub fn examined(&mut self, rows: usize) {
        self.total += rows;
    }

    /// Adds a row to the table without counting it as a violation.
    pub fn push_row(&mut self, row: Vec<Value>) {
        if let Err(error) = self.table.push(row)
            && self.error.is_none()
        {
            self.error = Some(error);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn violations(&self) -> usize {
        self.violations
    }

    pub fn finish(self, rule: Rule, scope: Option<EntityKind>) -> Result<RuleOutcome> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let name = rule.outcome_name(scope);
        let chart = self
            .chart
            .unwrap_or_else(|| ChartData::tally(&name, self.total, self.violations));
        Ok(RuleOutcome {
            rows: self.table.to_frame()?,
            name,
            rule,
            scope,
            total: self.total,
            violations: self.violations,
            uncomputed: self.uncomputed,
            chart,
        })
    }
}
