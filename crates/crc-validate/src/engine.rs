//! Rule engine: selects rules from the catalog and evaluates them over the
//! entity tables.
//!
//! Rules share nothing but the read-only [`RuleContext`], so with
//! `parallel` enabled they run on the rayon pool and their outcomes are
//! joined at the end in catalog order.

use std::time::Instant;

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, info_span, warn};

use crc_model::{EntityTables, Result, RuleOptions};

use crate::catalog::{Rule, RuleFamily};
use crate::context::RuleContext;
use crate::outcome::RuleOutcome;
use crate::rules;

/// Outcomes of one evaluation run, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct RuleReport {
    pub outcomes: Vec<RuleOutcome>,
    pub patients: usize,
    pub entities: usize,
}

impl RuleReport {
    pub fn get(&self, name: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    /// Outcomes of one rule, one per scope.
    pub fn for_rule(&self, rule: Rule) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes
            .iter()
            .filter(move |outcome| outcome.rule == rule)
    }

    pub fn total_violations(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.violations).sum()
    }

    /// Whether any warning rule flagged at least one row.
    pub fn has_warning_violations(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.family() == RuleFamily::Warning && outcome.has_violations())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    options: RuleOptions,
}

impl RuleEngine {
    pub fn new(options: RuleOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// Catalog rules selected by the options, in catalog order.
    pub fn selected_rules(&self) -> Vec<Rule> {
        for name in &self.options.rules {
            if Rule::from_name(name).is_none() {
                warn!(rule = %name, "unknown rule name ignored");
            }
        }
        Rule::all()
            .iter()
            .copied()
            .filter(|rule| self.options.selects(rule.name()))
            .collect()
    }

    pub fn evaluate(&self, tables: &EntityTables) -> Result<RuleReport> {
        let span = info_span!(
            "evaluate",
            patients = tables.patient_count(),
            parallel = self.options.parallel
        );
        let _guard = span.enter();
        let started = Instant::now();

        let context = RuleContext::new(tables, &self.options);
        let rules = self.selected_rules();
        let evaluate = |rule: &Rule| -> Result<Vec<RuleOutcome>> {
            let outcomes = rules::evaluate(*rule, &context)?;
            for outcome in &outcomes {
                debug!(
                    rule = %outcome.name,
                    total = outcome.total,
                    violations = outcome.violations,
                    uncomputed = outcome.uncomputed,
                    "rule evaluated"
                );
            }
            Ok(outcomes)
        };

        let grouped: Vec<Vec<RuleOutcome>> = if self.options.parallel {
            rules.par_iter().map(evaluate).collect::<Result<_>>()?
        } else {
            rules.iter().map(evaluate).collect::<Result<_>>()?
        };
        let outcomes: Vec<RuleOutcome> = grouped.into_iter().flatten().collect();

        let report = RuleReport {
            patients: tables.patient_count(),
            entities: tables.total_entities(),
            outcomes,
        };
        info!(
            rules = rules.len(),
            outcomes = report.outcomes.len(),
            violations = report.total_violations(),
            duration_ms = started.elapsed().as_millis(),
            "rule evaluation complete"
        );
        Ok(report)
    }
}
