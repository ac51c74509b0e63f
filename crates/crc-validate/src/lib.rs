//! Data-quality rule catalog and evaluation engine.
//!
//! Rules read re-materialized [`crc_model::EntityTables`] and never mutate
//! them. Each rule produces a [`RuleOutcome`]: rows examined, violations,
//! rows left uncomputed because a value they depend on is absent, and copies
//! of the violating rows as a polars `DataFrame`.
//!
//! - **catalog**: rule names, titles, families and scopes
//! - **context**: shared read-only lookups and adjusted survival
//! - **frame**: violating-row tables
//! - **engine**: rule selection and (parallel) evaluation

pub mod catalog;
pub mod context;
pub mod engine;
pub mod frame;
pub mod outcome;
mod rules;
pub mod survival;

pub use catalog::{Rule, RuleFamily};
pub use context::RuleContext;
pub use engine::{RuleEngine, RuleReport};
pub use frame::{RowTable, Value};
pub use outcome::{ChartData, RuleOutcome};
pub use survival::adjusted_survival;

use crc_model::{EntityTables, Result, RuleOptions};

/// Evaluates a single rule over all of its scopes.
pub fn evaluate_rule(
    rule: Rule,
    tables: &EntityTables,
    options: &RuleOptions,
) -> Result<Vec<RuleOutcome>> {
    let context = RuleContext::new(tables, options);
    rules::evaluate(rule, &context)
}
