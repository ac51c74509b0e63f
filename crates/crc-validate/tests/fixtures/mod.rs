//! Entity builders shared by the rule tests.

#![allow(dead_code)]

use chrono::NaiveDate;

use crc_model::{
    Coding, Condition, EntityKind, EntityTables, Patient, RecordBundle, RuleOptions, Surgery,
    Therapy, TimeObservation,
};
use crc_validate::{Rule, RuleOutcome, evaluate_rule};

pub fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Evaluation options pinned to 2024-01-01.
pub fn options() -> RuleOptions {
    RuleOptions::new()
        .with_reference_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .with_parallel(false)
}

pub fn patient(identifier: &str) -> Patient {
    Patient {
        identifier: Some(identifier.to_string()),
        sex: Some("female".to_string()),
        birth_year: Some(1960),
        deceased: Some(false),
        deceased_at: None,
    }
}

pub fn condition(localization: &str, diagnosis: Option<NaiveDate>) -> Condition {
    Condition {
        code: crc_map::condition_code(localization),
        localization: Some(localization.to_string()),
        diagnosis_date: diagnosis,
    }
}

/// A patient diagnosed with a sigmoid colon tumor on `diagnosis`.
pub fn diagnosed(identifier: &str, diagnosis: Option<NaiveDate>) -> RecordBundle {
    RecordBundle {
        condition: Some(condition("Sigmoid colon - C18.7", diagnosis)),
        ..RecordBundle::new(patient(identifier))
    }
}

pub fn time(weeks: Option<i64>, last_update: Option<NaiveDate>) -> TimeObservation {
    TimeObservation {
        overall_survival_weeks: weeks,
        last_update,
    }
}

pub fn therapy(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Therapy {
    Therapy { start, end }
}

pub fn surgery(type_source: &str, location: &str, start: Option<NaiveDate>) -> Surgery {
    let mapping = crc_map::surgery_type(Some(type_source), None);
    Surgery {
        start,
        type_source: Some(type_source.to_string()),
        surgery_type: mapping.coding,
        radicality: crc_map::radicality("R0"),
        body_site: crc_map::body_site(location),
        note: mapping.note,
    }
}

pub fn coding(code: &str) -> Option<Coding> {
    Some(Coding::new(code, code))
}

pub fn tables(bundles: Vec<RecordBundle>) -> EntityTables {
    EntityTables::from_bundles(bundles)
}

/// Outcome of an unscoped rule.
pub fn outcome(rule: Rule, tables: &EntityTables) -> RuleOutcome {
    let mut outcomes = evaluate_rule(rule, tables, &options()).unwrap();
    assert_eq!(outcomes.len(), 1, "{rule} is scoped");
    outcomes.remove(0)
}

/// Outcome of one scope of a scoped rule.
pub fn scoped(rule: Rule, scope: EntityKind, tables: &EntityTables) -> RuleOutcome {
    evaluate_rule(rule, tables, &options())
        .unwrap()
        .into_iter()
        .find(|outcome| outcome.scope == Some(scope))
        .unwrap()
}

/// Values of a text column of the violating rows.
pub fn texts(outcome: &RuleOutcome, column: &str) -> Vec<Option<String>> {
    outcome
        .rows
        .column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect()
}

/// Subject keys of the violating rows.
pub fn subjects(outcome: &RuleOutcome) -> Vec<String> {
    texts(outcome, "subject").into_iter().flatten().collect()
}

/// `(total, violations, uncomputed)`.
pub fn tally(outcome: &RuleOutcome) -> (usize, usize, usize) {
    (outcome.total, outcome.violations, outcome.uncomputed)
}
