//! Tests for the rule catalog, the engine, and adjusted survival.

mod fixtures;

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use crc_model::{DrugExposure, EntityKind, Patient, RecordBundle, RegistryError};
use crc_validate::outcome::Evaluation;
use crc_validate::{RowTable, Rule, RuleEngine, RuleFamily, Value, adjusted_survival};
use fixtures::{date, diagnosed, outcome, tables, therapy, time};

fn registry() -> crc_model::EntityTables {
    tables(vec![
        RecordBundle {
            time_observation: Some(time(Some(10), date(2019, 12, 1))),
            radiation_therapies: vec![
                therapy(date(2020, 3, 1), date(2020, 2, 1)),
                therapy(date(2020, 5, 1), None),
            ],
            drug_exposures: vec![DrugExposure {
                concept_id: 0,
                source_value: Some("unknown".to_string()),
                start: date(2020, 2, 1),
                end: date(2020, 2, 1),
            }],
            ..diagnosed("first", date(2020, 1, 1))
        },
        RecordBundle {
            patient: Patient {
                birth_year: Some(2012),
                deceased: Some(true),
                ..fixtures::patient("second")
            },
            ..diagnosed("second", date(2025, 1, 1))
        },
        RecordBundle::new(Patient::default()),
    ])
}

// --- catalog ---

#[test]
fn catalog_names_are_unique_and_resolvable() {
    let mut names = HashSet::new();
    for rule in Rule::all() {
        assert!(names.insert(rule.name()), "duplicate name {}", rule.name());
        assert_eq!(Rule::from_name(rule.name()), Some(*rule));
    }
    assert_eq!(Rule::from_name("no_such_rule"), None);
}

#[test]
fn warnings_are_numbered_and_reports_are_not_scoped_by_accident() {
    let warnings: Vec<&Rule> = Rule::all()
        .iter()
        .filter(|rule| rule.family() == RuleFamily::Warning)
        .collect();
    assert!(warnings.iter().all(|rule| rule.number().is_some()));
    assert_eq!(Rule::Completeness.number(), None);
    assert_eq!(Rule::Uniqueness.scopes(), EntityKind::all());
    assert!(!Rule::CountsOfRecords.is_scoped());
    assert_eq!(
        Rule::EventAfterSurvival.scopes(),
        [
            EntityKind::RadiationTherapy,
            EntityKind::TargetedTherapy,
            EntityKind::Surgery,
            EntityKind::Response,
        ]
    );
}

// --- engine ---

#[test]
fn parallel_and_sequential_runs_agree() {
    let tables = registry();
    let sequential = RuleEngine::new(fixtures::options().with_parallel(false))
        .evaluate(&tables)
        .unwrap();
    let parallel = RuleEngine::new(fixtures::options().with_parallel(true))
        .evaluate(&tables)
        .unwrap();

    assert_eq!(sequential.outcomes.len(), parallel.outcomes.len());
    for (left, right) in sequential.outcomes.iter().zip(&parallel.outcomes) {
        assert_eq!(left.name, right.name);
        assert_eq!(
            (left.total, left.violations, left.uncomputed),
            (right.total, right.violations, right.uncomputed),
            "{}",
            left.name
        );
        assert!(left.rows.equals_missing(&right.rows), "{}", left.name);
    }
}

#[test]
fn full_run_covers_every_scope() {
    let tables = registry();
    let report = RuleEngine::new(fixtures::options()).evaluate(&tables).unwrap();

    let expected: usize = Rule::all()
        .iter()
        .map(|rule| rule.scopes().len().max(1))
        .sum();
    assert_eq!(report.outcomes.len(), expected);
    assert_eq!(report.patients, 3);
    assert_eq!(report.entities, tables.total_entities());
    assert!(report.has_warning_violations());

    let reversed = report
        .get("end_time_is_before_start_time_radiation_therapy")
        .unwrap();
    assert_eq!(reversed.violations, 1);
    assert_eq!(report.for_rule(Rule::TherapyBeforeDiagnosis).count(), 4);
    assert_eq!(report.get("too_young_patient").unwrap().violations, 1);
}

#[test]
fn rule_selection_keeps_catalog_order() {
    let options = fixtures::options().with_rules(vec![
        "sus_pharma".to_string(),
        "diagnosis_in_future".to_string(),
        "not_a_rule".to_string(),
    ]);
    let engine = RuleEngine::new(options);

    assert_eq!(
        engine.selected_rules(),
        [Rule::DiagnosisInFuture, Rule::SuspiciousPharma]
    );

    let report = engine.evaluate(&registry()).unwrap();
    let names: Vec<&str> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["diagnosis_in_future", "sus_pharma"]);
    assert_eq!(report.total_violations(), 2);
}

#[test]
fn empty_registry_yields_empty_outcomes() {
    let report = RuleEngine::new(fixtures::options())
        .evaluate(&tables(Vec::new()))
        .unwrap();

    assert!(!report.has_warning_violations());
    assert_eq!(report.total_violations(), 0);
    for outcome in &report.outcomes {
        if outcome.rule != Rule::CountsOfRecords {
            assert_eq!(outcome.rows.height(), 0, "{}", outcome.name);
        }
    }
}

// --- charts ---

#[test]
fn tally_chart_shape() {
    let result = outcome(Rule::DiagnosisInFuture, &registry());

    insta::assert_json_snapshot!(result.chart, @r#"
    {
      "Records": [
        "Number of records",
        "diagnosis_in_future"
      ],
      "Count": [
        2,
        1
      ]
    }
    "#);
}

// --- adjusted survival ---

#[test]
fn adjusted_survival_adds_the_delay_to_the_first_event() {
    let diagnosis = date(2020, 1, 1);
    let starts = [date(2020, 2, 1), date(2020, 1, 15), None];
    assert_eq!(adjusted_survival(diagnosis, Some(10), starts), Some(12.0));
    assert_eq!(adjusted_survival(diagnosis, Some(10), [None, None]), None);
    assert_eq!(adjusted_survival(None, Some(10), starts), None);
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

proptest! {
    #[test]
    fn adjusted_survival_ignores_event_order(
        offsets in prop::collection::vec(prop::option::of(0u64..2000), 1..12),
        weeks in 0i64..1000,
        rotation in 0usize..12,
    ) {
        let starts: Vec<Option<NaiveDate>> = offsets
            .iter()
            .map(|offset| offset.map(|days| base_date() + Days::new(days)))
            .collect();
        let mut rotated = starts.clone();
        rotated.rotate_left(rotation % starts.len());
        rotated.reverse();

        let diagnosis = Some(base_date());
        prop_assert_eq!(
            adjusted_survival(diagnosis, Some(weeks), starts),
            adjusted_survival(diagnosis, Some(weeks), rotated)
        );
    }
}

#[test]
fn misshapen_violation_row_fails_the_outcome() {
    let mut evaluation = Evaluation::with_table(RowTable::with_columns(&["kind", "count"]));
    evaluation.record(Some(true), || vec![Value::from("Patient")]);
    evaluation.record(Some(false), Vec::new);
    let error = evaluation
        .finish(Rule::CountsOfRecords, None)
        .unwrap_err();
    assert!(matches!(error, RegistryError::Frame(_)), "{error}");
}

#[test]
fn well_formed_rows_finish_cleanly() {
    let mut evaluation = Evaluation::with_table(RowTable::with_columns(&["kind", "count"]));
    evaluation.record(Some(true), || vec![Value::from("Patient"), Value::from(2usize)]);
    evaluation.record(None, Vec::new);
    let outcome = evaluation.finish(Rule::CountsOfRecords, None).unwrap();
    assert_eq!((outcome.total, outcome.violations, outcome.uncomputed), (2, 1, 1));
    assert_eq!(outcome.rows.height(), 1);
}
