//! Tests for the output writers, against a temporary directory.

use std::fs;

use chrono::NaiveDate;

use crc_model::{Condition, EntityKind, EntityTables, Patient, RecordBundle, RuleOptions, Therapy};
use crc_report::{
    RunSummary, export_entities, file_sha256, sha256_hex, write_chart_json, write_rule_outputs,
    write_run_summary, write_violations_csv,
};
use crc_validate::{ChartData, Rule, RuleEngine, evaluate_rule};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn options() -> RuleOptions {
    RuleOptions::new()
        .with_reference_date(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"))
        .with_parallel(false)
}

fn registry() -> EntityTables {
    let patient = Patient {
        identifier: Some("P-001".to_string()),
        sex: Some("male".to_string()),
        birth_year: Some(1955),
        deceased: Some(false),
        deceased_at: None,
    };
    EntityTables::from_bundles(vec![
        RecordBundle {
            condition: Some(Condition {
                code: crc_map::condition_code("Rectum - C20"),
                localization: Some("Rectum - C20".to_string()),
                diagnosis_date: date(2025, 2, 1),
            }),
            radiation_therapies: vec![
                Therapy {
                    start: date(2020, 3, 1),
                    end: date(2020, 2, 1),
                },
                Therapy {
                    start: date(2020, 3, 1),
                    end: None,
                },
            ],
            ..RecordBundle::new(patient)
        },
        RecordBundle::new(Patient::default()),
    ])
}

fn single(rule: Rule, tables: &EntityTables) -> crc_validate::RuleOutcome {
    evaluate_rule(rule, tables, &options())
        .expect("rule evaluates")
        .remove(0)
}

// --- charts and violations ---

#[test]
fn chart_json_round_trips_through_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let outcome = single(Rule::DiagnosisInFuture, &registry());

    let path = write_chart_json(dir.path(), &outcome).expect("write chart");
    assert_eq!(path.file_name().unwrap(), "diagnosis_in_future.json");

    let text = fs::read_to_string(&path).expect("read chart");
    let chart: ChartData = serde_json::from_str(&text).expect("parse chart");
    assert_eq!(chart.records, ["Number of records", "diagnosis_in_future"]);
    assert_eq!(chart.count, [1, 1]);
    assert!(text.contains("\"Records\""));
}

#[test]
fn violations_csv_holds_the_flagged_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let outcome = single(Rule::DiagnosisInFuture, &registry());

    let path = write_violations_csv(dir.path(), &outcome).expect("write csv");
    let text = fs::read_to_string(path).expect("read csv");
    let mut lines = text.lines();

    let header = lines.next().expect("header");
    assert!(header.starts_with("subject,condition_id,condition_code"));
    let row = lines.next().expect("violating row");
    assert!(row.starts_with("Patient/1,Condition/1,C20"));
    assert!(row.contains("2025-02-01"));
    assert!(lines.next().is_none());
}

#[test]
fn violations_csv_keeps_the_header_without_violations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let outcome = single(Rule::ResponseInFuture, &registry());
    assert_eq!(outcome.violations, 0);

    let path = write_violations_csv(dir.path(), &outcome).expect("write csv");
    let text = fs::read_to_string(path).expect("read csv");

    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("subject,response_id"));
}

#[test]
fn rule_outputs_cover_every_outcome() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = RuleEngine::new(options().with_rules(vec![
        "end_time_is_before_start_time".to_string(),
        "counts_of_records".to_string(),
    ]))
    .evaluate(&registry())
    .expect("evaluate");

    let outputs = write_rule_outputs(dir.path(), &report).expect("write outputs");

    // Three interval scopes plus the record counts, chart and CSV each.
    assert_eq!(outputs.len(), 8);
    assert!(
        dir.path()
            .join("charts/end_time_is_before_start_time_radiation_therapy.json")
            .is_file()
    );
    assert!(dir.path().join("violations/counts_of_records.csv").is_file());
}

// --- summary ---

#[test]
fn run_summary_records_the_input_fingerprint() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("export.xml");
    fs::write(&input, b"<STS/>").expect("write input");

    let fingerprint = file_sha256(&input).expect("hash input");
    assert_eq!(fingerprint, sha256_hex(b"<STS/>"));
    assert_eq!(fingerprint.len(), 64);

    let tables = registry();
    let report = RuleEngine::new(options()).evaluate(&tables).expect("evaluate");
    let summary = RunSummary::new(
        &input,
        fingerprint.clone(),
        options().reference_date,
        &report,
    );
    let path = write_run_summary(&dir.path().join("out"), &summary).expect("write summary");
    assert!(path.ends_with("out/summary.json"));

    let text = fs::read_to_string(path).expect("read summary");
    let parsed: RunSummary = serde_json::from_str(&text).expect("parse summary");
    assert_eq!(parsed, summary);
    assert_eq!(parsed.input_sha256, fingerprint);
    assert_eq!(parsed.patients, 2);
    assert_eq!(parsed.rules.len(), report.outcomes.len());

    let diagnosis = parsed
        .rules
        .iter()
        .find(|tally| tally.name == "diagnosis_in_future")
        .expect("tally present");
    assert_eq!((diagnosis.total, diagnosis.violations), (1, 1));
    assert_eq!(diagnosis.number, Some(8));
}

#[test]
fn empty_input_has_the_well_known_digest() {
    assert_eq!(
        sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

// --- entity export ---

#[test]
fn entity_export_writes_one_file_per_kind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let tables = registry();

    let exported = export_entities(dir.path(), &tables).expect("export");
    assert_eq!(exported.len(), EntityKind::all().len());

    let radiation = exported
        .iter()
        .find(|table| table.kind == EntityKind::RadiationTherapy)
        .expect("radiation table");
    assert_eq!(radiation.rows, 2);

    let mut reader = csv::Reader::from_path(&radiation.path).expect("open export");
    let header: Vec<String> = reader
        .headers()
        .expect("header")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(header, ["id", "subject", "start", "end"]);

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().expect("rows");
    assert_eq!(&rows[0][0], "RadiationTherapy/1");
    assert_eq!(&rows[0][2], "2020-03-01");
    assert_eq!(&rows[1][3], "");
}

#[test]
fn empty_tables_still_get_a_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    export_entities(dir.path(), &registry()).expect("export");

    let text = fs::read_to_string(dir.path().join("tnm.csv")).expect("read tnm");
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("id,subject,t,n,m,stage"));
}
