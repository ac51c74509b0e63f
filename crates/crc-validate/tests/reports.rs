//! Tests for the completeness and coverage reports.

mod fixtures;

use crc_model::{
    Coding, EntityKind, Patient, RecordBundle, RecurrenceObservation, ResponseObservation,
    Specimen,
};
use crc_validate::{ChartData, Rule};
use fixtures::{
    date, diagnosed, outcome, scoped, subjects, surgery, tables, tally, therapy,
};

// --- completeness and uniqueness ---

#[test]
fn completeness_counts_nulls_per_attribute() {
    let complete = Patient {
        deceased: Some(true),
        deceased_at: date(2021, 3, 1),
        ..fixtures::patient("complete")
    };
    let tables = tables(vec![
        RecordBundle::new(complete),
        RecordBundle::new(fixtures::patient("alive")),
        RecordBundle::new(Patient::default()),
    ]);
    let result = scoped(Rule::Completeness, EntityKind::Patient, &tables);

    assert_eq!(result.name, "completeness_patient");
    assert_eq!(tally(&result), (3, 2, 0));
    assert_eq!(
        result.chart,
        ChartData {
            records: vec![
                "patient_identifier".to_string(),
                "patient_sex".to_string(),
                "patient_birth_year".to_string(),
                "patient_deceased".to_string(),
                "patient_deceased_at".to_string(),
            ],
            count: vec![1, 1, 1, 1, 2],
        }
    );
}

#[test]
fn completeness_of_an_empty_table() {
    let tables = tables(vec![RecordBundle::new(fixtures::patient("only"))]);
    let result = scoped(Rule::Completeness, EntityKind::Tnm, &tables);

    assert_eq!(tally(&result), (0, 0, 0));
    assert!(result.chart.count.iter().all(|count| *count == 0));
}

#[test]
fn uniqueness_ignores_ids_and_subjects() {
    let interval = || therapy(date(2020, 2, 1), date(2020, 3, 1));
    let tables = tables(vec![
        RecordBundle {
            radiation_therapies: vec![interval(), interval()],
            ..diagnosed("repeated", date(2020, 1, 1))
        },
        RecordBundle {
            radiation_therapies: vec![interval(), therapy(date(2020, 4, 1), None)],
            ..diagnosed("other", date(2020, 1, 1))
        },
    ]);
    let result = scoped(Rule::Uniqueness, EntityKind::RadiationTherapy, &tables);

    assert_eq!(tally(&result), (4, 2, 0));
    assert_eq!(result.chart.records, ["Unique rows", "Duplicated"]);
    assert_eq!(result.chart.count, [2, 2]);
}

#[test]
fn counts_of_records_lists_every_kind() {
    let tables = tables(vec![
        RecordBundle {
            radiation_therapies: vec![therapy(date(2020, 2, 1), None)],
            ..diagnosed("first", date(2020, 1, 1))
        },
        diagnosed("second", date(2020, 1, 1)),
    ]);
    let result = outcome(Rule::CountsOfRecords, &tables);

    assert_eq!(result.total, 5);
    assert_eq!(result.violations, 0);
    assert_eq!(result.rows.height(), EntityKind::all().len());
    assert_eq!(result.chart.records[0], "Patient");
    assert_eq!(result.chart.count[0], 2);
    assert_eq!(result.chart.count.iter().sum::<usize>(), 5);
}

// --- specimens ---

fn specimen(identifier: Option<&str>, preservation: Option<&str>, year: Option<i32>) -> Specimen {
    Specimen {
        identifier: identifier.map(str::to_string),
        material: Some("Tumor".to_string()),
        preservation: preservation.map(str::to_string),
        kind: preservation.and_then(|preservation| crc_map::specimen_kind("Tumor", preservation)),
        collection_year: year,
    }
}

#[test]
fn preservation_mode_reports() {
    let tables = tables(vec![RecordBundle {
        specimens: vec![
            specimen(Some("S1"), Some("FFPE"), Some(2019)),
            specimen(Some("S2"), Some("Cryopreservation"), Some(2019)),
            specimen(Some("S3"), None, Some(2019)),
        ],
        ..diagnosed("specimens", date(2020, 1, 1))
    }]);

    let missing = outcome(Rule::MissingPreservationMode, &tables);
    assert_eq!(tally(&missing), (3, 1, 0));

    let not_ffpe = outcome(Rule::PreservationModeButNoFfpe, &tables);
    assert_eq!(tally(&not_ffpe), (3, 1, 1));
    assert_eq!(
        fixtures::texts(&not_ffpe, "specimen_kind_display"),
        [Some("Tumor tissue (frozen)".to_string())]
    );
}

#[test]
fn patients_without_specimens_are_flagged() {
    let tables = tables(vec![
        RecordBundle {
            specimens: vec![specimen(Some("S1"), Some("FFPE"), Some(2019))],
            ..diagnosed("dated", date(2020, 1, 1))
        },
        RecordBundle {
            specimens: vec![specimen(None, Some("FFPE"), None)],
            ..diagnosed("undated", date(2020, 1, 1))
        },
        diagnosed("none", date(2020, 1, 1)),
    ]);

    let date_report = outcome(Rule::MissingSpecimenDate, &tables);
    assert_eq!(tally(&date_report), (3, 2, 0));
    assert_eq!(subjects(&date_report), ["Patient/2", "Patient/3"]);

    let source_report = outcome(Rule::WithoutSpecimenSourceId, &tables);
    assert_eq!(tally(&source_report), (3, 2, 0));
    assert_eq!(source_report.name, "patients_without_specimen_source_id");
}

// --- responses ---

fn response(code: Option<&str>, date: Option<chrono::NaiveDate>) -> ResponseObservation {
    ResponseObservation {
        response: code.map(|code| Coding::new(code, code)),
        date,
    }
}

#[test]
fn response_missing_fields() {
    let tables = tables(vec![RecordBundle {
        responses: vec![
            response(Some("359746009"), date(2020, 3, 1)),
            response(Some("359746009"), None),
            response(None, date(2020, 3, 1)),
        ],
        ..diagnosed("responses", date(2020, 1, 1))
    }]);
    let result = outcome(Rule::ResponseMissingFields, &tables);

    assert_eq!(tally(&result), (3, 2, 0));
}

#[test]
fn treatment_after_complete_response_needs_a_recurrence() {
    let complete = Some(crc_map::COMPLETE_RESPONSE);
    let progressive = Some("271299001");
    let diagnosis = date(2020, 1, 1);
    let tables = tables(vec![
        RecordBundle {
            responses: vec![
                response(progressive, date(2020, 6, 1)),
                response(complete, date(2020, 1, 15)),
            ],
            ..diagnosed("no-recurrence", diagnosis)
        },
        RecordBundle {
            responses: vec![
                response(complete, date(2020, 1, 15)),
                response(progressive, date(2020, 6, 1)),
            ],
            // Ten weeks after diagnosis falls between the two responses.
            recurrence: Some(RecurrenceObservation { weeks: Some(10) }),
            ..diagnosed("recurred", diagnosis)
        },
        RecordBundle {
            responses: vec![
                response(complete, None),
                response(progressive, date(2020, 6, 1)),
            ],
            ..diagnosed("undated", diagnosis)
        },
    ]);
    let result = outcome(Rule::TreatmentAfterCompleteResponse, &tables);

    assert_eq!(tally(&result), (6, 1, 1));
    assert_eq!(subjects(&result), ["Patient/1"]);
    let next = result.rows.column("next_response_date").unwrap();
    assert_eq!(next.len(), 1);
}

// --- patient coverage ---

#[test]
fn patients_without_condition_values() {
    let tables = tables(vec![
        diagnosed("complete", date(2020, 1, 1)),
        diagnosed("undated", None),
        RecordBundle::new(fixtures::patient("no-condition")),
    ]);
    let result = outcome(Rule::WithoutConditionValues, &tables);

    assert_eq!(tally(&result), (3, 2, 0));
    assert_eq!(subjects(&result), ["Patient/2", "Patient/3"]);
}

#[test]
fn patients_without_surgery() {
    let tables = tables(vec![
        RecordBundle {
            surgeries: vec![surgery(
                "Sigmoid colectomy",
                "Sigmoid colon - C18.7",
                date(2020, 2, 1),
            )],
            ..diagnosed("operated", date(2020, 1, 1))
        },
        diagnosed("not-operated", date(2020, 1, 1)),
    ]);
    let result = outcome(Rule::WithoutSurgery, &tables);

    assert_eq!(tally(&result), (2, 1, 0));
    assert_eq!(subjects(&result), ["Patient/2"]);
    let surgeries = result.rows.column("surgeries").unwrap().i64().unwrap();
    assert_eq!(surgeries.get(0), Some(0));
}
