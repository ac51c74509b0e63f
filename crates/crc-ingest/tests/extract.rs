//! Tests for record extraction from registry exports.

mod fixtures;

use chrono::NaiveDate;

use crc_ingest::{RegistryEvent, XmlDocument, extract_document, load_bundles, load_bundles_from_path};
use crc_model::{ExtractOptions, RecordBundle};

use fixtures::{
    data, document, event, full_patient, histopathology_event, patient, patient_form,
    radiation_event, response_event, surgery_event,
};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn extract_one(patient_xml: String) -> RecordBundle {
    let mut bundles = load_bundles(&document(&[patient_xml]), &ExtractOptions::default()).unwrap();
    assert_eq!(bundles.len(), 1);
    bundles.remove(0)
}

fn code(coding: Option<&crc_model::Coding>) -> Option<&str> {
    coding.map(|coding| coding.code.as_str())
}

// --- patient level ---

#[test]
fn patient_fields_are_extracted() {
    let bundle = extract_one(full_patient("P1", None));
    let patient = &bundle.patient;
    assert_eq!(patient.identifier.as_deref(), Some("P1"));
    assert_eq!(patient.sex.as_deref(), Some("female"));
    assert_eq!(patient.birth_year, Some(1960));
    assert_eq!(patient.birth_date(), date(1960, 1, 1));
    assert_eq!(patient.deceased, Some(true));
    assert_eq!(patient.deceased_at, date(2022, 1, 15));
}

#[test]
fn alive_patient_has_no_deceased_timestamp() {
    let form = patient_form(None)
        .into_iter()
        .map(|field| field.replace(">DEATH<", ">ALIVE<"))
        .collect::<Vec<_>>();
    let bundle = extract_one(patient("P1", &form, &[]));
    assert_eq!(bundle.patient.deceased, Some(false));
    assert!(bundle.patient.deceased_at.is_none());
    assert!(!bundle.patient.is_deceased());
}

#[test]
fn time_observation_and_diagnostics() {
    let bundle = extract_one(full_patient("P1", None));
    let time = bundle.time_observation.as_ref().unwrap();
    assert_eq!(time.overall_survival_weeks, Some(104));
    assert_eq!(time.last_update, date(2022, 1, 15));

    assert_eq!(bundle.diagnostic_procedures.len(), 1);
    let liver = &bundle.diagnostic_procedures[0];
    assert_eq!(liver.concept_id, 4_085_576);
    assert_eq!(liver.date, date(2020, 1, 15));
}

#[test]
fn recurrence_only_with_second_layout() {
    assert!(extract_one(full_patient("P1", None)).recurrence.is_none());
    let bundle = extract_one(full_patient("P1", Some("80")));
    assert_eq!(bundle.recurrence.unwrap().weeks, Some(80));
}

// --- events ---

#[test]
fn every_event_kind_is_dispatched() {
    let bundle = extract_one(full_patient("P1", None));
    assert_eq!(bundle.surgeries.len(), 1);
    assert_eq!(bundle.specimens.len(), 1);
    assert_eq!(bundle.drug_exposures.len(), 1);
    assert_eq!(bundle.responses.len(), 1);
    assert_eq!(bundle.radiation_therapies.len(), 1);
    assert_eq!(bundle.targeted_therapies.len(), 1);
    assert!(bundle.tnm.is_some());
    assert!(bundle.condition.is_some());
}

#[test]
fn surgery_is_mapped() {
    let bundle = extract_one(full_patient("P1", None));
    let surgery = &bundle.surgeries[0];
    assert_eq!(surgery.start, date(2020, 1, 29));
    assert_eq!(surgery.type_source.as_deref(), Some("Sigmoid colectomy"));
    assert_eq!(code(surgery.surgery_type.as_ref()), Some("84604002"));
    assert_eq!(code(surgery.radicality.as_ref()), Some("258254000"));
    assert_eq!(code(surgery.body_site.as_ref()), Some("60184004"));
    assert_eq!(surgery.note.as_deref(), Some("Other surgery type not found."));
}

#[test]
fn codeless_surgery_type_gets_unknown_qualifier() {
    let bundle = extract_one(patient(
        "P1",
        &patient_form(None),
        &[surgery_event("Pan-procto colectomy", "Rectum - C20")],
    ));
    let surgery = &bundle.surgeries[0];
    assert_eq!(code(surgery.surgery_type.as_ref()), Some("261665006"));
    assert!(surgery.note.as_deref().unwrap().ends_with("Mapping unavailable."));
    assert_eq!(code(surgery.body_site.as_ref()), Some("34402009"));
}

#[test]
fn histopathology_supplies_condition_and_tnm() {
    let bundle = extract_one(full_patient("P1", None));
    let condition = bundle.condition.as_ref().unwrap();
    assert_eq!(code(condition.code.as_ref()), Some("C18.7"));
    assert_eq!(condition.diagnosis_date, date(2020, 1, 15));

    let tnm = bundle.tnm.as_ref().unwrap();
    assert_eq!(code(tnm.t.as_ref()), Some("T3"));
    assert_eq!(code(tnm.n.as_ref()), Some("N0"));
    assert_eq!(code(tnm.m.as_ref()), Some("M0"));
    assert_eq!(code(tnm.stage.as_ref()), Some("IIA"));
    assert_eq!(code(tnm.edition.as_ref()), Some("443830009"));
    assert_eq!(code(tnm.grade.as_ref()), Some("1663004"));
    assert_eq!(code(tnm.morphology.as_ref()), Some("1187332001"));
    assert_eq!(tnm.computed_stage.as_deref(), Some("IIA"));
}

#[test]
fn only_the_first_histopathology_is_used() {
    let second = histopathology_event()
        .replace("Primary Tumor - T3", "Primary Tumor - T1")
        .replace("Sigmoid colon - C18.7", "Rectum - C20");
    let bundle = extract_one(patient(
        "P1",
        &patient_form(None),
        &[histopathology_event(), second],
    ));
    assert_eq!(code(bundle.tnm.unwrap().t.as_ref()), Some("T3"));
    assert_eq!(code(bundle.condition.unwrap().code.as_ref()), Some("C18.7"));
}

#[test]
fn specimen_drug_response_and_therapies() {
    let bundle = extract_one(full_patient("P1", None));

    let specimen = &bundle.specimens[0];
    assert_eq!(specimen.identifier.as_deref(), Some("S-001"));
    assert_eq!(code(specimen.kind.as_ref()), Some("tumor-tissue-ffpe"));
    assert_eq!(specimen.collection_year, Some(2020));

    let drug = &bundle.drug_exposures[0];
    assert_eq!(drug.source_value.as_deref(), Some("Capecitabine mono"));
    assert_eq!(drug.concept_id, 40_095_743);
    assert_eq!(drug.start, date(2020, 2, 12));
    assert_eq!(drug.end, date(2020, 6, 3));

    let response = &bundle.responses[0];
    assert_eq!(code(response.response.as_ref()), Some("371001000"));
    assert_eq!(response.date, date(2020, 8, 12));

    let radiation = &bundle.radiation_therapies[0];
    assert_eq!(radiation.start, date(2020, 1, 22));
    assert_eq!(radiation.end, date(2020, 2, 19));

    let targeted = &bundle.targeted_therapies[0];
    assert_eq!(targeted.start, date(2020, 2, 26));
    assert!(targeted.end.is_none(), "malformed week offset must be absent");
}

#[test]
fn absent_vital_status_is_unknown_not_deceased() {
    let form: Vec<String> = patient_form(None)
        .into_iter()
        .filter(|element| !element.contains("Dataelement_5_2"))
        .collect();
    let bundle = extract_one(patient("P1", &form, &[]));
    assert_eq!(bundle.patient.deceased, None);
    assert!(!bundle.patient.is_deceased());
    assert!(bundle.patient.deceased_at.is_none());

    let form: Vec<String> = patient_form(None)
        .into_iter()
        .map(|element| {
            if element.contains("Dataelement_5_2") {
                data("5_2", "Vital status", "UNKNOWN")
            } else {
                element
            }
        })
        .collect();
    let bundle = extract_one(patient("P1", &form, &[]));
    assert_eq!(bundle.patient.deceased, Some(true));
}

#[test]
fn missing_diagnosis_date_leaves_derived_dates_absent() {
    let form: Vec<String> = patient_form(None).into_iter().skip(1).collect();
    let bundle = extract_one(patient(
        "P1",
        &form,
        &[
            surgery_event("Sigmoid colectomy", "Sigmoid colon - C18.7"),
            radiation_event(),
            response_event(),
        ],
    ));
    assert!(bundle.surgeries[0].start.is_none());
    assert!(bundle.radiation_therapies[0].start.is_none());
    assert!(bundle.radiation_therapies[0].end.is_none());
    assert!(bundle.responses[0].date.is_none());
    assert!(bundle.patient.birth_year.is_none());
    assert!(bundle.condition.is_none());
}

#[test]
fn unknown_events_are_skipped() {
    let unknown = event("Imaging", "Form9", "form_99", &[data("1_1", "Anything", "x")]);
    let bundle = extract_one(patient("P1", &patient_form(None), &[unknown]));
    // patient, condition, time observation, liver imaging
    assert_eq!(bundle.entity_count(), 4);
    assert!(bundle.surgeries.is_empty() && bundle.tnm.is_none());
}

#[test]
fn unknown_event_decodes_to_unknown_variant() {
    let xml = document(&[patient(
        "P1",
        &patient_form(None),
        &[event("Imaging", "Form9", "form_99", &[])],
    )]);
    let document = XmlDocument::parse(&xml).unwrap();
    let event = document
        .root
        .descend(&[
            crc_ingest::qname::BH_PATIENT,
            crc_ingest::qname::LOCATIONS,
            crc_ingest::qname::LOCATION,
            crc_ingest::qname::EVENTS,
            crc_ingest::qname::EVENT,
        ])
        .unwrap();
    assert_eq!(
        RegistryEvent::decode(event),
        RegistryEvent::Unknown {
            eventtype: Some("Imaging".to_string())
        }
    );
}

// --- document level ---

#[test]
fn patients_keep_document_order() {
    let xml = document(&[full_patient("B", None), full_patient("A", None)]);
    let document = XmlDocument::parse(&xml).unwrap();
    let bundles = extract_document(&document.root);
    let identifiers: Vec<_> = bundles
        .iter()
        .map(|bundle| bundle.patient.identifier.clone())
        .collect();
    assert_eq!(identifiers, vec![Some("B".to_string()), Some("A".to_string())]);
}

#[test]
fn empty_export_yields_no_bundles() {
    let bundles = load_bundles(&document(&[]), &ExtractOptions::default()).unwrap();
    assert!(bundles.is_empty());
}

#[test]
fn load_from_path_reads_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.xml");
    std::fs::write(&path, document(&[full_patient("P1", Some("80"))])).unwrap();
    let bundles = load_bundles_from_path(&path, &ExtractOptions::default()).unwrap();
    assert_eq!(bundles.len(), 1);
    assert!(bundles[0].recurrence.is_some());
}
