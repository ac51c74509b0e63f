//! Record extraction: one [`RecordBundle`] per `BHPatient`.
//!
//! Extraction never fails on missing or odd values. Absent nodes become
//! `None`, unmappable values are logged and become `None`, and derived dates
//! are absent whenever the diagnosis date or the week offset is.

use std::path::Path;
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, info_span, warn};

use crc_map as vocab;
use crc_model::{
    Coding, Condition, DiagnosticProcedure, DrugExposure, ExtractOptions, Patient,
    RecordBundle, RecurrenceObservation, ResponseObservation, Result, Specimen, Surgery, Therapy,
    TimeObservation, Tnm,
};
use crc_transform::{compute_tnm_stage, derive_date, parse_date, parse_integer};

use crate::event::{
    HistopathologyEvent, PharmacotherapyEvent, RegistryEvent, ResponseEvent, SampleEvent,
    SurgeryEvent, TherapyEvent,
};
use crate::layout::patient as fields;
use crate::qname::{BASIC_DATA, BH_PATIENT, EVENT, EVENTS, FORM, IDENTIFIER, LOCATION, LOCATIONS, QName};
use crate::validate::validate_document;
use crate::xml::{XmlDocument, XmlElement};

/// Maps a present source value, logging values the vocabulary cannot map.
fn mapped(
    field: &'static str,
    source: Option<&str>,
    map: impl Fn(&str) -> Option<Coding>,
) -> Option<Coding> {
    let source = source?;
    let coding = map(source);
    if coding.is_none() {
        warn!(field, value = source, "unmappable value");
    }
    coding
}

fn weeks(source: Option<&str>) -> Option<i64> {
    source.and_then(parse_integer)
}

fn form_text<'a>(form: Option<&'a XmlElement>, element: &str) -> Option<&'a str> {
    form.and_then(|form| form.child_text(QName::registry(element)))
}

fn patient_record(form: Option<&XmlElement>, identifier: Option<&str>, diagnosis: Option<NaiveDate>) -> Patient {
    let age = weeks(form_text(form, fields::AGE_AT_DIAGNOSIS));
    let birth_year = match (diagnosis, age) {
        (Some(diagnosis), Some(age)) => i32::try_from(age)
            .ok()
            .and_then(|age| diagnosis.year().checked_sub(age)),
        _ => None,
    };
    let deceased = form_text(form, fields::VITAL_STATUS).map(|status| status != "ALIVE");
    let deceased_at = if deceased == Some(true) {
        form_text(form, fields::LAST_UPDATE).and_then(parse_date)
    } else {
        None
    };
    Patient {
        identifier: identifier.map(str::to_string),
        sex: form_text(form, fields::SEX).map(str::to_string),
        birth_year,
        deceased,
        deceased_at,
    }
}

fn time_observation(form: Option<&XmlElement>) -> Option<TimeObservation> {
    let survival = form_text(form, fields::OVERALL_SURVIVAL);
    let last_update = form_text(form, fields::LAST_UPDATE);
    if survival.is_none() && last_update.is_none() {
        return None;
    }
    Some(TimeObservation {
        overall_survival_weeks: weeks(survival),
        last_update: last_update.and_then(parse_date),
    })
}

fn recurrence(form: Option<&XmlElement>) -> Option<RecurrenceObservation> {
    let element = form?.child(QName::registry(fields::TIME_OF_RECURRENCE))?;
    Some(RecurrenceObservation {
        weeks: weeks(element.text()),
    })
}

fn diagnostic_procedures(
    form: Option<&XmlElement>,
    diagnosis: Option<NaiveDate>,
) -> Vec<DiagnosticProcedure> {
    fields::DIAGNOSTICS
        .iter()
        .filter_map(|element| form_text(form, element))
        .filter_map(vocab::diagnostic_procedure)
        .map(|(concept_id, label)| DiagnosticProcedure {
            concept_id,
            label: label.to_string(),
            date: diagnosis,
        })
        .collect()
}

fn condition(histology: Option<&HistopathologyEvent>, diagnosis: Option<NaiveDate>) -> Option<Condition> {
    let localization = histology.and_then(|event| event.localization.as_deref());
    if localization.is_none() && diagnosis.is_none() {
        return None;
    }
    Some(Condition {
        code: mapped("localization", localization, vocab::condition_code),
        localization: localization.map(str::to_string),
        diagnosis_date: diagnosis,
    })
}

fn tnm(event: &HistopathologyEvent) -> Tnm {
    let mut tnm = Tnm {
        t: mapped("primary_tumor", event.primary_tumor.as_deref(), vocab::map_t),
        n: mapped("lymph_nodes", event.lymph_nodes.as_deref(), vocab::map_n),
        m: mapped("metastasis", event.metastasis.as_deref(), vocab::map_m),
        stage: mapped("stage", event.stage.as_deref(), vocab::map_stage),
        computed_stage: None,
        edition: mapped(
            "uicc_version",
            event.uicc_version.as_deref(),
            vocab::staging_edition,
        ),
        grade: mapped("grade", event.grade.as_deref(), vocab::grade),
        morphology: mapped("morphology", event.morphology.as_deref(), vocab::morphology),
    };
    tnm.computed_stage = compute_tnm_stage(&tnm)
        .and_then(|outcome| outcome.stage())
        .map(str::to_string);
    tnm
}

fn surgery(event: &SurgeryEvent, diagnosis: Option<NaiveDate>) -> Surgery {
    let mapping = vocab::surgery_type(event.surgery_type.as_deref(), event.other_type.as_deref());
    Surgery {
        start: derive_date(diagnosis, weeks(event.weeks.as_deref())),
        type_source: event.surgery_type.clone(),
        surgery_type: mapping.coding,
        radicality: mapped("radicality", event.radicality.as_deref(), vocab::radicality),
        body_site: event.location.as_deref().and_then(vocab::body_site),
        note: mapping.note,
    }
}

fn specimen(event: &SampleEvent) -> Specimen {
    let kind = match (event.material.as_deref(), event.preservation.as_deref()) {
        (Some(material), Some(preservation)) => {
            let kind = vocab::specimen_kind(material, preservation);
            if kind.is_none() {
                warn!(material, preservation, "unmappable specimen type");
            }
            kind
        }
        _ => None,
    };
    Specimen {
        identifier: event.id.clone(),
        material: event.material.clone(),
        preservation: event.preservation.clone(),
        kind,
        collection_year: weeks(event.year.as_deref()).and_then(|year| i32::try_from(year).ok()),
    }
}

fn drug_exposure(event: &PharmacotherapyEvent, diagnosis: Option<NaiveDate>) -> DrugExposure {
    let source = vocab::scheme_source(event.scheme.as_deref(), event.other_scheme.as_deref());
    DrugExposure {
        concept_id: vocab::drug_concept_id(source),
        source_value: vocab::stored_source_value(source),
        start: derive_date(diagnosis, weeks(event.start_week.as_deref())),
        end: derive_date(diagnosis, weeks(event.end_week.as_deref())),
    }
}

fn response(event: &ResponseEvent, diagnosis: Option<NaiveDate>) -> ResponseObservation {
    ResponseObservation {
        response: mapped("response", event.response.as_deref(), vocab::response),
        date: derive_date(diagnosis, weeks(event.weeks.as_deref())),
    }
}

fn therapy(event: &TherapyEvent, diagnosis: Option<NaiveDate>) -> Therapy {
    Therapy {
        start: derive_date(diagnosis, weeks(event.start_week.as_deref())),
        end: derive_date(diagnosis, weeks(event.end_week.as_deref())),
    }
}

/// Extracts the bundle of one `BHPatient` element.
pub fn extract_patient(patient: &XmlElement) -> RecordBundle {
    let location = patient.descend(&[LOCATIONS, LOCATION]);
    let form = location.and_then(|location| location.descend(&[BASIC_DATA, FORM]));
    if form.is_none() {
        debug!("patient without basic data form");
    }
    let diagnosis = form_text(form, fields::DIAGNOSIS_DATE).and_then(parse_date);

    let events: Vec<RegistryEvent> = location
        .and_then(|location| location.child(EVENTS))
        .map(|events| events.children_named(EVENT).map(RegistryEvent::decode).collect())
        .unwrap_or_default();

    let mut bundle = RecordBundle::new(patient_record(
        form,
        patient.child_text(IDENTIFIER),
        diagnosis,
    ));
    bundle.time_observation = time_observation(form);
    bundle.recurrence = recurrence(form);
    bundle.diagnostic_procedures = diagnostic_procedures(form, diagnosis);

    let mut first_histology = None;
    for event in &events {
        match event {
            RegistryEvent::Surgery(event) => bundle.surgeries.push(surgery(event, diagnosis)),
            RegistryEvent::Sample(event) => bundle.specimens.push(specimen(event)),
            RegistryEvent::Histopathology(event) => {
                if first_histology.is_none() {
                    first_histology = Some(event);
                } else {
                    debug!("ignoring additional histopathology event");
                }
            }
            RegistryEvent::Pharmacotherapy(event) => {
                bundle.drug_exposures.push(drug_exposure(event, diagnosis));
            }
            RegistryEvent::Response(event) => bundle.responses.push(response(event, diagnosis)),
            RegistryEvent::Radiation(event) => {
                bundle.radiation_therapies.push(therapy(event, diagnosis));
            }
            RegistryEvent::Targeted(event) => {
                bundle.targeted_therapies.push(therapy(event, diagnosis));
            }
            RegistryEvent::Unknown { eventtype } => {
                debug!(eventtype = eventtype.as_deref(), "skipping unknown event");
            }
        }
    }
    bundle.condition = condition(first_histology, diagnosis);
    bundle.tnm = first_histology.map(tnm);
    bundle
}

/// Extracts every patient of a parsed export, in document order.
pub fn extract_document(root: &XmlElement) -> Vec<RecordBundle> {
    root.children_named(BH_PATIENT)
        .enumerate()
        .map(|(index, patient)| {
            let bundle = extract_patient(patient);
            debug!(
                patient = index + 1,
                entities = bundle.entity_count(),
                "extracted patient"
            );
            bundle
        })
        .collect()
}

/// Parses, optionally validates, and extracts an export held in memory.
///
/// A structural failure aborts before any record is extracted.
pub fn load_bundles(xml: &str, options: &ExtractOptions) -> Result<Vec<RecordBundle>> {
    let span = info_span!("extract");
    let _guard = span.enter();
    let start = Instant::now();

    let document = XmlDocument::parse(xml)?;
    if options.validate_structure {
        validate_document(&document.root)?;
    } else {
        debug!("structure check disabled");
    }
    let bundles = extract_document(&document.root);
    info!(
        patients = bundles.len(),
        entities = bundles.iter().map(RecordBundle::entity_count).sum::<usize>(),
        duration_ms = start.elapsed().as_millis(),
        "extraction complete"
    );
    Ok(bundles)
}

/// Reads and extracts an export file.
pub fn load_bundles_from_path(path: &Path, options: &ExtractOptions) -> Result<Vec<RecordBundle>> {
    let xml = std::fs::read_to_string(path)?;
    load_bundles(&xml, options)
}
