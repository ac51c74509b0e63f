//! Normalized clinical entities produced by the record extractor.
//!
//! Every field is optional: an absent source node stays absent here and is
//! never replaced by a fabricated default.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::coding::Coding;

/// One registry patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Registry identifier, when the export carries one.
    pub identifier: Option<String>,
    pub sex: Option<String>,
    /// Diagnosis year minus age at diagnosis.
    pub birth_year: Option<i32>,
    /// `None` when the vital status was not recorded. Any recorded status
    /// other than `ALIVE` is deceased.
    ///
    /// An absent status is unknown, not deceased: the missing vital-status
    /// timestamp check (rule 6) and the died-with-complete-response check
    /// (rule 19) count such a patient as uncomputed instead of flagging it.
    pub deceased: Option<bool>,
    pub deceased_at: Option<NaiveDate>,
}

impl Patient {
    /// Birth date used by age-based rules: January 1 of the birth year.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_year
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
    }

    pub fn is_deceased(&self) -> bool {
        self.deceased == Some(true)
    }
}

/// Primary diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// ICD-10 code isolated from the localization text.
    pub code: Option<Coding>,
    /// Source localization text, kept for body-site lookups.
    pub localization: Option<String>,
    pub diagnosis_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    pub identifier: Option<String>,
    pub material: Option<String>,
    pub preservation: Option<String>,
    /// Combined material and preservation coding.
    pub kind: Option<Coding>,
    pub collection_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Surgery {
    pub start: Option<NaiveDate>,
    /// Source surgery type label as exported.
    pub type_source: Option<String>,
    pub surgery_type: Option<Coding>,
    pub radicality: Option<Coding>,
    pub body_site: Option<Coding>,
    pub note: Option<String>,
}

/// Radiation or targeted therapy period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Therapy {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Pharmacotherapy scheme exposure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugExposure {
    /// Drug concept id; `0` when the scheme could not be mapped.
    pub concept_id: i64,
    pub source_value: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseObservation {
    pub response: Option<Coding>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeObservation {
    pub overall_survival_weeks: Option<i64>,
    pub last_update: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceObservation {
    pub weeks: Option<i64>,
}

/// TNM classification from the first histopathology event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tnm {
    pub t: Option<Coding>,
    pub n: Option<Coding>,
    pub m: Option<Coding>,
    /// Stage as recorded in the export.
    pub stage: Option<Coding>,
    /// Stage derived from edition and T/N/M, when determinable.
    pub computed_stage: Option<String>,
    pub edition: Option<Coding>,
    pub grade: Option<Coding>,
    pub morphology: Option<Coding>,
}

/// Diagnostic procedure reported on the patient form, dated at diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticProcedure {
    pub concept_id: i64,
    pub label: String,
    pub date: Option<NaiveDate>,
}

/// Entities with a start and an optional end.
pub trait Interval {
    fn start(&self) -> Option<NaiveDate>;

    fn end(&self) -> Option<NaiveDate> {
        None
    }
}

impl Interval for Therapy {
    fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

impl Interval for DrugExposure {
    fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

impl Interval for Surgery {
    fn start(&self) -> Option<NaiveDate> {
        self.start
    }
}

impl Interval for ResponseObservation {
    fn start(&self) -> Option<NaiveDate> {
        self.date
    }
}
