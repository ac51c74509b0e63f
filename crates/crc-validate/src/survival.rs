//! Adjusted overall survival.
//!
//! A patient's recorded survival re-expressed relative to the earliest dated
//! event of one table: `overall_survival_weeks + weeks(diagnosis, start)`.
//! The value is computed once per event table and shared by every rule that
//! checks events against the survival window.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crc_model::{Condition, Stored, SubjectKey, TimeObservation};
use crc_transform::weeks_between;

use crate::context::EventRow;

/// Adjusted survival for one patient, given the starts of their events in
/// source order. `None` when the diagnosis date, the survival value, or every
/// event start is absent.
pub fn adjusted_survival(
    diagnosis: Option<NaiveDate>,
    overall_survival_weeks: Option<i64>,
    starts: impl IntoIterator<Item = Option<NaiveDate>>,
) -> Option<f64> {
    let diagnosis = diagnosis?;
    let survival = overall_survival_weeks?;
    let earliest = starts.into_iter().flatten().min()?;
    Some(survival as f64 + weeks_between(diagnosis, earliest))
}

/// Adjusted survival for every subject with at least one event in `events`.
pub fn survival_by_subject<'a>(
    events: &[EventRow<'a>],
    times: &BTreeMap<&'a SubjectKey, &'a Stored<TimeObservation>>,
    conditions: &BTreeMap<&'a SubjectKey, &'a Stored<Condition>>,
) -> BTreeMap<&'a SubjectKey, f64> {
    let mut starts: BTreeMap<&'a SubjectKey, Vec<Option<NaiveDate>>> = BTreeMap::new();
    for event in events {
        starts.entry(event.subject).or_default().push(event.start);
    }

    starts
        .into_iter()
        .filter_map(|(subject, starts)| {
            let diagnosis = conditions.get(subject).and_then(|c| c.diagnosis_date);
            let survival = times
                .get(subject)
                .and_then(|t| t.overall_survival_weeks);
            adjusted_survival(diagnosis, survival, starts).map(|value| (subject, value))
        })
        .collect()
}
