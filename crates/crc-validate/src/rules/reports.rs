//! Completeness and coverage reports.

use std::collections::HashSet;

use chrono::NaiveDate;

use crc_map::{is_complete_response, is_ffpe};
use crc_model::{
    Condition, EntityKind, Patient, RecurrenceObservation, ResponseObservation, Result,
    Specimen, Stored, Surgery, group_by_subject,
};
use crc_transform::derive_date;

use crate::catalog::Rule;
use crate::context::RuleContext;
use crate::frame::{RowBuilder, RowSchema, RowTable, Value};
use crate::outcome::{ChartData, Evaluation, RuleOutcome};

/// Leading columns of a flattened entity that are never null.
const KEY_COLUMNS: usize = 2;

/// Rows of `kind` with any null attribute; the chart tallies nulls per
/// attribute.
pub(super) fn completeness(ctx: &RuleContext<'_>, kind: EntityKind) -> Result<RuleOutcome> {
    let (schema, rows) = ctx.entity_rows(kind);
    let attributes: Vec<String> = schema.columns()[KEY_COLUMNS..].to_vec();
    let mut nulls = vec![0usize; attributes.len()];
    let mut evaluation = Evaluation::new(schema);
    for row in rows {
        let mut any_null = false;
        for (count, value) in nulls.iter_mut().zip(&row[KEY_COLUMNS..]) {
            if value.is_null() {
                *count += 1;
                any_null = true;
            }
        }
        evaluation.record(Some(any_null), || row);
    }
    evaluation.set_chart(ChartData::from_pairs(attributes.into_iter().zip(nulls)));
    evaluation.finish(Rule::Completeness, Some(kind))
}

/// Rows of `kind` repeating an earlier row's attributes.
pub(super) fn uniqueness(ctx: &RuleContext<'_>, kind: EntityKind) -> Result<RuleOutcome> {
    let (schema, rows) = ctx.entity_rows(kind);
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
    let mut evaluation = Evaluation::new(schema);
    for row in rows {
        let key: Vec<Option<String>> = row[KEY_COLUMNS..].iter().map(Value::render).collect();
        let duplicate = !seen.insert(key);
        evaluation.record(Some(duplicate), || row);
    }
    let duplicated = evaluation.violations();
    let unique = evaluation.total() - duplicated;
    evaluation.set_chart(ChartData::from_pairs([
        ("Unique rows".to_string(), unique),
        ("Duplicated".to_string(), duplicated),
    ]));
    evaluation.finish(Rule::Uniqueness, Some(kind))
}

/// Record counts per entity kind; never flags anything.
pub(super) fn counts_of_records(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut evaluation = Evaluation::with_table(RowTable::with_columns(&["kind", "count"]));
    let mut pairs = Vec::new();
    for kind in EntityKind::all() {
        let count = ctx.tables.count(*kind);
        evaluation.examined(count);
        evaluation.push_row(vec![Value::from(kind.label()), Value::from(count)]);
        pairs.push((kind.label().to_string(), count));
    }
    evaluation.set_chart(ChartData::from_pairs(pairs));
    evaluation.finish(Rule::CountsOfRecords, None)
}

fn specimen_report(
    ctx: &RuleContext<'_>,
    rule: Rule,
    verdict: impl Fn(&Specimen) -> Option<bool>,
) -> Result<RuleOutcome> {
    let schema = RowSchema::new().entity::<Specimen>(EntityKind::Specimen);
    let mut evaluation = Evaluation::new(schema);
    for specimen in &ctx.tables.specimens {
        evaluation.record(verdict(&specimen.record), || {
            RowBuilder::new(&specimen.subject)
                .entity(Some(specimen))
                .finish()
        });
    }
    evaluation.finish(rule, None)
}

pub(super) fn missing_preservation_mode(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    specimen_report(ctx, Rule::MissingPreservationMode, |specimen| {
        Some(specimen.kind.is_none())
    })
}

pub(super) fn preservation_mode_but_no_ffpe(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    specimen_report(ctx, Rule::PreservationModeButNoFfpe, |specimen| {
        specimen
            .kind
            .as_ref()
            .map(|kind| !is_ffpe(&kind.display))
    })
}

pub(super) fn response_missing_fields(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new().entity::<ResponseObservation>(EntityKind::Response);
    let mut evaluation = Evaluation::new(schema);
    for response in &ctx.tables.responses {
        let missing = response.date.is_none()
            || response
                .response
                .as_ref()
                .is_none_or(|coding| coding.code.is_empty() || coding.display.is_empty());
        evaluation.record(Some(missing), || {
            RowBuilder::new(&response.subject)
                .entity(Some(response))
                .finish()
        });
    }
    evaluation.finish(Rule::ResponseMissingFields, None)
}

fn recurrence_date(
    condition: Option<&Stored<Condition>>,
    recurrence: Option<&Stored<RecurrenceObservation>>,
) -> Option<NaiveDate> {
    derive_date(
        condition.and_then(|c| c.diagnosis_date),
        recurrence.and_then(|r| r.weeks),
    )
}

/// Consecutive dated responses per patient: a complete response followed by
/// another response needs a recurrence date between the two.
pub(super) fn treatment_after_complete_response(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<ResponseObservation>(EntityKind::Response)
        .entity::<RecurrenceObservation>(EntityKind::Recurrence)
        .entity::<Condition>(EntityKind::Condition)
        .computed("next_response_date")
        .computed("recurrence_date");
    let mut evaluation = Evaluation::new(schema);
    let responses = group_by_subject(&ctx.tables.responses);
    for patient in ctx.patients() {
        let subject = &patient.subject;
        let Some(rows) = responses.get(subject) else {
            continue;
        };
        let condition = ctx.condition(subject);
        let recurrence = ctx.recurrence(subject);
        let recurred = recurrence_date(condition, recurrence);

        let mut dated: Vec<(NaiveDate, &Stored<ResponseObservation>)> = Vec::new();
        for response in rows {
            match response.date {
                Some(date) => dated.push((date, *response)),
                None => evaluation.record(None, Vec::new),
            }
        }
        dated.sort_by_key(|(date, _)| *date);

        for (index, (date, response)) in dated.iter().enumerate() {
            let next = dated.get(index + 1).map(|(next, _)| *next);
            let verdict = match (response.response.as_ref(), next) {
                (None, _) => None,
                (Some(_), None) => Some(false),
                (Some(coding), Some(next)) => Some(
                    is_complete_response(coding)
                        && !recurred.is_some_and(|r| *date <= r && r <= next),
                ),
            };
            evaluation.record(verdict, || {
                RowBuilder::new(subject)
                    .entity(Some(*response))
                    .entity(recurrence)
                    .entity(condition)
                    .value(next)
                    .value(recurred)
                    .finish()
            });
        }
    }
    evaluation.finish(Rule::TreatmentAfterCompleteResponse, None)
}

/// Patient ⟕ Specimen: a patient without specimens is one violating row.
fn patient_specimen_report(
    ctx: &RuleContext<'_>,
    rule: Rule,
    missing: impl Fn(&Specimen) -> bool,
) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<Patient>(EntityKind::Patient)
        .entity::<Specimen>(EntityKind::Specimen);
    let mut evaluation = Evaluation::new(schema);
    let specimens = group_by_subject(&ctx.tables.specimens);
    for patient in ctx.patients() {
        let row = |specimen: Option<&Stored<Specimen>>| {
            RowBuilder::new(&patient.subject)
                .entity(Some(patient))
                .entity(specimen)
                .finish()
        };
        match specimens.get(&patient.subject) {
            Some(rows) => {
                for specimen in rows {
                    evaluation.record(Some(missing(&specimen.record)), || row(Some(*specimen)));
                }
            }
            None => evaluation.record(Some(true), || row(None)),
        }
    }
    evaluation.finish(rule, None)
}

pub(super) fn missing_specimen_date(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    patient_specimen_report(ctx, Rule::MissingSpecimenDate, |specimen| {
        specimen.collection_year.is_none()
    })
}

pub(super) fn without_specimen_source_id(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    patient_specimen_report(ctx, Rule::WithoutSpecimenSourceId, |specimen| {
        specimen.identifier.is_none()
    })
}

pub(super) fn without_condition_values(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<Patient>(EntityKind::Patient)
        .entity::<Condition>(EntityKind::Condition);
    let mut evaluation = Evaluation::new(schema);
    for patient in ctx.patients() {
        let condition = ctx.condition(&patient.subject);
        let missing =
            condition.is_none_or(|c| c.code.is_none() || c.diagnosis_date.is_none());
        evaluation.record(Some(missing), || {
            RowBuilder::new(&patient.subject)
                .entity(Some(patient))
                .entity(condition)
                .finish()
        });
    }
    evaluation.finish(Rule::WithoutConditionValues, None)
}

pub(super) fn without_surgery(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<Patient>(EntityKind::Patient)
        .computed("surgeries");
    let mut evaluation = Evaluation::new(schema);
    let surgeries = group_by_subject::<Surgery>(&ctx.tables.surgeries);
    for patient in ctx.patients() {
        let count = surgeries.get(&patient.subject).map_or(0, Vec::len);
        evaluation.record(Some(count == 0), || {
            RowBuilder::new(&patient.subject)
                .entity(Some(patient))
                .value(count)
                .finish()
        });
    }
    evaluation.finish(Rule::WithoutSurgery, None)
}
