//! Interval, response, and treatment timing.
//!
//! Scoped rules read their table through [`RuleContext::events`], so the
//! same check runs over surgeries, therapies, drug exposures, and responses.

use chrono::NaiveDate;

use crc_map::is_complete_response;
use crc_model::{
    Condition, EntityKind, Patient, ResponseObservation, Result, Stored, group_by_subject,
};
use crc_transform::weeks_between;

use crate::catalog::Rule;
use crate::context::{EventRow, RuleContext, ScopedEvents};
use crate::frame::{RowBuilder, RowSchema};
use crate::outcome::{Evaluation, RuleOutcome};

/// Evaluates `verdict` for each event of `scope`, joined to the condition.
fn event_rule(
    ctx: &RuleContext<'_>,
    rule: Rule,
    scope: EntityKind,
    verdict: impl Fn(&EventRow<'_>, Option<NaiveDate>) -> Option<bool>,
) -> Result<RuleOutcome> {
    let events = ctx.events(scope);
    let schema = events
        .schema(RowSchema::new())
        .entity::<Condition>(EntityKind::Condition);
    let mut evaluation = Evaluation::new(schema);
    for event in &events.rows {
        let condition = ctx.condition(event.subject);
        let diagnosis = condition.and_then(|c| c.diagnosis_date);
        evaluation.record(verdict(event, diagnosis), || {
            RowBuilder::new(event.subject)
                .record(event.id, event.values())
                .entity(condition)
                .finish()
        });
    }
    evaluation.finish(rule, Some(scope))
}

pub(super) fn end_before_start(ctx: &RuleContext<'_>, scope: EntityKind) -> Result<RuleOutcome> {
    event_rule(ctx, Rule::EndBeforeStart, scope, |event, _| {
        event.start.zip(event.end).map(|(start, end)| end < start)
    })
}

pub(super) fn therapy_before_diagnosis(
    ctx: &RuleContext<'_>,
    scope: EntityKind,
) -> Result<RuleOutcome> {
    event_rule(ctx, Rule::TherapyBeforeDiagnosis, scope, |event, diagnosis| {
        event
            .start
            .zip(diagnosis)
            .map(|(start, diagnosis)| start < diagnosis)
    })
}

pub(super) fn treatment_start_in_future(
    ctx: &RuleContext<'_>,
    scope: EntityKind,
) -> Result<RuleOutcome> {
    let now = ctx.reference_date;
    event_rule(ctx, Rule::TreatmentStartInFuture, scope, |event, _| {
        event.start.map(|start| start > now)
    })
}

pub(super) fn treatment_end_in_future(
    ctx: &RuleContext<'_>,
    scope: EntityKind,
) -> Result<RuleOutcome> {
    let now = ctx.reference_date;
    event_rule(ctx, Rule::TreatmentEndInFuture, scope, |event, _| {
        event.end.map(|end| end > now)
    })
}

pub(super) fn therapy_in_week_zero(ctx: &RuleContext<'_>, scope: EntityKind) -> Result<RuleOutcome> {
    event_rule(ctx, Rule::TherapyInWeekZero, scope, |event, diagnosis| {
        match (event.start, event.end, diagnosis) {
            (Some(start), Some(end), Some(diagnosis)) => {
                Some(start == diagnosis && end == diagnosis)
            }
            _ => None,
        }
    })
}

/// Weeks from diagnosis to start and end, checked against the patient's
/// adjusted survival for this table. An absent end only drops the end check.
pub(super) fn event_after_survival(
    ctx: &RuleContext<'_>,
    scope: EntityKind,
) -> Result<RuleOutcome> {
    let events: ScopedEvents<'_> = ctx.events(scope);
    let schema = events
        .schema(RowSchema::new())
        .entity::<Patient>(EntityKind::Patient)
        .computed("start_weeks")
        .computed("end_weeks")
        .computed("adjusted_overall_survival");
    let mut evaluation = Evaluation::new(schema);
    for event in &events.rows {
        let diagnosis = ctx.diagnosis_date(event.subject);
        let adjusted = ctx.adjusted_survival(scope, event.subject);
        let start_weeks = event
            .start
            .zip(diagnosis)
            .map(|(start, diagnosis)| weeks_between(diagnosis, start));
        let end_weeks = event
            .end
            .zip(diagnosis)
            .map(|(end, diagnosis)| weeks_between(diagnosis, end));
        let verdict = start_weeks.zip(adjusted).map(|(start_weeks, adjusted)| {
            start_weeks > adjusted || end_weeks.is_some_and(|end| end > adjusted + 1.0)
        });
        evaluation.record(verdict, || {
            RowBuilder::new(event.subject)
                .record(event.id, event.values())
                .entity(ctx.patient(event.subject))
                .value(start_weeks)
                .value(end_weeks)
                .value(adjusted)
                .finish()
        });
    }
    evaluation.finish(Rule::EventAfterSurvival, Some(scope))
}

fn response_schema() -> RowSchema {
    RowSchema::new().entity::<ResponseObservation>(EntityKind::Response)
}

pub(super) fn response_before_diagnosis(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = response_schema().entity::<Condition>(EntityKind::Condition);
    let mut evaluation = Evaluation::new(schema);
    for response in &ctx.tables.responses {
        let condition = ctx.condition(&response.subject);
        let diagnosis = condition.and_then(|c| c.diagnosis_date);
        let verdict = response
            .date
            .zip(diagnosis)
            .map(|(date, diagnosis)| date < diagnosis);
        evaluation.record(verdict, || {
            RowBuilder::new(&response.subject)
                .entity(Some(response))
                .entity(condition)
                .finish()
        });
    }
    evaluation.finish(Rule::ResponseBeforeDiagnosis, None)
}

pub(super) fn response_in_future(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut evaluation = Evaluation::new(response_schema());
    for response in &ctx.tables.responses {
        let verdict = response.date.map(|date| date > ctx.reference_date);
        evaluation.record(verdict, || {
            RowBuilder::new(&response.subject)
                .entity(Some(response))
                .finish()
        });
    }
    evaluation.finish(Rule::ResponseInFuture, None)
}

/// Latest dated response; the first in source order wins a tie.
fn latest_response<'a>(
    responses: &[&'a Stored<ResponseObservation>],
) -> Option<&'a Stored<ResponseObservation>> {
    let mut latest: Option<&'a Stored<ResponseObservation>> = None;
    for response in responses {
        let Some(date) = response.date else {
            continue;
        };
        if latest.and_then(|l| l.date).is_none_or(|current| date > current) {
            latest = Some(*response);
        }
    }
    latest
}

/// One row per patient with at least one response.
pub(super) fn died_with_complete_last_response(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<Patient>(EntityKind::Patient)
        .entity::<ResponseObservation>(EntityKind::Response);
    let mut evaluation = Evaluation::new(schema);
    let responses = group_by_subject(&ctx.tables.responses);
    for patient in ctx.patients() {
        let Some(rows) = responses.get(&patient.subject) else {
            continue;
        };
        let latest = latest_response(rows);
        let verdict = match (patient.deceased, latest.and_then(|r| r.response.as_ref())) {
            (Some(deceased), Some(coding)) => Some(deceased && is_complete_response(coding)),
            _ => None,
        };
        evaluation.record(verdict, || {
            RowBuilder::new(&patient.subject)
                .entity(Some(patient))
                .entity(latest)
                .finish()
        });
    }
    evaluation.finish(Rule::DiedWithCompleteLastResponse, None)
}
