//! Diagnosis, vital status and survival plausibility.

use chrono::NaiveDate;

use crc_model::{
    Condition, EntityKind, Patient, Result, Stored, SubjectKey, TimeObservation,
};
use crc_transform::days_between;

use crate::catalog::Rule;
use crate::context::RuleContext;
use crate::frame::{RowBuilder, RowSchema};
use crate::outcome::{Evaluation, RuleOutcome};

/// Youngest plausible age at diagnosis, in days.
const MIN_AGE_DAYS: f64 = 15.0 * 365.25;
/// Survival above this many weeks is implausible on its own.
const MAX_SURVIVAL_WEEKS: i64 = 4000;
const MAX_SURVIVAL_RATIO: f64 = 3.0;

type ConditionTime<'a> = (
    &'a SubjectKey,
    Option<&'a Stored<Condition>>,
    Option<&'a Stored<TimeObservation>>,
);

/// Condition ⟗ TimeObservation on the subject key, in patient order.
fn condition_time<'a>(ctx: &RuleContext<'a>) -> Vec<ConditionTime<'a>> {
    ctx.patients()
        .iter()
        .filter_map(|patient| {
            let subject = &patient.subject;
            let condition = ctx.condition(subject);
            let time = ctx.time_observation(subject);
            (condition.is_some() || time.is_some()).then_some((subject, condition, time))
        })
        .collect()
}

fn condition_time_schema() -> RowSchema {
    RowSchema::new()
        .entity::<Condition>(EntityKind::Condition)
        .entity::<TimeObservation>(EntityKind::TimeObservation)
}

fn diagnosis(condition: Option<&Stored<Condition>>) -> Option<NaiveDate> {
    condition.and_then(|c| c.diagnosis_date)
}

fn last_update(time: Option<&Stored<TimeObservation>>) -> Option<NaiveDate> {
    time.and_then(|t| t.last_update)
}

fn compare_last_update(
    ctx: &RuleContext<'_>,
    rule: Rule,
    violates: fn(NaiveDate, NaiveDate) -> bool,
) -> Result<RuleOutcome> {
    let mut evaluation = Evaluation::new(condition_time_schema());
    for (subject, condition, time) in condition_time(ctx) {
        let verdict = diagnosis(condition)
            .zip(last_update(time))
            .map(|(diagnosis, last_update)| violates(diagnosis, last_update));
        evaluation.record(verdict, || {
            RowBuilder::new(subject)
                .entity(condition)
                .entity(time)
                .finish()
        });
    }
    evaluation.finish(rule, None)
}

pub(super) fn last_update_before_diagnosis(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    compare_last_update(ctx, Rule::LastUpdateBeforeDiagnosis, |diagnosis, last_update| {
        last_update < diagnosis
    })
}

pub(super) fn vital_check_equals_diagnosis(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    compare_last_update(ctx, Rule::VitalCheckEqualsDiagnosis, |diagnosis, last_update| {
        last_update == diagnosis
    })
}

/// Overall survival against the weeks between diagnosis and last update.
///
/// `None` when an input is absent or the two dates coincide.
fn survival_ratio(
    diagnosis: Option<NaiveDate>,
    last_update: Option<NaiveDate>,
    overall_survival_weeks: Option<i64>,
) -> Option<f64> {
    let days = days_between(diagnosis?, last_update?);
    let survival = overall_survival_weeks?;
    (days != 0).then(|| survival as f64 / (days as f64 / 7.0))
}

pub(super) fn suspicious_survival(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = condition_time_schema().computed("survival_ratio");
    let mut evaluation = Evaluation::new(schema);
    for (subject, condition, time) in condition_time(ctx) {
        let diagnosis = diagnosis(condition);
        let last_update = last_update(time);
        let survival = time.and_then(|t| t.overall_survival_weeks);
        let ratio = survival_ratio(diagnosis, last_update, survival);
        let verdict = ratio
            .zip(diagnosis.zip(last_update))
            .map(|(ratio, (diagnosis, last_update))| {
                last_update > diagnosis && ratio > MAX_SURVIVAL_RATIO
            });
        evaluation.record(verdict, || {
            RowBuilder::new(subject)
                .entity(condition)
                .entity(time)
                .value(ratio)
                .finish()
        });
    }
    evaluation.finish(Rule::SuspiciousSurvival, None)
}

/// Age at diagnosis in days, from January 1 of the birth year.
fn age_days(patient: &Patient, condition: Option<&Stored<Condition>>) -> Option<i64> {
    Some(days_between(patient.birth_date()?, diagnosis(condition)?))
}

pub(super) fn too_young_patient(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<Patient>(EntityKind::Patient)
        .entity::<Condition>(EntityKind::Condition)
        .computed("age_at_diagnosis_days");
    let mut evaluation = Evaluation::new(schema);
    for patient in ctx.patients() {
        let condition = ctx.condition(&patient.subject);
        let age = age_days(patient, condition);
        let verdict = age.map(|days| (days as f64) < MIN_AGE_DAYS);
        evaluation.record(verdict, || {
            RowBuilder::new(&patient.subject)
                .entity(Some(patient))
                .entity(condition)
                .value(age)
                .finish()
        });
    }
    evaluation.finish(Rule::TooYoungPatient, None)
}

fn long_survival(survival: Option<i64>, age_days: Option<i64>) -> Option<bool> {
    let survival = survival?;
    if survival > MAX_SURVIVAL_WEEKS {
        return Some(true);
    }
    let age = age_days? as f64 / 365.0;
    Some(age + survival as f64 / 52.0 >= 100.0 && age < 95.0)
}

pub(super) fn suspiciously_long_survival(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<Patient>(EntityKind::Patient)
        .entity::<TimeObservation>(EntityKind::TimeObservation)
        .entity::<Condition>(EntityKind::Condition)
        .computed("age_at_diagnosis_days");
    let mut evaluation = Evaluation::new(schema);
    for patient in ctx.patients() {
        let subject = &patient.subject;
        let time = ctx.time_observation(subject);
        let condition = ctx.condition(subject);
        let age = age_days(patient, condition);
        let verdict = long_survival(time.and_then(|t| t.overall_survival_weeks), age);
        evaluation.record(verdict, || {
            RowBuilder::new(subject)
                .entity(Some(patient))
                .entity(time)
                .entity(condition)
                .value(age)
                .finish()
        });
    }
    evaluation.finish(Rule::SuspiciouslyLongSurvival, None)
}

pub(super) fn vital_status_timestamp_missing(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<Patient>(EntityKind::Patient)
        .entity::<TimeObservation>(EntityKind::TimeObservation);
    let mut evaluation = Evaluation::new(schema);
    for patient in ctx.patients() {
        let time = ctx.time_observation(&patient.subject);
        let verdict = patient
            .deceased
            .map(|deceased| deceased && last_update(time).is_none());
        evaluation.record(verdict, || {
            RowBuilder::new(&patient.subject)
                .entity(Some(patient))
                .entity(time)
                .finish()
        });
    }
    evaluation.finish(Rule::VitalStatusTimestampMissing, None)
}

pub(super) fn vital_status_timestamp_in_future(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new().entity::<TimeObservation>(EntityKind::TimeObservation);
    let mut evaluation = Evaluation::new(schema);
    for time in &ctx.tables.time_observations {
        let verdict = time.last_update.map(|date| date > ctx.reference_date);
        evaluation.record(verdict, || {
            RowBuilder::new(&time.subject).entity(Some(time)).finish()
        });
    }
    evaluation.finish(Rule::VitalStatusTimestampInFuture, None)
}

pub(super) fn diagnosis_in_future(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new().entity::<Condition>(EntityKind::Condition);
    let mut evaluation = Evaluation::new(schema);
    for condition in &ctx.tables.conditions {
        let verdict = condition.diagnosis_date.map(|date| date > ctx.reference_date);
        evaluation.record(verdict, || {
            RowBuilder::new(&condition.subject)
                .entity(Some(condition))
                .finish()
        });
    }
    evaluation.finish(Rule::DiagnosisInFuture, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn ratio_guards_a_zero_denominator() {
        let day = date(2020, 1, 1);
        assert!(survival_ratio(day, day, Some(10)).is_none());
        assert_eq!(survival_ratio(day, date(2020, 1, 15), Some(10)), Some(5.0));
    }

    #[test]
    fn very_long_survival_needs_no_age() {
        assert_eq!(long_survival(Some(4001), None), Some(true));
        assert_eq!(long_survival(Some(100), None), None);
        assert_eq!(long_survival(None, Some(1)), None);
    }

    #[test]
    fn survival_past_a_hundred_years() {
        let ninety = 90 * 365;
        assert_eq!(long_survival(Some(520), Some(ninety)), Some(true));
        assert_eq!(long_survival(Some(52), Some(ninety)), Some(false));
        assert_eq!(long_survival(Some(520), Some(96 * 365)), Some(false));
    }
}
