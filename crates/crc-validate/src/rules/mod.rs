//! Rule implementations, grouped by the tables they read.
//!
//! - **temporal**: diagnosis, vital status and survival plausibility (1-8)
//! - **pharma**: drug exposure descriptions and durations (9, 10, 12, 25)
//! - **surgery**: surgery location and type (13-15)
//! - **events**: interval, response and treatment timing (16-24)
//! - **staging**: TNM and stage cross-checks (26-28)
//! - **reports**: completeness and coverage reports

mod events;
mod pharma;
mod reports;
mod staging;
mod surgery;
mod temporal;

use crc_model::{EntityKind, RegistryError, Result};

use crate::catalog::Rule;
use crate::context::RuleContext;
use crate::outcome::RuleOutcome;

/// Evaluates `rule` over every one of its scopes.
pub fn evaluate(rule: Rule, ctx: &RuleContext<'_>) -> Result<Vec<RuleOutcome>> {
    if rule.is_scoped() {
        rule.scopes()
            .iter()
            .map(|scope| evaluate_one(rule, Some(*scope), ctx))
            .collect()
    } else {
        Ok(vec![evaluate_one(rule, None, ctx)?])
    }
}

fn evaluate_one(
    rule: Rule,
    scope: Option<EntityKind>,
    ctx: &RuleContext<'_>,
) -> Result<RuleOutcome> {
    match (rule, scope) {
        (Rule::LastUpdateBeforeDiagnosis, None) => temporal::last_update_before_diagnosis(ctx),
        (Rule::VitalCheckEqualsDiagnosis, None) => temporal::vital_check_equals_diagnosis(ctx),
        (Rule::SuspiciousSurvival, None) => temporal::suspicious_survival(ctx),
        (Rule::TooYoungPatient, None) => temporal::too_young_patient(ctx),
        (Rule::SuspiciouslyLongSurvival, None) => temporal::suspiciously_long_survival(ctx),
        (Rule::VitalStatusTimestampMissing, None) => temporal::vital_status_timestamp_missing(ctx),
        (Rule::VitalStatusTimestampInFuture, None) => {
            temporal::vital_status_timestamp_in_future(ctx)
        }
        (Rule::DiagnosisInFuture, None) => temporal::diagnosis_in_future(ctx),
        (Rule::MissingDrugExposureInfo, None) => pharma::missing_drug_exposure_info(ctx),
        (Rule::SuspiciousPharma | Rule::SuspiciousPharmaOther, None) => {
            pharma::suspicious_pharma(ctx, rule)
        }
        (Rule::SuspiciouslyShortPharma, None) => pharma::suspiciously_short_pharma(ctx),
        (Rule::LocationMismatchSingleSurgery | Rule::LocationMismatchMultipleSurgeries, None) => {
            surgery::location_mismatch(ctx, rule)
        }
        (Rule::SurgeryLocationTypeMismatch, None) => surgery::location_type_mismatch(ctx),
        (Rule::EndBeforeStart, Some(scope)) => events::end_before_start(ctx, scope),
        (Rule::EventAfterSurvival, Some(scope)) => events::event_after_survival(ctx, scope),
        (Rule::ResponseBeforeDiagnosis, None) => events::response_before_diagnosis(ctx),
        (Rule::DiedWithCompleteLastResponse, None) => {
            events::died_with_complete_last_response(ctx)
        }
        (Rule::ResponseInFuture, None) => events::response_in_future(ctx),
        (Rule::TherapyBeforeDiagnosis, Some(scope)) => events::therapy_before_diagnosis(ctx, scope),
        (Rule::TreatmentStartInFuture, Some(scope)) => events::treatment_start_in_future(ctx, scope),
        (Rule::TreatmentEndInFuture, Some(scope)) => events::treatment_end_in_future(ctx, scope),
        (Rule::TherapyInWeekZero, Some(scope)) => events::therapy_in_week_zero(ctx, scope),
        (Rule::StageMismatch, None) => staging::stage_mismatch(ctx),
        (Rule::UncomputableTnm, None) => staging::uncomputable_tnm(ctx),
        (Rule::NxWithDeterminedStage, None) => staging::nx_with_determined_stage(ctx),
        (Rule::Completeness, Some(scope)) => reports::completeness(ctx, scope),
        (Rule::Uniqueness, Some(scope)) => reports::uniqueness(ctx, scope),
        (Rule::CountsOfRecords, None) => reports::counts_of_records(ctx),
        (Rule::MissingPreservationMode, None) => reports::missing_preservation_mode(ctx),
        (Rule::ResponseMissingFields, None) => reports::response_missing_fields(ctx),
        (Rule::PreservationModeButNoFfpe, None) => reports::preservation_mode_but_no_ffpe(ctx),
        (Rule::TreatmentAfterCompleteResponse, None) => {
            reports::treatment_after_complete_response(ctx)
        }
        (Rule::MissingSpecimenDate, None) => reports::missing_specimen_date(ctx),
        (Rule::WithoutSpecimenSourceId, None) => reports::without_specimen_source_id(ctx),
        (Rule::WithoutConditionValues, None) => reports::without_condition_values(ctx),
        (Rule::WithoutSurgery, None) => reports::without_surgery(ctx),
        (rule, Some(scope)) => Err(RegistryError::Message(format!(
            "rule {rule} has no {scope} scope"
        ))),
        (rule, None) => Err(RegistryError::Message(format!(
            "rule {rule} needs an entity scope"
        ))),
    }
}
