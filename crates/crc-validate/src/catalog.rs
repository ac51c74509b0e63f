//! The rule catalog.
//!
//! Every rule has a stable snake-case name used for output files and rule
//! selection, a human-readable title, and a family. Scoped rules run once per
//! entity kind in [`Rule::scopes`] and name their outcomes `<rule>_<scope>`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crc_model::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFamily {
    /// Plausibility and temporal checks.
    Warning,
    /// Completeness and coverage checks.
    Report,
}

impl RuleFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rule {
    LastUpdateBeforeDiagnosis,
    VitalCheckEqualsDiagnosis,
    SuspiciousSurvival,
    TooYoungPatient,
    SuspiciouslyLongSurvival,
    VitalStatusTimestampMissing,
    VitalStatusTimestampInFuture,
    DiagnosisInFuture,
    MissingDrugExposureInfo,
    SuspiciousPharma,
    SuspiciousPharmaOther,
    LocationMismatchSingleSurgery,
    LocationMismatchMultipleSurgeries,
    SurgeryLocationTypeMismatch,
    EndBeforeStart,
    EventAfterSurvival,
    ResponseBeforeDiagnosis,
    DiedWithCompleteLastResponse,
    ResponseInFuture,
    TherapyBeforeDiagnosis,
    TreatmentStartInFuture,
    TreatmentEndInFuture,
    TherapyInWeekZero,
    SuspiciouslyShortPharma,
    StageMismatch,
    UncomputableTnm,
    NxWithDeterminedStage,
    Completeness,
    Uniqueness,
    CountsOfRecords,
    MissingPreservationMode,
    ResponseMissingFields,
    PreservationModeButNoFfpe,
    TreatmentAfterCompleteResponse,
    MissingSpecimenDate,
    WithoutSpecimenSourceId,
    WithoutConditionValues,
    WithoutSurgery,
}

const INTERVALS: &[EntityKind] = &[
    EntityKind::RadiationTherapy,
    EntityKind::TargetedTherapy,
    EntityKind::Pharmacotherapy,
];

const TREATMENTS: &[EntityKind] = &[
    EntityKind::Surgery,
    EntityKind::RadiationTherapy,
    EntityKind::TargetedTherapy,
    EntityKind::Pharmacotherapy,
];

const SURVIVAL_EVENTS: &[EntityKind] = &[
    EntityKind::RadiationTherapy,
    EntityKind::TargetedTherapy,
    EntityKind::Surgery,
    EntityKind::Response,
];

impl Rule {
    pub const fn all() -> &'static [Self] {
        &[
            Self::LastUpdateBeforeDiagnosis,
            Self::VitalCheckEqualsDiagnosis,
            Self::SuspiciousSurvival,
            Self::TooYoungPatient,
            Self::SuspiciouslyLongSurvival,
            Self::VitalStatusTimestampMissing,
            Self::VitalStatusTimestampInFuture,
            Self::DiagnosisInFuture,
            Self::MissingDrugExposureInfo,
            Self::SuspiciousPharma,
            Self::SuspiciousPharmaOther,
            Self::LocationMismatchSingleSurgery,
            Self::LocationMismatchMultipleSurgeries,
            Self::SurgeryLocationTypeMismatch,
            Self::EndBeforeStart,
            Self::EventAfterSurvival,
            Self::ResponseBeforeDiagnosis,
            Self::DiedWithCompleteLastResponse,
            Self::ResponseInFuture,
            Self::TherapyBeforeDiagnosis,
            Self::TreatmentStartInFuture,
            Self::TreatmentEndInFuture,
            Self::TherapyInWeekZero,
            Self::SuspiciouslyShortPharma,
            Self::StageMismatch,
            Self::UncomputableTnm,
            Self::NxWithDeterminedStage,
            Self::Completeness,
            Self::Uniqueness,
            Self::CountsOfRecords,
            Self::MissingPreservationMode,
            Self::ResponseMissingFields,
            Self::PreservationModeButNoFfpe,
            Self::TreatmentAfterCompleteResponse,
            Self::MissingSpecimenDate,
            Self::WithoutSpecimenSourceId,
            Self::WithoutConditionValues,
            Self::WithoutSurgery,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::LastUpdateBeforeDiagnosis => "last_update_before_initial_diagnosis",
            Self::VitalCheckEqualsDiagnosis => {
                "vital_check_date_is_equal_to_initial_diagnosis_date"
            }
            Self::SuspiciousSurvival => "suspicious_survival_information",
            Self::TooYoungPatient => "too_young_patient",
            Self::SuspiciouslyLongSurvival => "suspiciously_long_survival",
            Self::VitalStatusTimestampMissing => "vital_status_timestamp_missing",
            Self::VitalStatusTimestampInFuture => "vital_status_timestamp_is_in_the_future",
            Self::DiagnosisInFuture => "diagnosis_in_future",
            Self::MissingDrugExposureInfo => "missing_drug_exposure_info",
            Self::SuspiciousPharma => "sus_pharma",
            Self::SuspiciousPharmaOther => "sus_pharma_other",
            Self::LocationMismatchSingleSurgery => {
                "surgery_and_histological_location_do_not_match_only_one"
            }
            Self::LocationMismatchMultipleSurgeries => {
                "surgery_and_histological_location_do_not_match_multiple"
            }
            Self::SurgeryLocationTypeMismatch => "mismatch_between_surgery_location_and_surgery_type",
            Self::EndBeforeStart => "end_time_is_before_start_time",
            Self::EventAfterSurvival => "event_starts_or_ends_after_survival_of_patient",
            Self::ResponseBeforeDiagnosis => "start_of_response_to_therapy_is_before_diagnosis",
            Self::DiedWithCompleteLastResponse => "patient_died_but_last_response_is_complete",
            Self::ResponseInFuture => "start_of_response_to_therapy_is_in_the_future",
            Self::TherapyBeforeDiagnosis => "start_of_therapy_is_before_diagnosis",
            Self::TreatmentStartInFuture => "start_of_treatment_is_in_the_future",
            Self::TreatmentEndInFuture => "end_of_treatment_is_in_the_future",
            Self::TherapyInWeekZero => "non_surgery_therapy_starts_and_ends_in_week_0",
            Self::SuspiciouslyShortPharma => "sus_short_pharma",
            Self::StageMismatch => "mismatch_between_provided_and_computed_stage_value",
            Self::UncomputableTnm => "sus_tnm_combo_for_uicc_version_or_uncomputable_stage",
            Self::NxWithDeterminedStage => "pnx_and_missing_uicc_stage",
            Self::Completeness => "completeness",
            Self::Uniqueness => "uniqueness",
            Self::CountsOfRecords => "counts_of_records",
            Self::MissingPreservationMode => "missing_preservation_mode",
            Self::ResponseMissingFields => "patient_with_response_to_therapy_missing_fields",
            Self::PreservationModeButNoFfpe => "preservation_mode_but_no_ffpe",
            Self::TreatmentAfterCompleteResponse => {
                "treatment_after_complete_response_without_recurrence_diagnosis"
            }
            Self::MissingSpecimenDate => "missing_specimen_date",
            Self::WithoutSpecimenSourceId => "patients_without_specimen_source_id",
            Self::WithoutConditionValues => "patients_without_condition_values",
            Self::WithoutSurgery => "patients_without_surgery",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::LastUpdateBeforeDiagnosis => "Vital check date precedes initial diagnosis date",
            Self::VitalCheckEqualsDiagnosis => {
                "Vital check date is equal to initial diagnosis date"
            }
            Self::SuspiciousSurvival => "Suspicious survival information",
            Self::TooYoungPatient => "Suspiciously young patient",
            Self::SuspiciouslyLongSurvival => "Suspiciously long survival",
            Self::VitalStatusTimestampMissing => "Vital status timestamp missing",
            Self::VitalStatusTimestampInFuture => "Vital status timestamp is in the future",
            Self::DiagnosisInFuture => "Initial diagnosis date is in the future",
            Self::MissingDrugExposureInfo => {
                "Pharmacotherapy scheme description is missing while pharmacotherapy scheme is Other"
            }
            Self::SuspiciousPharma => "Suspicious description of pharmacotherapy",
            Self::SuspiciousPharmaOther => {
                "Suspicious characters or words in description of pharmacotherapy"
            }
            Self::LocationMismatchSingleSurgery => {
                "Surgery and histological location do not match"
            }
            Self::LocationMismatchMultipleSurgeries => {
                "Surgery and histological location do not match (but multiple surgeries per patient)"
            }
            Self::SurgeryLocationTypeMismatch => "Mismatch between surgery location and surgery type",
            Self::EndBeforeStart => {
                "Negative event (treatment/response) duration: end time is before start time"
            }
            Self::EventAfterSurvival => {
                "Event (treatment/response) starts or ends after survival of patient"
            }
            Self::ResponseBeforeDiagnosis => "Start of response to therapy is before diagnosis",
            Self::DiedWithCompleteLastResponse => {
                "Suspect incomplete followup: patient died while last response to therapy is 'Complete response'"
            }
            Self::ResponseInFuture => "Start of response to therapy is in the future",
            Self::TherapyBeforeDiagnosis => "Start of therapy is before diagnosis",
            Self::TreatmentStartInFuture => "Start of treatment is in the future",
            Self::TreatmentEndInFuture => "End of treatment is in the future",
            Self::TherapyInWeekZero => {
                "Non-surgery therapy starts and ends in week 0 since initial diagnosis (maybe false positive)"
            }
            Self::SuspiciouslyShortPharma => {
                "Suspiciously short pharma therapy - less than 1 week (may be false positive)"
            }
            Self::StageMismatch => "Mismatch between provided and computed stage value",
            Self::UncomputableTnm => {
                "Suspicious TNM value combination for given UICC version or uncomputable UICC stage"
            }
            Self::NxWithDeterminedStage => {
                "pNX provided in TNM values, while UICC stage is determined"
            }
            Self::Completeness => "Missing values per attribute",
            Self::Uniqueness => "Duplicated records",
            Self::CountsOfRecords => "Number of records per entity",
            Self::MissingPreservationMode => "Specimens without preservation mode",
            Self::ResponseMissingFields => "Responses to therapy with missing values",
            Self::PreservationModeButNoFfpe => "Specimens with preservation mode other than FFPE",
            Self::TreatmentAfterCompleteResponse => {
                "New treatment after complete response without recurrence diagnosis"
            }
            Self::MissingSpecimenDate => "Patients without specimen collection date",
            Self::WithoutSpecimenSourceId => "Patients without specimen identifier",
            Self::WithoutConditionValues => "Patients without histology values",
            Self::WithoutSurgery => "Patients without surgery",
        }
    }

    pub const fn family(&self) -> RuleFamily {
        match self {
            Self::Completeness
            | Self::Uniqueness
            | Self::CountsOfRecords
            | Self::MissingPreservationMode
            | Self::ResponseMissingFields
            | Self::PreservationModeButNoFfpe
            | Self::TreatmentAfterCompleteResponse
            | Self::MissingSpecimenDate
            | Self::WithoutSpecimenSourceId
            | Self::WithoutConditionValues
            | Self::WithoutSurgery => RuleFamily::Report,
            _ => RuleFamily::Warning,
        }
    }

    /// Registry catalog number, when the rule has one.
    pub const fn number(&self) -> Option<u8> {
        let number = match self {
            Self::LastUpdateBeforeDiagnosis => 1,
            Self::VitalCheckEqualsDiagnosis => 2,
            Self::SuspiciousSurvival => 3,
            Self::TooYoungPatient => 4,
            Self::SuspiciouslyLongSurvival => 5,
            Self::VitalStatusTimestampMissing => 6,
            Self::VitalStatusTimestampInFuture => 7,
            Self::DiagnosisInFuture => 8,
            Self::MissingDrugExposureInfo => 9,
            Self::SuspiciousPharma => 10,
            Self::SuspiciousPharmaOther => 12,
            Self::LocationMismatchSingleSurgery => 13,
            Self::LocationMismatchMultipleSurgeries => 14,
            Self::SurgeryLocationTypeMismatch => 15,
            Self::EndBeforeStart => 16,
            Self::EventAfterSurvival => 17,
            Self::ResponseBeforeDiagnosis => 18,
            Self::DiedWithCompleteLastResponse => 19,
            Self::ResponseInFuture => 20,
            Self::TherapyBeforeDiagnosis => 21,
            Self::TreatmentStartInFuture => 22,
            Self::TreatmentEndInFuture => 23,
            Self::TherapyInWeekZero => 24,
            Self::SuspiciouslyShortPharma => 25,
            Self::StageMismatch => 26,
            Self::UncomputableTnm => 27,
            Self::NxWithDeterminedStage => 28,
            Self::CountsOfRecords => 35,
            Self::MissingPreservationMode => 4,
            Self::ResponseMissingFields => 12,
            Self::PreservationModeButNoFfpe => 40,
            Self::TreatmentAfterCompleteResponse => 42,
            Self::MissingSpecimenDate => 1,
            Self::WithoutSpecimenSourceId => 3,
            Self::WithoutConditionValues => 6,
            Self::WithoutSurgery => 41,
            Self::Completeness | Self::Uniqueness => return None,
        };
        Some(number)
    }

    /// Entity kinds the rule runs over separately; empty for unscoped rules.
    pub const fn scopes(&self) -> &'static [EntityKind] {
        match self {
            Self::EndBeforeStart | Self::TreatmentEndInFuture | Self::TherapyInWeekZero => {
                INTERVALS
            }
            Self::EventAfterSurvival => SURVIVAL_EVENTS,
            Self::TherapyBeforeDiagnosis | Self::TreatmentStartInFuture => TREATMENTS,
            Self::Completeness | Self::Uniqueness => EntityKind::all(),
            _ => &[],
        }
    }

    pub fn is_scoped(&self) -> bool {
        !self.scopes().is_empty()
    }

    /// Outcome name for one scope of this rule.
    pub fn outcome_name(&self, scope: Option<EntityKind>) -> String {
        match scope {
            Some(kind) => format!("{}_{}", self.name(), kind.name()),
            None => self.name().to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|rule| rule.name() == name)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
