use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque patient key shared by every entity table.
///
/// Assigned when record bundles are turned into entity tables; it is not the
/// registry identifier, which stays on [`crate::Patient::identifier`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectKey(String);

impl SubjectKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of one stored entity, e.g. `Surgery/3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(kind: EntityKind, ordinal: usize) -> Self {
        Self(format!("{}/{}", kind.resource_name(), ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every entity kind the extractor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Patient,
    Condition,
    Specimen,
    Surgery,
    RadiationTherapy,
    TargetedTherapy,
    Pharmacotherapy,
    Response,
    TimeObservation,
    Recurrence,
    Tnm,
    DiagnosticProcedure,
}

impl EntityKind {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Patient,
            Self::Condition,
            Self::Specimen,
            Self::Surgery,
            Self::RadiationTherapy,
            Self::TargetedTherapy,
            Self::Pharmacotherapy,
            Self::Response,
            Self::TimeObservation,
            Self::Recurrence,
            Self::Tnm,
            Self::DiagnosticProcedure,
        ]
    }

    /// Snake-case name used in file names and rule scopes.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Condition => "condition",
            Self::Specimen => "specimen",
            Self::Surgery => "surgery",
            Self::RadiationTherapy => "radiation_therapy",
            Self::TargetedTherapy => "targeted_therapy",
            Self::Pharmacotherapy => "pharmacotherapy",
            Self::Response => "response",
            Self::TimeObservation => "time_observation",
            Self::Recurrence => "recurrence",
            Self::Tnm => "tnm",
            Self::DiagnosticProcedure => "diagnostic_procedure",
        }
    }

    /// Resource-style prefix used for entity ids.
    pub const fn resource_name(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Condition => "Condition",
            Self::Specimen => "Specimen",
            Self::Surgery => "Surgery",
            Self::RadiationTherapy => "RadiationTherapy",
            Self::TargetedTherapy => "TargetedTherapy",
            Self::Pharmacotherapy => "DrugExposure",
            Self::Response => "Response",
            Self::TimeObservation => "TimeObservation",
            Self::Recurrence => "Recurrence",
            Self::Tnm => "Tnm",
            Self::DiagnosticProcedure => "DiagnosticProcedure",
        }
    }

    /// Human-readable label for summaries.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Condition => "Condition",
            Self::Specimen => "Specimen",
            Self::Surgery => "Surgery",
            Self::RadiationTherapy => "Radiation therapy",
            Self::TargetedTherapy => "Targeted therapy",
            Self::Pharmacotherapy => "Pharmacotherapy",
            Self::Response => "Response to therapy",
            Self::TimeObservation => "Time observation",
            Self::Recurrence => "Recurrence",
            Self::Tnm => "TNM",
            Self::DiagnosticProcedure => "Diagnostic procedure",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
