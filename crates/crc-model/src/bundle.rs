use serde::{Deserialize, Serialize};

use crate::entities::{
    Condition, DiagnosticProcedure, DrugExposure, Patient, RecurrenceObservation,
    ResponseObservation, Specimen, Surgery, Therapy, TimeObservation, Tnm,
};

/// Everything extracted from one `BHPatient` record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBundle {
    pub patient: Patient,
    pub condition: Option<Condition>,
    pub specimens: Vec<Specimen>,
    pub surgeries: Vec<Surgery>,
    pub radiation_therapies: Vec<Therapy>,
    pub targeted_therapies: Vec<Therapy>,
    pub drug_exposures: Vec<DrugExposure>,
    pub responses: Vec<ResponseObservation>,
    pub time_observation: Option<TimeObservation>,
    pub recurrence: Option<RecurrenceObservation>,
    pub tnm: Option<Tnm>,
    pub diagnostic_procedures: Vec<DiagnosticProcedure>,
}

impl RecordBundle {
    pub fn new(patient: Patient) -> Self {
        Self {
            patient,
            ..Self::default()
        }
    }

    /// Number of entities this bundle contributes, the patient included.
    pub fn entity_count(&self) -> usize {
        1 + usize::from(self.condition.is_some())
            + self.specimens.len()
            + self.surgeries.len()
            + self.radiation_therapies.len()
            + self.targeted_therapies.len()
            + self.drug_exposures.len()
            + self.responses.len()
            + usize::from(self.time_observation.is_some())
            + usize::from(self.recurrence.is_some())
            + usize::from(self.tnm.is_some())
            + self.diagnostic_procedures.len()
    }
}
