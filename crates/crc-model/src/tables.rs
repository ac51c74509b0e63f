//! Entity tables keyed by opaque subject keys.
//!
//! [`EntityTables::from_bundles`] stands at the store boundary: it assigns
//! every bundle a subject key and every entity an id, the way an external
//! store would, and the rule engine only ever sees these tables.

use std::collections::BTreeMap;
use std::ops::Deref;

use serde::Serialize;

use crate::bundle::RecordBundle;
use crate::entities::{
    Condition, DiagnosticProcedure, DrugExposure, Patient, RecurrenceObservation,
    ResponseObservation, Specimen, Surgery, Therapy, TimeObservation, Tnm,
};
use crate::ids::{EntityId, EntityKind, SubjectKey};

/// An entity together with its assigned id and owning subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<T> {
    pub id: EntityId,
    pub subject: SubjectKey,
    pub record: T,
}

impl<T> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityTables {
    pub patients: Vec<Stored<Patient>>,
    pub conditions: Vec<Stored<Condition>>,
    pub specimens: Vec<Stored<Specimen>>,
    pub surgeries: Vec<Stored<Surgery>>,
    pub radiation_therapies: Vec<Stored<Therapy>>,
    pub targeted_therapies: Vec<Stored<Therapy>>,
    pub drug_exposures: Vec<Stored<DrugExposure>>,
    pub responses: Vec<Stored<ResponseObservation>>,
    pub time_observations: Vec<Stored<TimeObservation>>,
    pub recurrences: Vec<Stored<RecurrenceObservation>>,
    pub tnms: Vec<Stored<Tnm>>,
    pub diagnostic_procedures: Vec<Stored<DiagnosticProcedure>>,
}

/// Appends entities of one kind, numbering them from 1 in source order.
fn push_all<T>(
    table: &mut Vec<Stored<T>>,
    kind: EntityKind,
    subject: &SubjectKey,
    records: impl IntoIterator<Item = T>,
) {
    for record in records {
        let ordinal = table.len() + 1;
        table.push(Stored {
            id: EntityId::new(kind, ordinal),
            subject: subject.clone(),
            record,
        });
    }
}

impl EntityTables {
    pub fn from_bundles(bundles: impl IntoIterator<Item = RecordBundle>) -> Self {
        let mut tables = Self::default();
        for bundle in bundles {
            let ordinal = tables.patients.len() + 1;
            let subject = SubjectKey::new(format!(
                "{}/{}",
                EntityKind::Patient.resource_name(),
                ordinal
            ));
            push_all(
                &mut tables.patients,
                EntityKind::Patient,
                &subject,
                [bundle.patient],
            );
            push_all(
                &mut tables.conditions,
                EntityKind::Condition,
                &subject,
                bundle.condition,
            );
            push_all(
                &mut tables.specimens,
                EntityKind::Specimen,
                &subject,
                bundle.specimens,
            );
            push_all(
                &mut tables.surgeries,
                EntityKind::Surgery,
                &subject,
                bundle.surgeries,
            );
            push_all(
                &mut tables.radiation_therapies,
                EntityKind::RadiationTherapy,
                &subject,
                bundle.radiation_therapies,
            );
            push_all(
                &mut tables.targeted_therapies,
                EntityKind::TargetedTherapy,
                &subject,
                bundle.targeted_therapies,
            );
            push_all(
                &mut tables.drug_exposures,
                EntityKind::Pharmacotherapy,
                &subject,
                bundle.drug_exposures,
            );
            push_all(
                &mut tables.responses,
                EntityKind::Response,
                &subject,
                bundle.responses,
            );
            push_all(
                &mut tables.time_observations,
                EntityKind::TimeObservation,
                &subject,
                bundle.time_observation,
            );
            push_all(
                &mut tables.recurrences,
                EntityKind::Recurrence,
                &subject,
                bundle.recurrence,
            );
            push_all(&mut tables.tnms, EntityKind::Tnm, &subject, bundle.tnm);
            push_all(
                &mut tables.diagnostic_procedures,
                EntityKind::DiagnosticProcedure,
                &subject,
                bundle.diagnostic_procedures,
            );
        }
        tables
    }

    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Number of stored entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Patient => self.patients.len(),
            EntityKind::Condition => self.conditions.len(),
            EntityKind::Specimen => self.specimens.len(),
            EntityKind::Surgery => self.surgeries.len(),
            EntityKind::RadiationTherapy => self.radiation_therapies.len(),
            EntityKind::TargetedTherapy => self.targeted_therapies.len(),
            EntityKind::Pharmacotherapy => self.drug_exposures.len(),
            EntityKind::Response => self.responses.len(),
            EntityKind::TimeObservation => self.time_observations.len(),
            EntityKind::Recurrence => self.recurrences.len(),
            EntityKind::Tnm => self.tnms.len(),
            EntityKind::DiagnosticProcedure => self.diagnostic_procedures.len(),
        }
    }

    pub fn total_entities(&self) -> usize {
        EntityKind::all().iter().map(|kind| self.count(*kind)).sum()
    }
}

/// Groups rows by subject, keeping source order inside each group.
pub fn group_by_subject<T>(rows: &[Stored<T>]) -> BTreeMap<&SubjectKey, Vec<&Stored<T>>> {
    let mut groups: BTreeMap<&SubjectKey, Vec<&Stored<T>>> = BTreeMap::new();
    for row in rows {
        groups.entry(&row.subject).or_default().push(row);
    }
    groups
}

/// First row per subject, for tables holding at most one entity per patient.
pub fn first_by_subject<T>(rows: &[Stored<T>]) -> BTreeMap<&SubjectKey, &Stored<T>> {
    let mut index = BTreeMap::new();
    for row in rows {
        index.entry(&row.subject).or_insert(row);
    }
    index
}
