//! Read-only view over the entity tables shared by every rule.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crc_model::{
    Condition, EntityId, EntityKind, EntityTables, Interval, Patient, RecurrenceObservation,
    RuleOptions, Stored, SubjectKey, TimeObservation, first_by_subject,
};

use crate::catalog::Rule;
use crate::frame::{RowBuilder, RowSchema, TableRow, Value};
use crate::survival::survival_by_subject;

/// Flattening for rows whose entity type is only known at run time.
pub trait RowValues: Sync {
    fn row_values(&self) -> Vec<Value>;
}

impl<T: TableRow + Sync> RowValues for T {
    fn row_values(&self) -> Vec<Value> {
        self.values()
    }
}

/// One dated event of a scoped table.
pub struct EventRow<'a> {
    pub id: &'a EntityId,
    pub subject: &'a SubjectKey,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    record: &'a dyn RowValues,
}

impl EventRow<'_> {
    pub fn values(&self) -> Vec<Value> {
        self.record.row_values()
    }
}

/// The events of one entity kind, uniformly typed for scoped rules.
pub struct ScopedEvents<'a> {
    pub kind: EntityKind,
    pub columns: &'static [&'static str],
    pub rows: Vec<EventRow<'a>>,
}

impl<'a> ScopedEvents<'a> {
    fn from_table<T>(kind: EntityKind, table: &'a [Stored<T>]) -> Self
    where
        T: TableRow + Interval + Sync,
    {
        let rows = table
            .iter()
            .map(|row| EventRow {
                id: &row.id,
                subject: &row.subject,
                start: row.record.start(),
                end: row.record.end(),
                record: &row.record,
            })
            .collect();
        Self {
            kind,
            columns: T::COLUMNS,
            rows,
        }
    }

    /// Appends this table's columns to `schema`.
    pub fn schema(&self, schema: RowSchema) -> RowSchema {
        schema.record(self.kind, self.columns)
    }
}

/// Shared inputs for one evaluation run.
pub struct RuleContext<'a> {
    pub tables: &'a EntityTables,
    /// The "now" of every future-date rule.
    pub reference_date: NaiveDate,
    patients: BTreeMap<&'a SubjectKey, &'a Stored<Patient>>,
    conditions: BTreeMap<&'a SubjectKey, &'a Stored<Condition>>,
    times: BTreeMap<&'a SubjectKey, &'a Stored<TimeObservation>>,
    recurrences: BTreeMap<&'a SubjectKey, &'a Stored<RecurrenceObservation>>,
    survival: BTreeMap<EntityKind, BTreeMap<&'a SubjectKey, f64>>,
}

impl<'a> RuleContext<'a> {
    pub fn new(tables: &'a EntityTables, options: &RuleOptions) -> Self {
        let mut context = Self {
            tables,
            reference_date: options.reference_date,
            patients: first_by_subject(&tables.patients),
            conditions: first_by_subject(&tables.conditions),
            times: first_by_subject(&tables.time_observations),
            recurrences: first_by_subject(&tables.recurrences),
            survival: BTreeMap::new(),
        };
        for kind in Rule::EventAfterSurvival.scopes() {
            let events = context.events(*kind);
            let survival = survival_by_subject(&events.rows, &context.times, &context.conditions);
            context.survival.insert(*kind, survival);
        }
        context
    }

    /// Patients in source order.
    pub fn patients(&self) -> &'a [Stored<Patient>] {
        &self.tables.patients
    }

    pub fn patient(&self, subject: &SubjectKey) -> Option<&'a Stored<Patient>> {
        self.patients.get(subject).copied()
    }

    pub fn condition(&self, subject: &SubjectKey) -> Option<&'a Stored<Condition>> {
        self.conditions.get(subject).copied()
    }

    pub fn time_observation(&self, subject: &SubjectKey) -> Option<&'a Stored<TimeObservation>> {
        self.times.get(subject).copied()
    }

    pub fn recurrence(&self, subject: &SubjectKey) -> Option<&'a Stored<RecurrenceObservation>> {
        self.recurrences.get(subject).copied()
    }

    pub fn diagnosis_date(&self, subject: &SubjectKey) -> Option<NaiveDate> {
        self.condition(subject).and_then(|c| c.diagnosis_date)
    }

    /// Adjusted overall survival of `subject` for the events of `kind`.
    pub fn adjusted_survival(&self, kind: EntityKind, subject: &SubjectKey) -> Option<f64> {
        self.survival.get(&kind)?.get(subject).copied()
    }

    /// Dated events of `kind`; empty for kinds without a start date.
    pub fn events(&self, kind: EntityKind) -> ScopedEvents<'a> {
        let tables = self.tables;
        match kind {
            EntityKind::Surgery => ScopedEvents::from_table(kind, &tables.surgeries),
            EntityKind::RadiationTherapy => {
                ScopedEvents::from_table(kind, &tables.radiation_therapies)
            }
            EntityKind::TargetedTherapy => {
                ScopedEvents::from_table(kind, &tables.targeted_therapies)
            }
            EntityKind::Pharmacotherapy => ScopedEvents::from_table(kind, &tables.drug_exposures),
            EntityKind::Response => ScopedEvents::from_table(kind, &tables.responses),
            _ => ScopedEvents {
                kind,
                columns: &[],
                rows: Vec::new(),
            },
        }
    }

    /// Every stored entity of `kind` flattened to rows, with its schema.
    pub fn entity_rows(&self, kind: EntityKind) -> (RowSchema, Vec<Vec<Value>>) {
        let tables = self.tables;
        match kind {
            EntityKind::Patient => flatten(kind, &tables.patients),
            EntityKind::Condition => flatten(kind, &tables.conditions),
            EntityKind::Specimen => flatten(kind, &tables.specimens),
            EntityKind::Surgery => flatten(kind, &tables.surgeries),
            EntityKind::RadiationTherapy => flatten(kind, &tables.radiation_therapies),
            EntityKind::TargetedTherapy => flatten(kind, &tables.targeted_therapies),
            EntityKind::Pharmacotherapy => flatten(kind, &tables.drug_exposures),
            EntityKind::Response => flatten(kind, &tables.responses),
            EntityKind::TimeObservation => flatten(kind, &tables.time_observations),
            EntityKind::Recurrence => flatten(kind, &tables.recurrences),
            EntityKind::Tnm => flatten(kind, &tables.tnms),
            EntityKind::DiagnosticProcedure => flatten(kind, &tables.diagnostic_procedures),
        }
    }
}

fn flatten<T: TableRow>(kind: EntityKind, rows: &[Stored<T>]) -> (RowSchema, Vec<Vec<Value>>) {
    let schema = RowSchema::new().entity::<T>(kind);
    let rows = rows
        .iter()
        .map(|row| RowBuilder::new(&row.subject).entity(Some(row)).finish())
        .collect();
    (schema, rows)
}
