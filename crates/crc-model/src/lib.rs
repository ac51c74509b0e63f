pub mod bundle;
pub mod coding;
pub mod entities;
pub mod error;
pub mod ids;
pub mod options;
pub mod tables;

pub use bundle::RecordBundle;
pub use coding::{Coding, ICD10_SYSTEM, SNOMED_SYSTEM};
pub use entities::{
    Condition, DiagnosticProcedure, DrugExposure, Interval, Patient, RecurrenceObservation,
    ResponseObservation, Specimen, Surgery, Therapy, TimeObservation, Tnm,
};
pub use error::{RegistryError, Result};
pub use ids::{EntityId, EntityKind, SubjectKey};
pub use options::{ExtractOptions, RuleOptions};
pub use tables::{EntityTables, Stored, first_by_subject, group_by_subject};
