//! Transformations shared by extraction and rule evaluation.
//!
//! - **staging**: UICC stage decision tables for the 6th and 7th editions
//! - **datetime**: date parsing and `diagnosis + weeks` derivation

pub mod datetime;
pub mod staging;

pub use datetime::{days_between, derive_date, parse_date, parse_integer, weeks_between};
pub use staging::{Edition, StageOutcome, compute_stage, compute_tnm_stage};
