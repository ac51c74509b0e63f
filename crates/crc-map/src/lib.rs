//! Finite vocabulary maps from registry export values to coded values.
//!
//! Every lookup is total: unmapped input yields `None` (or the documented
//! fallback code), never a panic.

pub mod drug;
pub mod histology;
pub mod procedure;
pub mod response;
pub mod specimen;
pub mod tnm;

pub use drug::{UNMAPPED_DRUG, drug_concept_id, scheme_source, stored_source_value};
pub use histology::{
    EDITION_6TH, EDITION_7TH, body_site, condition_code, grade, icd_token, morphology,
    staging_edition,
};
pub use procedure::{
    SurgeryCheck, SurgeryType, SurgeryTypeMapping, UNKNOWN_QUALIFIER, classify_surgery,
    diagnostic_procedure, radicality, surgery_type, surgery_type_code,
};
pub use response::{COMPLETE_RESPONSE, is_complete_response, response};
pub use specimen::{is_ffpe, specimen_kind};
pub use tnm::{code_token, is_stage_four, map_m, map_n, map_stage, map_t};
