//! Coded values produced by the vocabulary maps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// SNOMED CT code system URI.
pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";

/// ICD-10 code system URI.
pub const ICD10_SYSTEM: &str = "http://hl7.org/fhir/sid/icd-10";

/// A (code, display) pair from a target vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coding {
    pub code: String,
    pub display: String,
}

impl Coding {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
        }
    }
}

impl fmt::Display for Coding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display, self.code)
    }
}

/// Code of an optional coding, for row tables and comparisons.
pub fn code_of(coding: Option<&Coding>) -> Option<&str> {
    coding.map(|c| c.code.as_str())
}

/// Display of an optional coding.
pub fn display_of(coding: Option<&Coding>) -> Option<&str> {
    coding.map(|c| c.display.as_str())
}
