//! Qualified element names.
//!
//! Every element lookup in the validator and extractor goes through
//! [`QName`], so the registry namespace is written down exactly once.

use std::fmt;

/// Namespace URI of the registry import schema.
pub const REGISTRY_NS: &str = "http://registry.samply.de/schemata/import_v1";

/// Namespace URI plus local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub namespace: &'a str,
    pub local: &'a str,
}

impl<'a> QName<'a> {
    /// Name in the registry namespace.
    pub const fn registry(local: &'a str) -> Self {
        Self {
            namespace: REGISTRY_NS,
            local,
        }
    }

    pub fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        namespace == Some(self.namespace) && local == self.local
    }
}

impl fmt::Display for QName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local)
    }
}

pub const BH_IMPORT: QName<'static> = QName::registry("BHImport");
pub const MDR: QName<'static> = QName::registry("Mdr");
pub const URL: QName<'static> = QName::registry("URL");
pub const NAMESPACE: QName<'static> = QName::registry("Namespace");
pub const BH_PATIENT: QName<'static> = QName::registry("BHPatient");
pub const IDENTIFIER: QName<'static> = QName::registry("Identifier");
pub const LOCATIONS: QName<'static> = QName::registry("Locations");
pub const LOCATION: QName<'static> = QName::registry("Location");
pub const BASIC_DATA: QName<'static> = QName::registry("BasicData");
pub const EVENTS: QName<'static> = QName::registry("Events");
pub const EVENT: QName<'static> = QName::registry("Event");
pub const LONGITUDINAL_DATA: QName<'static> = QName::registry("LogitudinalData");
pub const FORM: QName<'static> = QName::registry("Form");
