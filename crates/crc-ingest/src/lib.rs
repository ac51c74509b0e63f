//! Registry export ingestion.
//!
//! - **xml**: owned element tree over `quick-xml`
//! - **qname**: the registry namespace and qualified element names
//! - **layout**: form layouts and data element ids
//! - **validate**: structural pre-check
//! - **event**: tagged union of registry events
//! - **extract**: record bundles per patient

pub mod event;
pub mod extract;
pub mod layout;
pub mod qname;
pub mod validate;
pub mod xml;

pub use event::{EventKind, RegistryEvent};
pub use extract::{extract_document, extract_patient, load_bundles, load_bundles_from_path};
pub use qname::{QName, REGISTRY_NS};
pub use validate::{StructuralError, validate_document, validation_message};
pub use xml::{XmlDocument, XmlElement};
