//! Tests for the owned XML tree.

use std::io::Write;

use crc_ingest::qname::{BH_PATIENT, IDENTIFIER, MDR, URL};
use crc_ingest::{QName, REGISTRY_NS, XmlDocument};
use crc_model::RegistryError;

#[test]
fn elements_resolve_the_default_namespace() {
    let xml = format!(
        r#"<BHImport xmlns="{REGISTRY_NS}"><Mdr><URL> https://mdr </URL></Mdr></BHImport>"#
    );
    let document = XmlDocument::parse(&xml).unwrap();
    assert_eq!(document.root.namespace.as_deref(), Some(REGISTRY_NS));
    let mdr = document.root.child(MDR).unwrap();
    assert_eq!(mdr.child_text(URL), Some("https://mdr"));
}

#[test]
fn prefixed_namespace_matches_the_same_names() {
    let xml = format!(
        r#"<r:BHImport xmlns:r="{REGISTRY_NS}"><r:BHPatient><r:Identifier>P1</r:Identifier></r:BHPatient></r:BHImport>"#
    );
    let document = XmlDocument::parse(&xml).unwrap();
    let patient = document.root.child(BH_PATIENT).unwrap();
    assert_eq!(patient.child_text(IDENTIFIER), Some("P1"));
}

#[test]
fn unqualified_names_do_not_match_registry_names() {
    let document = XmlDocument::parse("<BHImport><Mdr/></BHImport>").unwrap();
    assert!(document.root.namespace.is_none());
    assert!(document.root.child(MDR).is_none());
    assert_eq!(document.root.child_locals(), vec!["Mdr"]);
}

#[test]
fn attributes_and_entities_are_decoded() {
    let xml = format!(
        r#"<Form xmlns="{REGISTRY_NS}" name="a &amp; b"><Dataelement_1_1>x &lt; y&#33;</Dataelement_1_1></Form>"#
    );
    let document = XmlDocument::parse(&xml).unwrap();
    assert_eq!(document.root.attr("name"), Some("a & b"));
    assert_eq!(
        document.root.child_text(QName::registry("Dataelement_1_1")),
        Some("x < y!")
    );
}

#[test]
fn whitespace_only_text_is_absent() {
    let xml = format!(r#"<A xmlns="{REGISTRY_NS}"><B>   </B></A>"#);
    let document = XmlDocument::parse(&xml).unwrap();
    assert_eq!(document.root.child_text(QName::registry("B")), None);
}

#[test]
fn malformed_document_is_an_xml_error() {
    let error = XmlDocument::parse("<A><B></A>").unwrap_err();
    assert!(matches!(error, RegistryError::Xml { .. }));
    assert!(!error.is_structural());
}

#[test]
fn unterminated_document_is_an_xml_error() {
    let error = XmlDocument::parse("<A><B>").unwrap_err();
    assert!(matches!(error, RegistryError::Xml { .. }));
}

#[test]
fn read_loads_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"<BHImport xmlns="{REGISTRY_NS}"/>"#).unwrap();
    let document = XmlDocument::read(file.path()).unwrap();
    assert_eq!(document.root.local, "BHImport");
    assert!(document.root.children.is_empty());
}

#[test]
fn read_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let error = XmlDocument::read(&dir.path().join("missing.xml")).unwrap_err();
    assert!(matches!(error, RegistryError::Io(_)));
}
