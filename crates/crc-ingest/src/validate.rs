//! Structural pre-check of a registry export.
//!
//! Checks run in document order and the first failure wins. Composite
//! elements (`Mdr`, `BHPatient`, `Location`) must match their child list
//! exactly; forms are checked as ordered subsequences of their layout, so
//! optional data elements may be absent.

use thiserror::Error;

use crc_model::RegistryError;

use crate::event::EventKind;
use crate::layout::{FieldSpec, FormLayout, PATIENT_FORMS};
use crate::qname::{
    BASIC_DATA, BH_IMPORT, BH_PATIENT, EVENT, EVENTS, FORM, IDENTIFIER, LOCATION, LOCATIONS,
    LONGITUDINAL_DATA, MDR, NAMESPACE, QName, URL,
};
use crate::xml::XmlElement;

/// Diagnostic returned when an export fails the structural pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StructuralError {
    pub message: String,
}

impl StructuralError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<StructuralError> for RegistryError {
    fn from(error: StructuralError) -> Self {
        RegistryError::Structural(error.message)
    }
}

type Check = Result<(), StructuralError>;

fn ensure(condition: bool, message: &str) -> Check {
    if condition {
        Ok(())
    } else {
        Err(StructuralError::new(message))
    }
}

/// Children match `expected` exactly, in order.
fn exact_children(element: &XmlElement, expected: &[QName<'_>]) -> bool {
    element.children.len() == expected.len()
        && element
            .children
            .iter()
            .zip(expected)
            .all(|(child, name)| child.is(*name))
}

/// Every child is a layout field, and fields appear in layout order.
fn follows_layout(form: &XmlElement, fields: &[FieldSpec]) -> bool {
    let mut position = 0;
    for child in &form.children {
        let Some(offset) = fields[position..]
            .iter()
            .position(|spec| child.is(QName::registry(spec.element)))
        else {
            return false;
        };
        position += offset + 1;
    }
    true
}

/// Every child carries the label its layout field expects.
fn labels_match(form: &XmlElement, layout: &FormLayout) -> bool {
    form.children.iter().all(|child| {
        layout
            .fields
            .iter()
            .find(|spec| child.is(QName::registry(spec.element)))
            .is_some_and(|spec| child.attr("name") == Some(spec.label))
    })
}

fn check_patient_form(location: &XmlElement) -> Check {
    let form = location
        .descend(&[BASIC_DATA, FORM])
        .ok_or_else(|| StructuralError::new("Error: Missing patient form"))?;
    let name = form
        .attr("name")
        .ok_or_else(|| StructuralError::new("Error: Missing form name"))?;
    ensure(
        name == PATIENT_FORMS[0].form_name,
        "Error: Wrong form name",
    )?;
    let layout = PATIENT_FORMS
        .iter()
        .find(|layout| follows_layout(form, layout.fields))
        .ok_or_else(|| {
            StructuralError::new("Elements in patient Form do not have correct order")
        })?;
    ensure(
        labels_match(form, layout),
        "Elements in patient Form do not have correct tag name.",
    )
}

fn check_event(event: &XmlElement) -> Check {
    ensure(event.attr("name").is_some(), "Error: Missing event name")?;
    let eventtype = event
        .attr("eventtype")
        .ok_or_else(|| StructuralError::new("Error: Missing eventtype"))?;
    let data = event
        .child(LONGITUDINAL_DATA)
        .ok_or_else(|| StructuralError::new("Error: Missing LogitudinalData."))?;
    let Some(kind) = EventKind::from_eventtype(eventtype) else {
        tracing::debug!(eventtype, "skipping structure check of unknown event type");
        return Ok(());
    };
    let layout = kind.layout();
    let form = data
        .child(QName::registry(layout.form_element))
        .ok_or_else(|| StructuralError::new(format!("Error: Missing {kind} form")))?;
    ensure(
        form.attr("name") == Some(layout.form_name),
        "Error: Wrong event name.",
    )?;
    if !follows_layout(form, layout.fields) {
        return Err(StructuralError::new(format!(
            "Incorrect order of nested elements in {kind} element"
        )));
    }
    if !labels_match(form, layout) {
        return Err(StructuralError::new(format!(
            "Incorrect tag name in {kind} element"
        )));
    }
    Ok(())
}

fn check_location(location: &XmlElement) -> Check {
    ensure(
        exact_children(location, &[BASIC_DATA, EVENTS]),
        "Elements in location element are out of order",
    )?;
    check_patient_form(location)?;
    if let Some(events) = location.child(EVENTS) {
        for event in events.children_named(EVENT) {
            check_event(event)?;
        }
    }
    Ok(())
}

/// Validates an export tree, returning the first structural problem.
pub fn validate_document(root: &XmlElement) -> Check {
    if !root.is(BH_IMPORT) {
        return Err(StructuralError::new(format!(
            "Error: Root element should be '{BH_IMPORT}'"
        )));
    }
    for mdr in root.children_named(MDR) {
        ensure(
            exact_children(mdr, &[URL, NAMESPACE]),
            "Elements in Mdr element in wrong order.",
        )?;
    }
    let patients: Vec<&XmlElement> = root.children_named(BH_PATIENT).collect();
    for patient in &patients {
        ensure(
            exact_children(patient, &[IDENTIFIER, LOCATIONS]),
            "Elements in BHPatient element in wrong order.",
        )?;
    }
    for patient in patients {
        let Some(locations) = patient.child(LOCATIONS) else {
            continue;
        };
        for location in locations.children_named(LOCATION) {
            check_location(location)?;
        }
    }
    Ok(())
}

/// `"valid"` or the first diagnostic.
pub fn validation_message(root: &XmlElement) -> String {
    match validate_document(root) {
        Ok(()) => "valid".to_string(),
        Err(error) => error.message,
    }
}
