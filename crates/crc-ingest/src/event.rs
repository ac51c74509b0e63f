//! Registry events decoded into a closed tagged union.
//!
//! The export lists every clinical event in one `Events` element and tells
//! them apart by the `eventtype` attribute. That attribute is read exactly
//! once, in [`EventKind::from_eventtype`]; downstream code matches on
//! [`RegistryEvent`].

use std::fmt;

use crate::layout::{
    self, FormLayout, HISTOPATHOLOGY_FORM, PHARMACOTHERAPY_FORM, RADIATION_FORM, RESPONSE_FORM,
    SAMPLE_FORM, SURGERY_FORM, TARGETED_FORM,
};
use crate::qname::{LONGITUDINAL_DATA, QName};
use crate::xml::XmlElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Surgery,
    Sample,
    Histopathology,
    Pharmacotherapy,
    Response,
    Radiation,
    Targeted,
}

impl EventKind {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Surgery,
            Self::Sample,
            Self::Histopathology,
            Self::Pharmacotherapy,
            Self::Response,
            Self::Radiation,
            Self::Targeted,
        ]
    }

    /// The `eventtype` attribute value for this kind.
    pub const fn eventtype(&self) -> &'static str {
        match self {
            Self::Surgery => "Surgery",
            Self::Sample => "Sample",
            Self::Histopathology => "Histopathology",
            Self::Pharmacotherapy => "Pharmacotherapy",
            Self::Response => "Response to therapy",
            Self::Radiation => "Radiation therapy",
            Self::Targeted => "Targeted Therapy",
        }
    }

    pub fn from_eventtype(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.eventtype() == value)
    }

    pub fn layout(&self) -> &'static FormLayout {
        match self {
            Self::Surgery => &SURGERY_FORM,
            Self::Sample => &SAMPLE_FORM,
            Self::Histopathology => &HISTOPATHOLOGY_FORM,
            Self::Pharmacotherapy => &PHARMACOTHERAPY_FORM,
            Self::Response => &RESPONSE_FORM,
            Self::Radiation => &RADIATION_FORM,
            Self::Targeted => &TARGETED_FORM,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.eventtype())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurgeryEvent {
    pub weeks: Option<String>,
    pub surgery_type: Option<String>,
    pub other_type: Option<String>,
    pub radicality: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleEvent {
    pub id: Option<String>,
    pub material: Option<String>,
    pub preservation: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistopathologyEvent {
    pub localization: Option<String>,
    pub uicc_version: Option<String>,
    pub primary_tumor: Option<String>,
    pub lymph_nodes: Option<String>,
    pub metastasis: Option<String>,
    pub stage: Option<String>,
    pub grade: Option<String>,
    pub morphology: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PharmacotherapyEvent {
    pub start_week: Option<String>,
    pub end_week: Option<String>,
    pub scheme: Option<String>,
    pub other_scheme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseEvent {
    pub response: Option<String>,
    pub weeks: Option<String>,
}

/// Radiation or targeted therapy weeks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TherapyEvent {
    pub start_week: Option<String>,
    pub end_week: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Surgery(SurgeryEvent),
    Sample(SampleEvent),
    Histopathology(HistopathologyEvent),
    Pharmacotherapy(PharmacotherapyEvent),
    Response(ResponseEvent),
    Radiation(TherapyEvent),
    Targeted(TherapyEvent),
    /// An `eventtype` outside the known set, or an event without one.
    Unknown { eventtype: Option<String> },
}

/// Field reader over an event's form element.
struct FormFields<'a> {
    form: Option<&'a XmlElement>,
}

impl FormFields<'_> {
    fn get(&self, element: &str) -> Option<String> {
        self.form
            .and_then(|form| form.child_text(QName::registry(element)))
            .map(str::to_string)
    }
}

impl RegistryEvent {
    /// Decodes one `Event` element. Missing nodes become `None`.
    pub fn decode(event: &XmlElement) -> Self {
        let eventtype = event.attr("eventtype");
        let Some(kind) = eventtype.and_then(EventKind::from_eventtype) else {
            return Self::Unknown {
                eventtype: eventtype.map(str::to_string),
            };
        };
        let fields = FormFields {
            form: event
                .child(LONGITUDINAL_DATA)
                .and_then(|data| data.child(QName::registry(kind.layout().form_element))),
        };
        match kind {
            EventKind::Surgery => Self::Surgery(SurgeryEvent {
                weeks: fields.get(layout::surgery::WEEKS),
                surgery_type: fields.get(layout::surgery::TYPE),
                other_type: fields.get(layout::surgery::OTHER_TYPE),
                radicality: fields.get(layout::surgery::RADICALITY),
                location: fields.get(layout::surgery::LOCATION),
            }),
            EventKind::Sample => Self::Sample(SampleEvent {
                id: fields.get(layout::sample::ID),
                material: fields.get(layout::sample::MATERIAL),
                preservation: fields.get(layout::sample::PRESERVATION),
                year: fields.get(layout::sample::YEAR),
            }),
            EventKind::Histopathology => Self::Histopathology(HistopathologyEvent {
                localization: fields.get(layout::histopathology::LOCALIZATION),
                uicc_version: fields.get(layout::histopathology::UICC_VERSION),
                primary_tumor: fields.get(layout::histopathology::PRIMARY_TUMOR),
                lymph_nodes: fields.get(layout::histopathology::LYMPH_NODES),
                metastasis: fields.get(layout::histopathology::METASTASIS),
                stage: fields.get(layout::histopathology::STAGE),
                grade: fields.get(layout::histopathology::GRADE),
                morphology: fields.get(layout::histopathology::MORPHOLOGY),
            }),
            EventKind::Pharmacotherapy => Self::Pharmacotherapy(PharmacotherapyEvent {
                start_week: fields.get(layout::pharmacotherapy::START_WEEK),
                end_week: fields.get(layout::pharmacotherapy::END_WEEK),
                scheme: fields.get(layout::pharmacotherapy::SCHEME),
                other_scheme: fields.get(layout::pharmacotherapy::OTHER_SCHEME),
            }),
            EventKind::Response => Self::Response(ResponseEvent {
                response: fields.get(layout::response::RESPONSE),
                weeks: fields.get(layout::response::WEEKS),
            }),
            EventKind::Radiation => Self::Radiation(TherapyEvent {
                start_week: fields.get(layout::radiation::START_WEEK),
                end_week: fields.get(layout::radiation::END_WEEK),
            }),
            EventKind::Targeted => Self::Targeted(TherapyEvent {
                start_week: fields.get(layout::targeted::START_WEEK),
                end_week: fields.get(layout::targeted::END_WEEK),
            }),
        }
    }

    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Surgery(_) => Some(EventKind::Surgery),
            Self::Sample(_) => Some(EventKind::Sample),
            Self::Histopathology(_) => Some(EventKind::Histopathology),
            Self::Pharmacotherapy(_) => Some(EventKind::Pharmacotherapy),
            Self::Response(_) => Some(EventKind::Response),
            Self::Radiation(_) => Some(EventKind::Radiation),
            Self::Targeted(_) => Some(EventKind::Targeted),
            Self::Unknown { .. } => None,
        }
    }
}
