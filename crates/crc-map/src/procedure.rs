//! Surgery type, radicality, surgery plausibility, and diagnostic procedures.

use std::fmt;

use crc_model::Coding;

/// SNOMED "Unknown (qualifier value)".
pub const UNKNOWN_QUALIFIER: &str = "261665006";
const UNKNOWN_QUALIFIER_DISPLAY: &str = "Unknown (qualifier value)";

const UNMAPPABLE_NOTE: &str = "Possible surgery type: Endo-rectal tumor resection, Low anteroir colon resection, Pan-procto colectomy. Mapping unavailable.";

/// Surgery types offered by the registry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurgeryType {
    AbdominoPerinealResection,
    AnteriorResectionOfRectum,
    EndoRectalTumorResection,
    LeftHemicolectomy,
    LowAnteriorColonResection,
    PanProctoColectomy,
    RightHemicolectomy,
    SigmoidColectomy,
    TotalColectomy,
    TransverseColectomy,
}

impl SurgeryType {
    pub const fn all() -> &'static [Self] {
        &[
            Self::AbdominoPerinealResection,
            Self::AnteriorResectionOfRectum,
            Self::EndoRectalTumorResection,
            Self::LeftHemicolectomy,
            Self::LowAnteriorColonResection,
            Self::PanProctoColectomy,
            Self::RightHemicolectomy,
            Self::SigmoidColectomy,
            Self::TotalColectomy,
            Self::TransverseColectomy,
        ]
    }

    /// Label exactly as the registry exports it, typos included.
    pub const fn source_label(&self) -> &'static str {
        match self {
            Self::AbdominoPerinealResection => "Abdomino-perineal resection",
            Self::AnteriorResectionOfRectum => "Anterior resection of rectum",
            Self::EndoRectalTumorResection => "Endo-rectal tumor resection",
            Self::LeftHemicolectomy => "Left hemicolectomy",
            Self::LowAnteriorColonResection => "Low anteroir colon resection",
            Self::PanProctoColectomy => "Pan-procto colectomy",
            Self::RightHemicolectomy => "Right hemicolectomy",
            Self::SigmoidColectomy => "Sigmoid colectomy",
            Self::TotalColectomy => "Total colectomy",
            Self::TransverseColectomy => "Transverse colectomy",
        }
    }

    /// SNOMED procedure, or `None` for types without a target code.
    pub const fn snomed(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::AbdominoPerinealResection => {
                Some(("265414003", "Abdominoperineal resection of rectum"))
            }
            Self::AnteriorResectionOfRectum => Some(("4558008", "Anterior resection of rectum")),
            Self::LeftHemicolectomy => Some(("315324009", "Left hemicolectomy with anastomosis")),
            Self::RightHemicolectomy => Some(("235326000", "Right hemicolectomy")),
            Self::SigmoidColectomy => Some(("84604002", "Sigmoid colectomy")),
            Self::TotalColectomy => Some(("26390003", "Total colectomy")),
            Self::TransverseColectomy => Some(("26925005", "Transverse colectomy")),
            Self::EndoRectalTumorResection
            | Self::LowAnteriorColonResection
            | Self::PanProctoColectomy => None,
        }
    }

    pub fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.source_label() == source)
    }
}

impl fmt::Display for SurgeryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_label())
    }
}

fn unknown_qualifier() -> Coding {
    Coding::new(UNKNOWN_QUALIFIER, UNKNOWN_QUALIFIER_DISPLAY)
}

/// Pure lookup of a surgery type label.
///
/// Known types without a SNOMED code resolve to the unknown qualifier;
/// strings that are not surgery types resolve to `None`.
pub fn surgery_type_code(source: &str) -> Option<Coding> {
    let kind = SurgeryType::parse(source)?;
    Some(
        kind.snomed()
            .map_or_else(unknown_qualifier, |(code, display)| Coding::new(code, display)),
    )
}

/// Coded surgery type plus the free-text note attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurgeryTypeMapping {
    pub coding: Option<Coding>,
    pub note: Option<String>,
}

/// Maps the primary surgery type, consulting the "other surgery type" field
/// for the note.
pub fn surgery_type(primary: Option<&str>, other: Option<&str>) -> SurgeryTypeMapping {
    let other_note = match other {
        Some(other) => format!("Other surgery type: {other}"),
        None => "Other surgery type not found.".to_string(),
    };
    let Some(primary) = primary else {
        return SurgeryTypeMapping {
            coding: None,
            note: Some(other_note),
        };
    };
    match SurgeryType::parse(primary) {
        Some(kind) => match kind.snomed() {
            Some((code, display)) => SurgeryTypeMapping {
                coding: Some(Coding::new(code, display)),
                note: Some(other_note),
            },
            None => SurgeryTypeMapping {
                coding: Some(unknown_qualifier()),
                note: Some(UNMAPPABLE_NOTE.to_string()),
            },
        },
        None => {
            tracing::warn!(surgery_type = primary, "unmapped surgery type");
            SurgeryTypeMapping {
                coding: Some(unknown_qualifier()),
                note: Some(other_note),
            }
        }
    }
}

pub fn radicality(source: &str) -> Option<Coding> {
    let (code, display) = match source.trim() {
        "R0" => ("258254000", "Residual tumor stage R0 (finding)"),
        "R1" => ("278271003", "Residual tumor stage R1 (finding)"),
        "R2" => ("278272005", "Residual tumor stage R2 (finding)"),
        _ => return None,
    };
    Some(Coding::new(code, display))
}

/// Plausibility of a surgery type for a tumor body site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurgeryCheck {
    Valid,
    Suspicious,
    Invalid,
}

impl SurgeryCheck {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Suspicious => "Suspicious",
            Self::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for SurgeryCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body-site display, accepted surgery types, tolerated surgery types.
const SITE_SURGERIES: &[(&str, &[SurgeryType], &[SurgeryType])] = &[
    (
        "Cecum structure",
        &[SurgeryType::RightHemicolectomy],
        &[SurgeryType::PanProctoColectomy, SurgeryType::TotalColectomy],
    ),
    (
        "Ascending colon structure",
        &[SurgeryType::RightHemicolectomy],
        &[SurgeryType::PanProctoColectomy, SurgeryType::TotalColectomy],
    ),
    (
        "Structure of right colic flexur",
        &[SurgeryType::RightHemicolectomy],
        &[
            SurgeryType::PanProctoColectomy,
            SurgeryType::TotalColectomy,
            SurgeryType::TransverseColectomy,
        ],
    ),
    (
        "Transverse colon structure",
        &[SurgeryType::RightHemicolectomy],
        &[SurgeryType::PanProctoColectomy, SurgeryType::LeftHemicolectomy],
    ),
    (
        "Structure of left colic flexure",
        &[SurgeryType::LeftHemicolectomy],
        &[
            SurgeryType::AbdominoPerinealResection,
            SurgeryType::PanProctoColectomy,
            SurgeryType::TotalColectomy,
            SurgeryType::SigmoidColectomy,
            SurgeryType::TransverseColectomy,
        ],
    ),
    (
        "Descending colon structure",
        &[SurgeryType::LeftHemicolectomy],
        &[
            SurgeryType::AbdominoPerinealResection,
            SurgeryType::PanProctoColectomy,
            SurgeryType::TotalColectomy,
            SurgeryType::SigmoidColectomy,
        ],
    ),
    (
        "Sigmoid colon structure",
        &[SurgeryType::SigmoidColectomy],
        &[
            SurgeryType::AbdominoPerinealResection,
            SurgeryType::PanProctoColectomy,
            SurgeryType::TotalColectomy,
            SurgeryType::LowAnteriorColonResection,
        ],
    ),
    (
        "Structure of rectosigmoid junction",
        &[
            SurgeryType::AnteriorResectionOfRectum,
            SurgeryType::EndoRectalTumorResection,
            SurgeryType::LowAnteriorColonResection,
            SurgeryType::SigmoidColectomy,
        ],
        &[
            SurgeryType::AbdominoPerinealResection,
            SurgeryType::PanProctoColectomy,
            SurgeryType::TotalColectomy,
            SurgeryType::LeftHemicolectomy,
        ],
    ),
    (
        "Rectum structure",
        &[
            SurgeryType::AnteriorResectionOfRectum,
            SurgeryType::EndoRectalTumorResection,
            SurgeryType::LowAnteriorColonResection,
            SurgeryType::AbdominoPerinealResection,
        ],
        &[SurgeryType::LeftHemicolectomy, SurgeryType::PanProctoColectomy, SurgeryType::TotalColectomy],
    ),
];

/// Classifies a surgery against the tumor body site.
///
/// Sites outside the table are `Invalid`.
pub fn classify_surgery(body_site_display: &str, surgery: SurgeryType) -> SurgeryCheck {
    let Some((_, valid, suspicious)) = SITE_SURGERIES
        .iter()
        .find(|(site, _, _)| *site == body_site_display)
    else {
        return SurgeryCheck::Invalid;
    };
    if valid.contains(&surgery) {
        SurgeryCheck::Valid
    } else if suspicious.contains(&surgery) {
        SurgeryCheck::Suspicious
    } else {
        SurgeryCheck::Invalid
    }
}

/// Diagnostic findings on the patient form: finding text, concept id, label.
const DIAGNOSTIC_FINDINGS: &[(&str, i64, &str)] = &[
    ("Liver imaging - Done", 4_085_576, "liver imaging"),
    ("CT - Done", 4_019_823, "CT"),
    ("Colonoscopy diagnostic exam - Positive", 4_249_893, "colonoscopy"),
    ("Lung imaging - Done", 4_082_968, "lung imaging"),
    ("MRI - Done", 4_013_636, "MRI"),
];

/// Concept id and label of a performed diagnostic procedure.
///
/// Returns `None` for "not done" and unrecognized findings.
pub fn diagnostic_procedure(source: &str) -> Option<(i64, &'static str)> {
    DIAGNOSTIC_FINDINGS
        .iter()
        .find(|(finding, _, _)| source.contains(finding))
        .map(|(_, concept_id, label)| (*concept_id, *label))
}
