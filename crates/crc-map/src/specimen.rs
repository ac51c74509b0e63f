use crc_model::Coding;

const FROZEN_AND_FFPE: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Tumor",
        "tumor-tissue-frozen",
        "Tumor tissue (frozen)",
        "tumor-tissue-ffpe",
        "Tumor tissue (FFPE)",
    ),
    (
        "Healthy colon tissue",
        "normal-tissue-frozen",
        "Normal tissue (frozen)",
        "normal-tissue-ffpe",
        "Normal tissue (FFPE)",
    ),
    (
        "Other",
        "other-tissue-frozen",
        "Other tissue (frozen)",
        "other-tissue-ffpe",
        "Other tissue (FFPE)",
    ),
];

/// Specimen type from material and preservation mode.
///
/// Any known material stored with preservation `Other` falls into the
/// shared `tissue-other` bucket.
pub fn specimen_kind(material: &str, preservation: &str) -> Option<Coding> {
    let (_, frozen_code, frozen_display, ffpe_code, ffpe_display) = FROZEN_AND_FFPE
        .iter()
        .find(|(known, ..)| *known == material.trim())?;
    match preservation.trim() {
        "Cryopreservation" => Some(Coding::new(*frozen_code, *frozen_display)),
        "FFPE" => Some(Coding::new(*ffpe_code, *ffpe_display)),
        "Other" => Some(Coding::new("tissue-other", "Other tissue storage")),
        _ => None,
    }
}

/// Whether a specimen type display denotes FFPE preservation.
pub fn is_ffpe(display: &str) -> bool {
    display.ends_with("(FFPE)")
}
