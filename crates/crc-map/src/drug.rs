//! Pharmacotherapy scheme to drug concept id.

/// Concept id used when a scheme has no drug concept.
pub const UNMAPPED_DRUG: i64 = 0;

/// Longest scheme text kept as a source value.
pub const MAX_SOURCE_LEN: usize = 50;

const DRUGS: &[(&str, i64)] = &[
    ("5-FU", 40_042_274),
    ("Capecitabine", 40_095_743),
    ("Oxaliplatin", 35_603_923),
    ("UFT", 40_052_183),
    ("Other", UNMAPPED_DRUG),
];

/// Drug concept id for a scheme, matched on substring.
pub fn drug_concept_id(source: Option<&str>) -> i64 {
    let Some(source) = source else {
        return UNMAPPED_DRUG;
    };
    DRUGS
        .iter()
        .find(|(drug, _)| source.contains(drug))
        .map_or(UNMAPPED_DRUG, |(_, concept_id)| *concept_id)
}

/// Scheme text to record, falling back to the "other scheme" field when the
/// scheme is absent or `Other`.
pub fn scheme_source<'a>(scheme: Option<&'a str>, other: Option<&'a str>) -> Option<&'a str> {
    match scheme {
        Some(scheme) if scheme != "Other" => Some(scheme),
        _ => other,
    }
}

/// Source value as stored: overly long free text is dropped.
pub fn stored_source_value(source: Option<&str>) -> Option<String> {
    source
        .filter(|value| value.chars().count() <= MAX_SOURCE_LEN)
        .map(str::to_string)
}
