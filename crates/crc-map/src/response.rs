use crc_model::Coding;

/// SNOMED code of a complete response ("Patient cured").
pub const COMPLETE_RESPONSE: &str = "371001000";

const RESPONSES: &[(&str, &str, &str)] = &[
    (
        "Specific response - Complete response",
        COMPLETE_RESPONSE,
        "Patient cured (finding)",
    ),
    (
        "Specific response - Partial response",
        "268910001",
        "Patient's condition improved (finding)",
    ),
    (
        "Specific response - Stable disease",
        "359746009",
        "Patient's condition stable (finding)",
    ),
    (
        "Specific response - Progressive disease",
        "271299001",
        "Patient's condition worsened (finding)",
    ),
];

/// Response to therapy, matched on substring.
pub fn response(source: &str) -> Option<Coding> {
    RESPONSES
        .iter()
        .find(|(message, _, _)| source.contains(message))
        .map(|(_, code, display)| Coding::new(*code, *display))
}

pub fn is_complete_response(coding: &Coding) -> bool {
    coding.code == COMPLETE_RESPONSE
}
