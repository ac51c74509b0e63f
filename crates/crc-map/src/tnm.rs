//! Primary tumor, lymph node, metastasis, and stage values.
//!
//! Histopathology exports embed the classification code after a `-`
//! separator, e.g. `"Primary Tumor - T3"`. The token is isolated with
//! [`code_token`] before lookup.

use crc_model::Coding;

const T_CODES: &[&str] = &[
    "TX", "T0", "Ta", "Tis", "Tis(LAMN)", "Tis(DCIS)", "Tis(LCIS)", "Tis(Paget)", "Tis(pu)",
    "Tis(pd)", "T1", "T1mi", "T1a", "T1a1", "T1a2", "T1b", "T1b1", "T1b2", "T1c", "T1c1", "T1c2",
    "T1c3", "T1d", "T2", "T2a", "T2a1", "T2a2", "T2b", "T2c", "T2d", "T3", "T3a", "T3b", "T3c",
    "T3d", "T3e", "T4", "T4a", "T4b", "T4c", "T4d", "T4e",
];

const N_CODES: &[&str] = &[
    "N0", "N1", "N1(mi)", "N1a", "N1b", "N1c", "N2", "N2a", "N2b", "N2c", "N3", "N3a", "N3b",
    "N3c",
];

const M_CODES: &[&str] = &["M0", "M1", "M1a", "M1b", "M1c", "M1d", "MX"];

const STAGE_CODES: &[&str] = &[
    "X", "0", "0a", "0is", "I", "IA1", "IA2", "IA3", "IB", "IB1", "IB2", "IC", "IS", "II", "IIA",
    "IIA1", "IIA2", "IIB", "IIC", "III", "IIIA", "IIIA1", "IIIA2", "IIIB", "IIIC", "IIIC1",
    "IIIC2", "IV", "IVA", "IVB", "IVC",
];

/// Text between the first and second `-`, trimmed.
pub fn code_token(source: &str) -> Option<&str> {
    let token = source.split('-').nth(1)?.trim();
    (!token.is_empty()).then_some(token)
}

fn lookup(codes: &[&str], token: &str) -> Option<Coding> {
    codes
        .iter()
        .find(|code| **code == token)
        .map(|code| Coding::new(*code, *code))
}

/// Primary tumor (pT).
pub fn map_t(source: &str) -> Option<Coding> {
    lookup(T_CODES, code_token(source)?)
}

/// Regional lymph nodes (pN).
pub fn map_n(source: &str) -> Option<Coding> {
    let token = code_token(source)?;
    match token {
        "NX" | "Nx" => Some(Coding::new("NX", "Nx")),
        "N1(mi)" => Some(Coding::new("N1(mi)", "N1mi")),
        _ => lookup(N_CODES, token),
    }
}

/// Distant metastasis (pM).
pub fn map_m(source: &str) -> Option<Coding> {
    lookup(M_CODES, code_token(source)?)
}

/// Recorded UICC stage. Display is `Stage <code>`.
pub fn map_stage(source: &str) -> Option<Coding> {
    let token = code_token(source)?;
    if token.contains("II A") {
        return Some(Coding::new("IIA", "Stage IIA"));
    }
    STAGE_CODES
        .iter()
        .find(|code| **code == token)
        .map(|code| Coding::new(*code, format!("Stage {code}")))
}

/// Stage codes that denote distant metastasis.
pub fn is_stage_four(code: &str) -> bool {
    matches!(code, "IV" | "IVA" | "IVB")
}
