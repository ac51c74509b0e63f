//! Localization, body site, morphology, grade, and staging edition.

use std::sync::LazyLock;

use regex::Regex;

use crc_model::Coding;

/// Staging edition code for the 6th AJCC/UICC edition.
pub const EDITION_6TH: &str = "444256004";
/// Staging edition code for the 7th AJCC/UICC edition.
pub const EDITION_7TH: &str = "443830009";

static ICD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"C\d{2}(?:\.\d)?").expect("Invalid ICD-10 token regex"));

const ICD10: &[(&str, &str)] = &[
    ("C18.0", "Malignant neoplasm of cecum"),
    ("C18.1", "Malignant neoplasm of appendix"),
    ("C18.2", "Malignant neoplasm of ascending colon"),
    ("C18.3", "Malignant neoplasm of hepatic flexure"),
    ("C18.4", "Malignant neoplasm of transverse colon"),
    ("C18.5", "Malignant neoplasm of splenic flexure"),
    ("C18.6", "Malignant neoplasm of descending colon"),
    ("C18.7", "Malignant neoplasm of sigmoid colon"),
    ("C18.8", "Malignant neoplasm of overlapping sites of colon"),
    ("C18.9", "Malignant neoplasm of colon, unspecified"),
    ("C19", "Malignant neoplasm of rectosigmoid junction"),
    ("C20", "Malignant neoplasm of rectum"),
];

/// ICD-10 token to SNOMED body site. `None` marks known sites without an
/// equivalent.
const BODY_SITES: &[(&str, Option<(&str, &str)>)] = &[
    ("C18.0", Some(("32713005", "Cecum structure"))),
    ("C18.1", None),
    ("C18.2", Some(("9040008", "Ascending colon structure"))),
    ("C18.3", Some(("48338005", "Structure of right colic flexur"))),
    ("C18.4", Some(("485005", "Transverse colon structure"))),
    ("C18.5", Some(("72592005", "Structure of left colic flexure"))),
    ("C18.6", Some(("32622004", "Descending colon structure"))),
    ("C18.7", Some(("60184004", "Sigmoid colon structure"))),
    ("C18.8", None),
    ("C18.9", None),
    ("C19", Some(("49832006", "Structure of rectosigmoid junction"))),
    ("C20", Some(("34402009", "Rectum structure"))),
];

const MORPHOLOGY: &[(&str, &str, &str)] = &[
    (
        "Adenocarcinoma",
        "1187332001",
        "Adenocarcinoma (morphologic abnormality)",
    ),
    (
        "Mucinous carcinoma",
        "72495009",
        "Mucinous adenocarcinoma (morphologic abnormality)",
    ),
    (
        "Signet-ring cell carcinoma",
        "87737001",
        "Signet ring cell carcinoma (morphologic abnormality)",
    ),
    (
        "Medullary carcinoma",
        "32913002",
        "Medullary carcinoma (morphologic abnormality)",
    ),
    ("Other", "0", "Other"),
];

const GRADES: &[(&str, &str, &str)] = &[
    ("GX", "12619005", "GX grade (finding)"),
    ("G1", "54102005", "G1 grade (finding)"),
    ("G2", "1663004", "G2 grade (finding)"),
    ("G3", "61026006", "G3 grade (finding)"),
];

const EDITIONS: &[(&str, &str, &str)] = &[
    (
        "6th",
        EDITION_6TH,
        "American Joint Commission on Cancer, Cancer Staging Manual, 6th edition neoplasm staging system (tumor staging)",
    ),
    (
        "7th",
        EDITION_7TH,
        "American Joint Commission on Cancer, Cancer Staging Manual, 7th edition neoplasm staging system (tumor staging)",
    ),
    (
        "8th",
        "897275008",
        "American Joint Commission on Cancer, Cancer Staging Manual, 8th edition neoplasm staging system (tumor staging)",
    ),
    (
        "9th",
        "1269566009",
        "American Joint Commission on Cancer, Cancer Staging Manual, 9th version neoplasm staging system (tumor staging)",
    ),
];

/// First table entry whose key occurs in `source`.
fn find_substring(table: &[(&str, &str, &str)], source: &str) -> Option<Coding> {
    table
        .iter()
        .find(|(key, _, _)| source.contains(key))
        .map(|(_, code, display)| Coding::new(*code, *display))
}

/// Trailing ICD-10 code embedded in a localization description.
pub fn icd_token(localization: &str) -> Option<&str> {
    ICD_TOKEN
        .find_iter(localization)
        .last()
        .map(|token| token.as_str())
}

/// ICD-10 condition code for a localization description.
pub fn condition_code(localization: &str) -> Option<Coding> {
    let token = icd_token(localization)?;
    ICD10
        .iter()
        .find(|(code, _)| *code == token)
        .map(|(code, display)| Coding::new(*code, *display))
}

/// SNOMED body site for a localization description.
pub fn body_site(localization: &str) -> Option<Coding> {
    let token = icd_token(localization)?;
    BODY_SITES
        .iter()
        .find(|(code, _)| *code == token)
        .and_then(|(_, site)| *site)
        .map(|(code, display)| Coding::new(code, display))
}

pub fn morphology(source: &str) -> Option<Coding> {
    find_substring(MORPHOLOGY, source)
}

pub fn grade(source: &str) -> Option<Coding> {
    find_substring(GRADES, source)
}

/// Staging edition, matched on `6th`/`7th`/`8th`/`9th` inside the source.
pub fn staging_edition(source: &str) -> Option<Coding> {
    find_substring(EDITIONS, source)
}
