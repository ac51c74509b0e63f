//! Tests for the stage computer.

use proptest::prelude::*;

use crc_model::{Coding, Tnm};
use crc_transform::{StageOutcome, compute_stage, compute_tnm_stage};

const SEVENTH: &str = "443830009";
const SIXTH: &str = "444256004";

fn stage(edition: &str, t: &str, n: &str, m: &str) -> Option<&'static str> {
    compute_stage(edition, t, n, m).stage()
}

// --- documented examples ---

#[test]
fn seventh_t3_n0_m0_is_iia() {
    assert_eq!(stage("7th", "T3", "N0", "M0"), Some("IIA"));
    assert_eq!(stage(SEVENTH, "T3", "N0", "M0"), Some("IIA"));
}

#[test]
fn sixth_t4_n0_m0_is_iib() {
    assert_eq!(stage("6th", "T4", "N0", "M0"), Some("IIB"));
}

// --- sixth edition ---

#[test]
fn sixth_edition_table() {
    assert_eq!(stage(SIXTH, "Tis", "N0", "M0"), Some("0"));
    assert_eq!(stage(SIXTH, "T2", "N0", "M0"), Some("I"));
    assert_eq!(stage(SIXTH, "T1", "N1", "M0"), Some("IIIA"));
    assert_eq!(stage(SIXTH, "T4", "N1", "M0"), Some("IIIB"));
    assert_eq!(stage(SIXTH, "TX", "N2", "M0"), Some("IIIC"));
    assert_eq!(stage(SIXTH, "T3", "N2a", "M1"), Some("IV"));
}

#[test]
fn sixth_edition_rejects_seventh_edition_nodes() {
    assert_eq!(stage(SIXTH, "T3", "N2a", "M0"), None);
    assert_eq!(stage(SIXTH, "T3", "N0", "MX"), None);
}

// --- seventh edition ---

#[test]
fn seventh_edition_table() {
    assert_eq!(stage(SEVENTH, "T4a", "N0", "M0"), Some("IIB"));
    assert_eq!(stage(SEVENTH, "T4b", "N0", "M0"), Some("IIC"));
    assert_eq!(stage(SEVENTH, "T4", "N0", "M0"), Some("II"));
    assert_eq!(stage(SEVENTH, "T2", "N1b", "M0"), Some("IIIA"));
    assert_eq!(stage(SEVENTH, "T1", "N2a", "M0"), Some("IIIA"));
    assert_eq!(stage(SEVENTH, "T4a", "N1c", "M0"), Some("IIIB"));
    assert_eq!(stage(SEVENTH, "T2", "N2b", "M0"), Some("IIIB"));
    assert_eq!(stage(SEVENTH, "T4a", "N2a", "M0"), Some("IIIC"));
    assert_eq!(stage(SEVENTH, "T4b", "N2", "M0"), Some("IIIC"));
    assert_eq!(stage(SEVENTH, "T4", "N2", "M0"), Some("III"));
    assert_eq!(stage(SEVENTH, "T1", "N0", "M1a"), Some("IVA"));
    assert_eq!(stage(SEVENTH, "T1", "N0", "M1b"), Some("IVB"));
}

#[test]
fn unmatched_tuple_is_described() {
    let outcome = compute_stage(SEVENTH, "TX", "N0", "M0");
    match outcome {
        StageOutcome::Undetermined { reason } => {
            assert!(reason.contains("TX"));
            assert!(reason.contains("7th"));
        }
        StageOutcome::Computed(stage) => panic!("unexpected stage {stage}"),
    }
}

#[test]
fn unknown_edition_is_undetermined() {
    assert_eq!(stage("897275008", "T3", "N0", "M0"), None);
}

// --- TNM entity ---

#[test]
fn tnm_entity_with_missing_component_is_not_computed() {
    let mut tnm = Tnm {
        edition: Some(Coding::new(SEVENTH, "7th")),
        t: Some(Coding::new("T3", "T3")),
        n: Some(Coding::new("N0", "N0")),
        m: Some(Coding::new("M0", "M0")),
        ..Tnm::default()
    };
    assert_eq!(
        compute_tnm_stage(&tnm).and_then(|outcome| outcome.stage()),
        Some("IIA")
    );
    tnm.m = None;
    assert!(compute_tnm_stage(&tnm).is_none());
}

// --- properties ---

fn t_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Tis", "T1", "T2", "T3", "T4", "T4a", "T4b", "TX"])
}

fn n_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["N0", "N1", "N1a", "N1b", "N1c", "N2", "N2a", "N2b", "NX"])
}

fn m_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["M0", "M1", "M1a", "M1b", "MX"])
}

proptest! {
    #[test]
    fn stage_is_deterministic(
        edition in prop::sample::select(vec![SIXTH, SEVENTH, "6th", "7th", "other"]),
        t in t_code(),
        n in n_code(),
        m in m_code(),
    ) {
        prop_assert_eq!(compute_stage(edition, t, n, m), compute_stage(edition, t, n, m));
    }

    #[test]
    fn metastasis_short_circuits_in_seventh(t in t_code(), n in n_code()) {
        prop_assert_eq!(stage(SEVENTH, t, n, "M1"), Some("IV"));
        prop_assert_eq!(stage(SEVENTH, t, n, "M1a"), Some("IVA"));
        prop_assert_eq!(stage(SEVENTH, t, n, "MX"), None);
    }
}
