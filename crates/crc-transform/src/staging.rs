//! UICC stage computation from TNM components.
//!
//! Two decision tables, one per staging edition. Distant metastasis is
//! checked first; under `M0` the (T, N) pair is matched against the
//! edition's rules in priority order. Combinations the table does not
//! cover are reported as undetermined, never guessed.

use std::fmt;

use crc_map::{EDITION_6TH, EDITION_7TH};
use crc_model::Tnm;

/// Staging editions with a decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edition {
    Sixth,
    Seventh,
}

impl Edition {
    /// Accepts the staging edition code or a `6th`/`7th` label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            EDITION_6TH | "6th" => Some(Self::Sixth),
            EDITION_7TH | "7th" => Some(Self::Seventh),
            _ => None,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Sixth => EDITION_6TH,
            Self::Seventh => EDITION_7TH,
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sixth => "6th",
            Self::Seventh => "7th",
        })
    }
}

/// Result of a stage computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Computed(&'static str),
    Undetermined { reason: String },
}

impl StageOutcome {
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::Computed(stage) => Some(stage),
            Self::Undetermined { .. } => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

fn undetermined(edition: &str, t: &str, n: &str, m: &str) -> StageOutcome {
    StageOutcome::Undetermined {
        reason: format!("no stage for edition {edition} with ({t}, {n}, {m})"),
    }
}

const N1_FAMILY: &[&str] = &["N1", "N1a", "N1b", "N1c"];
const N_POSITIVE: &[&str] = &["N1", "N1a", "N1b", "N1c", "N2", "N2a", "N2b"];

fn sixth(t: &str, n: &str, m: &str) -> Option<&'static str> {
    match m {
        "M1" => return Some("IV"),
        "M0" => {}
        _ => return None,
    }
    let stage = match (t, n) {
        ("Tis", "N0") => "0",
        ("T1" | "T2", "N0") => "I",
        ("T3", "N0") => "IIA",
        ("T4", "N0") => "IIB",
        ("T1" | "T2", "N1") => "IIIA",
        ("T3" | "T4", "N1") => "IIIB",
        (_, "N2") => "IIIC",
        _ => return None,
    };
    Some(stage)
}

fn seventh(t: &str, n: &str, m: &str) -> Option<&'static str> {
    match m {
        "M1" => return Some("IV"),
        "M1a" => return Some("IVA"),
        "M1b" => return Some("IVB"),
        "M0" => {}
        _ => return None,
    }
    let n1 = N1_FAMILY.contains(&n);
    let stage = match t {
        "Tis" if n == "N0" => "0",
        "T1" | "T2" if n == "N0" => "I",
        "T3" if n == "N0" => "IIA",
        "T4a" if n == "N0" => "IIB",
        "T4b" if n == "N0" => "IIC",
        "T4" if n == "N0" => "II",
        "T1" | "T2" if n1 => "IIIA",
        "T1" if n == "N2a" => "IIIA",
        "T3" | "T4a" if n1 => "IIIB",
        "T2" | "T3" if n == "N2a" => "IIIB",
        "T1" | "T2" if n == "N2b" => "IIIB",
        "T4a" if n == "N2a" => "IIIC",
        "T3" | "T4a" if n == "N2b" => "IIIC",
        "T4b" if N_POSITIVE.contains(&n) => "IIIC",
        _ if N_POSITIVE.contains(&n) => "III",
        _ => return None,
    };
    Some(stage)
}

/// Computes the UICC stage for an edition (code or label) and TNM codes.
pub fn compute_stage(edition: &str, t: &str, n: &str, m: &str) -> StageOutcome {
    let Some(parsed) = Edition::parse(edition) else {
        return StageOutcome::Undetermined {
            reason: format!("unsupported staging edition {edition}"),
        };
    };
    let stage = match parsed {
        Edition::Sixth => sixth(t, n, m),
        Edition::Seventh => seventh(t, n, m),
    };
    match stage {
        Some(stage) => StageOutcome::Computed(stage),
        None => undetermined(&parsed.to_string(), t, n, m),
    }
}

/// Stage for a TNM entity, or `None` when a component is missing.
pub fn compute_tnm_stage(tnm: &Tnm) -> Option<StageOutcome> {
    let edition = tnm.edition.as_ref()?;
    let t = tnm.t.as_ref()?;
    let n = tnm.n.as_ref()?;
    let m = tnm.m.as_ref()?;
    let outcome = compute_stage(&edition.code, &t.code, &n.code, &m.code);
    if let StageOutcome::Undetermined { reason } = &outcome {
        tracing::debug!(reason = %reason, "stage undetermined");
    }
    Some(outcome)
}
