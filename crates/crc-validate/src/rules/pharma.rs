//! Pharmacotherapy descriptions and durations.

use crc_map::UNMAPPED_DRUG;
use crc_model::{Condition, DrugExposure, EntityKind, Result};

use crate::catalog::Rule;
use crate::context::RuleContext;
use crate::frame::{RowBuilder, RowSchema};
use crate::outcome::{Evaluation, RuleOutcome};

/// Scheme descriptions that name no actual substance.
const SUSPICIOUS_SCHEMES: &[&str] = &[
    "No pharmacotherapy",
    "other",
    "unknown",
    "NULL",
    "neoadjuvante Radiochemo",
    "Substances: unbekannt",
];

/// Fragments left behind by a broken scheme description.
const SUSPICIOUS_FRAGMENTS: &[&str] = &["%-FU", "andLeucovorin"];

fn drug_schema() -> RowSchema {
    RowSchema::new().entity::<DrugExposure>(EntityKind::Pharmacotherapy)
}

pub(super) fn missing_drug_exposure_info(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut evaluation = Evaluation::new(drug_schema());
    for drug in &ctx.tables.drug_exposures {
        let verdict = drug.concept_id == UNMAPPED_DRUG && drug.source_value.is_none();
        evaluation.record(Some(verdict), || {
            RowBuilder::new(&drug.subject).entity(Some(drug)).finish()
        });
    }
    evaluation.finish(Rule::MissingDrugExposureInfo, None)
}

/// Warnings 10 and 12: exact matches against a list of suspicious sources.
pub(super) fn suspicious_pharma(ctx: &RuleContext<'_>, rule: Rule) -> Result<RuleOutcome> {
    let suspicious = if rule == Rule::SuspiciousPharmaOther {
        SUSPICIOUS_FRAGMENTS
    } else {
        SUSPICIOUS_SCHEMES
    };
    let mut evaluation = Evaluation::new(drug_schema());
    for drug in &ctx.tables.drug_exposures {
        let verdict = drug
            .source_value
            .as_deref()
            .map(|source| suspicious.contains(&source));
        evaluation.record(verdict, || {
            RowBuilder::new(&drug.subject).entity(Some(drug)).finish()
        });
    }
    evaluation.finish(rule, None)
}

pub(super) fn suspiciously_short_pharma(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = drug_schema().entity::<Condition>(EntityKind::Condition);
    let mut evaluation = Evaluation::new(schema);
    for drug in &ctx.tables.drug_exposures {
        let condition = ctx.condition(&drug.subject);
        let diagnosis = condition.and_then(|c| c.diagnosis_date);
        let verdict = match (drug.start, drug.end, diagnosis) {
            (Some(start), Some(end), Some(diagnosis)) => Some(start != diagnosis && end == start),
            _ => None,
        };
        evaluation.record(verdict, || {
            RowBuilder::new(&drug.subject)
                .entity(Some(drug))
                .entity(condition)
                .finish()
        });
    }
    evaluation.finish(Rule::SuspiciouslyShortPharma, None)
}
