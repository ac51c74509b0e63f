//! Surgery location and type.

use crc_map::{SurgeryCheck, SurgeryType, body_site, classify_surgery, icd_token};
use crc_model::{Condition, EntityKind, Result, Stored, Surgery, group_by_subject};

use crate::catalog::Rule;
use crate::context::RuleContext;
use crate::frame::{RowBuilder, RowSchema};
use crate::outcome::{Evaluation, RuleOutcome};

/// Whether the histological location disagrees with the surgery body site.
///
/// A localization whose ICD-10 token has no body-site equivalent never
/// matches; an absent localization or surgery site leaves it undecided.
fn location_differs(condition: Option<&Stored<Condition>>, surgery: &Surgery) -> Option<bool> {
    let localization = condition?.localization.as_deref()?;
    icd_token(localization)?;
    let surgery_site = surgery.body_site.as_ref()?;
    Some(body_site(localization).is_none_or(|site| site.code != surgery_site.code))
}

/// Warnings 13 and 14; 13 covers patients with exactly one surgery, 14 every
/// surgery of patients with several.
pub(super) fn location_mismatch(ctx: &RuleContext<'_>, rule: Rule) -> Result<RuleOutcome> {
    let multiple = rule == Rule::LocationMismatchMultipleSurgeries;
    let schema = RowSchema::new()
        .entity::<Condition>(EntityKind::Condition)
        .entity::<Surgery>(EntityKind::Surgery)
        .computed("condition_body_site");
    let mut evaluation = Evaluation::new(schema);
    let surgeries = group_by_subject(&ctx.tables.surgeries);
    for patient in ctx.patients() {
        let Some(rows) = surgeries.get(&patient.subject) else {
            continue;
        };
        if (rows.len() > 1) != multiple {
            continue;
        }
        let condition = ctx.condition(&patient.subject);
        for surgery in rows {
            let verdict = location_differs(condition, surgery);
            evaluation.record(verdict, || {
                let site = condition
                    .and_then(|c| c.localization.as_deref())
                    .and_then(body_site)
                    .map(|site| site.code);
                RowBuilder::new(&patient.subject)
                    .entity(condition)
                    .entity(Some(*surgery))
                    .value(site)
                    .finish()
            });
        }
    }
    evaluation.finish(rule, None)
}

fn surgery_check(surgery: &Surgery) -> Option<SurgeryCheck> {
    let site = surgery.body_site.as_ref()?;
    let kind = SurgeryType::parse(surgery.type_source.as_deref()?)?;
    Some(classify_surgery(&site.display, kind))
}

pub(super) fn location_type_mismatch(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let schema = RowSchema::new()
        .entity::<Surgery>(EntityKind::Surgery)
        .computed("surgery_check");
    let mut evaluation = Evaluation::new(schema);
    for surgery in &ctx.tables.surgeries {
        let check = surgery_check(surgery);
        let verdict = check.map(|check| check != SurgeryCheck::Valid);
        evaluation.record(verdict, || {
            RowBuilder::new(&surgery.subject)
                .entity(Some(surgery))
                .value(check.map(|check| check.as_str()))
                .finish()
        });
    }
    evaluation.finish(Rule::SurgeryLocationTypeMismatch, None)
}
