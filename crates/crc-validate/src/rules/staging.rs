//! TNM and stage cross-checks.

use crc_map::is_stage_four;
use crc_model::coding::code_of;
use crc_model::{EntityKind, Result, Stored, Tnm};
use crc_transform::{Edition, StageOutcome, compute_tnm_stage};

use crate::catalog::Rule;
use crate::context::RuleContext;
use crate::frame::{RowBuilder, RowSchema};
use crate::outcome::{Evaluation, RuleOutcome};

fn tnm_schema() -> RowSchema {
    RowSchema::new().entity::<Tnm>(EntityKind::Tnm)
}

/// Stage or undetermined reason, for the row table.
fn describe(outcome: Option<&StageOutcome>) -> Option<String> {
    outcome.map(|outcome| match outcome {
        StageOutcome::Computed(stage) => (*stage).to_string(),
        StageOutcome::Undetermined { reason } => reason.clone(),
    })
}

fn record_tnm(
    evaluation: &mut Evaluation,
    tnm: &Stored<Tnm>,
    verdict: Option<bool>,
    outcome: Option<&StageOutcome>,
) {
    evaluation.record(verdict, || {
        RowBuilder::new(&tnm.subject)
            .entity(Some(tnm))
            .value(describe(outcome))
            .finish()
    });
}

/// Recomputes the stage and compares it with the recorded one.
pub(super) fn stage_mismatch(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut evaluation = Evaluation::new(tnm_schema().computed("stage_outcome"));
    for tnm in &ctx.tables.tnms {
        let outcome = compute_tnm_stage(tnm);
        let computed = outcome.as_ref().and_then(StageOutcome::stage);
        let verdict = computed
            .zip(code_of(tnm.stage.as_ref()))
            .map(|(computed, recorded)| computed != recorded);
        record_tnm(&mut evaluation, tnm, verdict, outcome.as_ref());
    }
    evaluation.finish(Rule::StageMismatch, None)
}

/// Rows with a 6th or 7th edition and determinate N and M.
fn stageable(tnm: &Tnm) -> bool {
    code_of(tnm.edition.as_ref()).and_then(Edition::parse).is_some()
        && code_of(tnm.m.as_ref()) != Some("MX")
        && code_of(tnm.n.as_ref()) != Some("NX")
}

/// Only stageable rows count toward the total.
pub(super) fn uncomputable_tnm(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut evaluation = Evaluation::new(tnm_schema().computed("stage_outcome"));
    for tnm in ctx.tables.tnms.iter().filter(|tnm| stageable(tnm)) {
        let outcome = compute_tnm_stage(tnm);
        let verdict = outcome.as_ref().map(|outcome| !outcome.is_computed());
        record_tnm(&mut evaluation, tnm, verdict, outcome.as_ref());
    }
    evaluation.finish(Rule::UncomputableTnm, None)
}

pub(super) fn nx_with_determined_stage(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut evaluation = Evaluation::new(tnm_schema());
    for tnm in &ctx.tables.tnms {
        let verdict = code_of(tnm.n.as_ref()).map(|n| {
            n == "NX" && code_of(tnm.stage.as_ref()).is_some_and(|stage| !is_stage_four(stage))
        });
        evaluation.record(verdict, || {
            RowBuilder::new(&tnm.subject).entity(Some(tnm)).finish()
        });
    }
    evaluation.finish(Rule::NxWithDeterminedStage, None)
}
