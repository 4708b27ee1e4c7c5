//! Conversion of matcher evidence into per-step credit.
//!
//! - An exact or equivalent match earns full points ([`StepStatus::Correct`]).
//! - Intermediate work only earns `partial_credit` of the points
//!   ([`StepStatus::PartiallyCorrect`]).
//! - No evidence earns nothing ([`StepStatus::Incorrect`]).
//!
//! A required step other than the final answer that ends up [`StepStatus::Incorrect`] breaks the
//! chain: every later step that earned credit is capped at `gating_cap` of its points, and a
//! capped step is at best [`StepStatus::PartiallyCorrect`]. The cap is flat: several missing
//! required steps cap later steps once, not repeatedly. A correct final answer never repairs a
//! broken chain.

use crate::{
    config::GraderConfig,
    matcher::{Alignment, Confidence, GoldTarget, SlotEvidence},
    result::{StepEvaluation, StepStatus},
    step::StudentStep,
};

/// The message given for a step that is not recognizable mathematics.
pub const UNINTERPRETABLE: &str = "could not interpret submitted step";

/// Scores every gold step.
pub fn score(
    gold: &[GoldTarget],
    alignment: &Alignment,
    students: &[StudentStep],
    config: &GraderConfig,
) -> Vec<StepEvaluation> {
    let mut broken_by: Option<u32> = None;
    let mut evaluations = Vec::with_capacity(gold.len());

    for (index, (target, slot)) in gold.iter().zip(&alignment.slots).enumerate() {
        let mut evaluation = evaluate_slot(index, target, slot, students, config);

        if let Some(missing) = broken_by {
            if evaluation.status != StepStatus::Incorrect {
                cap(&mut evaluation, missing, config.gating_cap);
            }
        }

        let step = target.step();
        if step.required() && !target.is_final_answer() && evaluation.status == StepStatus::Incorrect {
            broken_by.get_or_insert(step.order());
        }
        evaluations.push(evaluation);
    }

    evaluations
}

/// Caps the credit of a step that comes after a missing required step.
fn cap(evaluation: &mut StepEvaluation, missing: u32, gating_cap: f64) {
    let limit = gating_cap * evaluation.points_possible;
    evaluation.points_earned = evaluation.points_earned.min(limit);
    if gating_cap < 1.0 {
        evaluation.status = StepStatus::PartiallyCorrect;
    }
    evaluation.feedback.push_str(&format!(
        " Credit is capped at {:.0}% because required step {} is missing.",
        gating_cap * 100.0,
        missing,
    ));
}

/// Finds the student step with the given index.
fn student(students: &[StudentStep], index: usize) -> Option<&StudentStep> {
    students.iter().find(|s| s.index() == index)
}

/// Scores one gold step from its evidence, before gating.
fn evaluate_slot(
    index: usize,
    target: &GoldTarget,
    slot: &SlotEvidence,
    students: &[StudentStep],
    config: &GraderConfig,
) -> StepEvaluation {
    let step = target.step();
    let mut evaluation = StepEvaluation {
        step_number: step.order(),
        status: StepStatus::Incorrect,
        points_earned: 0.0,
        points_possible: step.points(),
        feedback: String::new(),
        matched_gold_index: None,
        expected: None,
        received: None,
        required: step.required(),
        final_answer: target.is_final_answer(),
    };

    if let Some(best) = slot.best {
        evaluation.matched_gold_index = Some(index);
        evaluation.received = student(students, best.student_index).map(|s| s.raw().to_owned());
        match best.confidence {
            Confidence::Exact => {
                evaluation.status = StepStatus::Correct;
                evaluation.points_earned = step.points();
                evaluation.feedback = "Correct.".to_owned();
            },
            Confidence::Equivalent => {
                evaluation.status = StepStatus::Correct;
                evaluation.points_earned = step.points();
                evaluation.feedback = "Correct: equivalent to the expected step.".to_owned();
            },
            Confidence::IntermediateDerivation => {
                evaluation.status = StepStatus::PartiallyCorrect;
                evaluation.points_earned = config.partial_credit * step.points();
                evaluation.expected = Some(step.content().to_owned());
                evaluation.feedback = "Partially correct: valid work towards this step, but the step itself is not shown.".to_owned();
            },
            Confidence::None => (),
        }
        if evaluation.status != StepStatus::Incorrect {
            return evaluation;
        }
    }

    evaluation.expected = Some(step.content().to_owned());
    let what = if target.is_final_answer() { "final answer" } else { "step" };
    evaluation.feedback = match slot.uninterpretable.and_then(|i| student(students, i)) {
        Some(unreadable) if !slot.not_attempted => {
            evaluation.received = Some(unreadable.raw().to_owned());
            let reason = unreadable.parsed().err().map(|err| err.message()).unwrap_or_default();
            format!("Incorrect: {} ({}).", UNINTERPRETABLE, reason)
        },
        _ if slot.not_attempted => format!("Not attempted: the solution skips this {}.", what),
        _ => format!("Incorrect: no submitted step matches the expected {}.", what),
    };
    evaluation
}
