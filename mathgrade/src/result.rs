//! The outcome of grading a submission.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How well a gold step was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    Correct,
    PartiallyCorrect,
    Incorrect,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Correct => write!(f, "Correct"),
            StepStatus::PartiallyCorrect => write!(f, "Partially correct"),
            StepStatus::Incorrect => write!(f, "Incorrect"),
        }
    }
}

/// The evaluation of one gold step. A [`GradingResult`] has exactly one per gold step, final
/// answer included, in rubric order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEvaluation {
    /// The order of the gold step in the rubric.
    pub step_number: u32,
    pub status: StepStatus,
    pub points_earned: f64,
    pub points_possible: f64,
    pub feedback: String,

    /// Position of the gold step in the rubric, if any student step provided evidence for it.
    pub matched_gold_index: Option<usize>,

    /// The expected content, given when the step was not satisfied.
    pub expected: Option<String>,

    /// The student step that was credited for this gold step, as submitted.
    pub received: Option<String>,

    /// Whether the gold step is required.
    #[serde(default)]
    pub required: bool,

    /// Whether the gold step is the final answer.
    #[serde(default)]
    pub final_answer: bool,
}

/// Why a student step did not contribute to any gold step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// Every gold step had already been passed.
    Extra,

    /// The step is not recognizable mathematics.
    Uninterpretable { message: String },

    /// The step matched no gold step near the current position.
    NoMatch,
}

/// A student step that did not contribute to any gold step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedStep {
    /// Position of the step in the submission, starting from 0.
    pub index: usize,
    pub text: String,
    #[serde(flatten)]
    pub reason: UnmatchedReason,
}

/// The result of grading one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub evaluations: Vec<StepEvaluation>,
    pub total_score: f64,
    pub max_score: f64,
    pub percentage: f64,
    #[serde(default)]
    pub unmatched_steps: Vec<UnmatchedStep>,
}

/// Counts of step outcomes in a [`GradingResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingSummary {
    pub correct: usize,
    pub partially_correct: usize,
    pub incorrect: usize,

    /// Step numbers of required steps that were not satisfied.
    pub missing_required: Vec<u32>,

    /// Number of student steps submitted after every gold step was passed.
    pub extra_steps: usize,
}

impl GradingResult {
    /// Builds a result from evaluations, computing the totals.
    pub(crate) fn new(evaluations: Vec<StepEvaluation>, unmatched_steps: Vec<UnmatchedStep>) -> Self {
        let total_score = evaluations.iter().map(|e| e.points_earned).sum::<f64>();
        let max_score = evaluations.iter().map(|e| e.points_possible).sum::<f64>();
        let percentage = if max_score > 0.0 {
            100.0 * total_score / max_score
        } else {
            0.0
        };
        Self {
            evaluations,
            total_score,
            max_score,
            percentage,
            unmatched_steps,
        }
    }

    /// Counts the outcomes of the evaluations.
    pub fn summary(&self) -> GradingSummary {
        let mut summary = GradingSummary::default();
        for evaluation in &self.evaluations {
            match evaluation.status {
                StepStatus::Correct => summary.correct += 1,
                StepStatus::PartiallyCorrect => summary.partially_correct += 1,
                StepStatus::Incorrect => {
                    summary.incorrect += 1;
                    if evaluation.required {
                        summary.missing_required.push(evaluation.step_number);
                    }
                },
            }
        }
        summary.extra_steps = self.unmatched_steps.iter()
            .filter(|step| step.reason == UnmatchedReason::Extra)
            .count();
        summary
    }

    /// Serializes the result as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
