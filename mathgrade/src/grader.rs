use crate::{
    config::GraderConfig,
    error::ConfigurationError,
    matcher::{align, Confidence, GoldTarget},
    result::{GradingResult, UnmatchedReason, UnmatchedStep},
    rubric::GoldSolution,
    scoring::score,
    step::StudentStep,
};
use mathgrade_parser::split_steps;
use tracing::info;

/// Grades submissions against one rubric.
///
/// A `Grader` is immutable once created, so one instance can grade many submissions, from any
/// number of threads at once. Every call to [`Grader::grade`] allocates its own working state.
///
/// ```
/// use mathgrade::{GoldSolution, Grader, GraderConfig, StepStatus};
///
/// let solution = GoldSolution::from_rubric([
///     ("x^2 - 5x + 6 = 0", 1.0, true),
///     ("(x-2)(x-3)=0", 1.0, true),
///     ("x=2 or x=3", 2.0, true),
/// ]).unwrap();
/// let grader = Grader::new(solution, GraderConfig::default()).unwrap();
///
/// let result = grader.grade(["x² − 5x + 6 = 0", "(x - 2)(x - 3) = 0", "x = 3 or x = 2"]);
/// assert_eq!(result.total_score, 4.0);
/// assert!(result.evaluations.iter().all(|e| e.status == StepStatus::Correct));
/// ```
#[derive(Debug, Clone)]
pub struct Grader {
    solution: GoldSolution,
    gold: Vec<GoldTarget>,
    config: GraderConfig,
}

impl Grader {
    /// Creates a grader, checking the configuration and parsing every gold step.
    pub fn new(solution: GoldSolution, config: GraderConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let final_index = solution.final_answer().map(|_| solution.steps().len());
        let gold = solution.all_steps()
            .enumerate()
            .map(|(i, step)| GoldTarget::new(step, Some(i) == final_index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { solution, gold, config })
    }

    pub fn solution(&self) -> &GoldSolution {
        &self.solution
    }

    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// Grades a submission given as a list of steps, in the order they were written.
    ///
    /// This never fails: a step that cannot be interpreted is reported in the feedback of the
    /// gold step it was compared with, and grading continues.
    pub fn grade<I>(&self, steps: I) -> GradingResult
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let students = steps.into_iter()
            .enumerate()
            .map(|(index, raw)| StudentStep::new(index, raw.as_ref()))
            .collect::<Vec<_>>();

        let alignment = align(&self.gold, &students, &self.config);
        let evaluations = score(&self.gold, &alignment, &students, &self.config);

        let unmatched_steps = alignment.matches.iter()
            .filter(|m| m.confidence == Confidence::None)
            .filter_map(|m| students.iter().find(|s| s.index() == m.student_index))
            .map(|student| {
                let reason = if alignment.extra.contains(&student.index()) {
                    UnmatchedReason::Extra
                } else if let Err(err) = student.parsed() {
                    UnmatchedReason::Uninterpretable { message: err.message() }
                } else {
                    UnmatchedReason::NoMatch
                };
                UnmatchedStep {
                    index: student.index(),
                    text: student.raw().to_owned(),
                    reason,
                }
            })
            .collect();

        let result = GradingResult::new(evaluations, unmatched_steps);
        info!(
            rubric = self.solution.name().unwrap_or("unnamed"),
            total = result.total_score,
            max = result.max_score,
            "graded submission of {} steps",
            students.len(),
        );
        result
    }

    /// Grades a submission given as raw text. Steps are separated by line breaks or `;`, and
    /// blank steps are dropped.
    pub fn grade_text(&self, submission: &str) -> GradingResult {
        self.grade(split_steps(submission))
    }
}

/// Grades a submission against a rubric with the default configuration and the given tolerance.
pub fn grade<I>(solution: &GoldSolution, steps: I, tolerance: f64) -> Result<GradingResult, ConfigurationError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let grader = Grader::new(solution.clone(), GraderConfig::with_tolerance(tolerance))?;
    Ok(grader.grade(steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::StepStatus;
    use assert_float_eq::{
        afe_abs,
        afe_absolute_error_msg,
        afe_is_absolute_eq,
        assert_float_absolute_eq,
    };
    use pretty_assertions::assert_eq;

    fn quadratic() -> GoldSolution {
        GoldSolution::from_rubric([
            ("x^2 - 5x + 6 = 0", 1.0, true),
            ("(x-2)(x-3)=0", 1.0, true),
            ("x=2 or x=3", 2.0, true),
        ]).unwrap()
    }

    fn statuses(result: &GradingResult) -> Vec<StepStatus> {
        result.evaluations.iter().map(|e| e.status).collect()
    }

    #[test]
    fn exact_match() {
        let result = grade(&quadratic(), ["x^2 - 5x + 6 = 0", "(x-2)(x-3)=0", "x=2 or x=3"], 1e-6).unwrap();
        assert_float_absolute_eq!(result.total_score, 4.0);
        assert_float_absolute_eq!(result.percentage, 100.0);
        assert_eq!(statuses(&result), vec![StepStatus::Correct; 3]);
        assert!(result.unmatched_steps.is_empty());
    }

    #[test]
    fn notation_equivalence() {
        let solution = GoldSolution::from_rubric([("x^2 + 3x", 1.0, true)]).unwrap();
        let result = grade(&solution, ["x**2 + 3*x"], 1e-6).unwrap();
        assert_eq!(result.evaluations[0].status, StepStatus::Correct);
        assert_eq!(result.evaluations[0].feedback, "Correct: equivalent to the expected step.");
    }

    #[test]
    fn missing_required_step() {
        let result = grade(&quadratic(), ["x^2 - 5x + 6 = 0", "x = 2 or x = 3"], 1e-6).unwrap();
        assert_eq!(statuses(&result), vec![
            StepStatus::Correct,
            StepStatus::Incorrect,
            StepStatus::PartiallyCorrect,
        ]);
        assert_float_absolute_eq!(result.evaluations[0].points_earned, 1.0);
        assert_float_absolute_eq!(result.evaluations[1].points_earned, 0.0);
        assert_eq!(result.evaluations[1].expected.as_deref(), Some("(x-2)(x-3)=0"));
        assert_float_absolute_eq!(result.evaluations[2].points_earned, 1.0);
        assert_float_absolute_eq!(result.total_score, 2.0);
        assert_float_absolute_eq!(result.max_score, 4.0);
        assert_eq!(result.summary().missing_required, vec![2]);
    }

    #[test]
    fn tolerance_boundary() {
        let solution: GoldSolution = serde_json::from_str(
            r#"{ "final_answer": { "content": "3.14159", "points": 1.0 } }"#,
        ).unwrap();

        let loose = grade(&solution, ["3.14160"], 1e-4).unwrap();
        assert_eq!(loose.evaluations[0].status, StepStatus::Correct);

        let strict = grade(&solution, ["3.14160"], 1e-6).unwrap();
        assert_eq!(strict.evaluations[0].status, StepStatus::Incorrect);
    }

    #[test]
    fn malformed_step() {
        let result = grade(
            &quadratic(),
            ["x^2 - 5x + 6 = 0", "I think the answer is probably something", "(x-2)(x-3)=0", "x=2 or x=3"],
            1e-6,
        ).unwrap();
        assert_eq!(statuses(&result), vec![StepStatus::Correct; 3]);
        assert_eq!(result.unmatched_steps.len(), 1);
        assert!(matches!(result.unmatched_steps[0].reason, UnmatchedReason::Uninterpretable { .. }));

        let result = grade(&quadratic(), ["x^2 - 5x + 6 = 0", "I think the answer is probably something"], 1e-6).unwrap();
        assert_eq!(result.evaluations[1].status, StepStatus::Incorrect);
        assert!(result.evaluations[1].feedback.contains("could not interpret submitted step"));
        assert_eq!(result.evaluations[0].status, StepStatus::Correct);
    }

    #[test]
    fn deeply_nested_step() {
        let nested = format!("{}x{} = 2", "(".repeat(3000), ")".repeat(3000));
        let result = grade(
            &quadratic(),
            ["x^2 - 5x + 6 = 0", nested.as_str(), "(x-2)(x-3)=0", "x=2 or x=3"],
            1e-6,
        ).unwrap();
        assert_eq!(statuses(&result), vec![StepStatus::Correct; 3]);
        assert_eq!(result.unmatched_steps.len(), 1);
        assert_eq!(result.unmatched_steps[0].index, 1);
        assert!(matches!(result.unmatched_steps[0].reason, UnmatchedReason::Uninterpretable { .. }));
        assert_float_absolute_eq!(result.total_score, 4.0);
    }

    #[test]
    fn short_word_prose_step() {
        let result = grade(
            &quadratic(),
            ["x^2 - 5x + 6 = 0", "I do not get it", "(x-2)(x-3)=0", "x=2 or x=3"],
            1e-6,
        ).unwrap();
        assert_eq!(statuses(&result), vec![StepStatus::Correct; 3]);
        assert_eq!(result.unmatched_steps.len(), 1);
        assert!(matches!(result.unmatched_steps[0].reason, UnmatchedReason::Uninterpretable { .. }));

        let result = grade(&quadratic(), ["x^2 - 5x + 6 = 0", "it is ok"], 1e-6).unwrap();
        assert_eq!(result.evaluations[0].status, StepStatus::Correct);
        assert_eq!(result.evaluations[1].status, StepStatus::Incorrect);
        assert!(result.evaluations[1].feedback.contains("could not interpret submitted step"));
    }

    #[test]
    fn large_numeric_answer() {
        let solution = GoldSolution::from_rubric([("x = 5", 1.0, true), ("1000", 1.0, true)]).unwrap();

        let strict = grade(&solution, ["x = 5", "1000.0005"], 1e-6).unwrap();
        assert_eq!(strict.evaluations[0].status, StepStatus::Correct);
        assert_eq!(strict.evaluations[1].status, StepStatus::Incorrect);

        let loose = grade(&solution, ["x = 5", "1000.0005"], 1e-3).unwrap();
        assert_eq!(statuses(&loose), vec![StepStatus::Correct; 2]);
    }

    #[test]
    fn idempotent() {
        let grader = Grader::new(quadratic(), GraderConfig::default()).unwrap();
        let steps = ["x^2 = 5x - 6", "sqrt(x)^2 = x", "x = 2", "x = 3 or x = 2"];
        assert_eq!(grader.grade(steps), grader.grade(steps));
    }

    #[test]
    fn scores_stay_in_bounds() {
        let grader = Grader::new(quadratic(), GraderConfig::default()).unwrap();
        let submissions: [&[&str]; 5] = [
            &[],
            &["x = 2 or x = 3"],
            &["x=2 or x=3", "x=2 or x=3", "x=2 or x=3", "x=2 or x=3"],
            &["(x-2)(x-3)=0", "x^2 - 5x + 6 = 0", "x = 2"],
            &["hello there", "1/0", "sqrt(-1)", "x^2 - 5x + 6 = 0"],
        ];
        for steps in submissions {
            let result = grader.grade(steps);
            assert!(result.total_score >= 0.0 && result.total_score <= result.max_score, "{:?}", steps);
            let sum = result.evaluations.iter().map(|e| e.points_earned).sum::<f64>();
            assert_float_absolute_eq!(result.total_score, sum);
            assert_eq!(result.evaluations.len(), 3);
        }
    }

    #[test]
    fn grade_text_splits_steps() {
        let grader = Grader::new(quadratic(), GraderConfig::default()).unwrap();
        let result = grader.grade_text("Step 1: x^2 - 5x + 6 = 0\nStep 2: (x-2)(x-3) = 0; x = 2 or x = 3\n\n");
        assert_float_absolute_eq!(result.total_score, 4.0);
    }

    #[test]
    fn invalid_configuration() {
        let config = GraderConfig::builder().gating_cap(-0.5).build();
        assert!(matches!(
            Grader::new(quadratic(), config),
            Err(ConfigurationError::InvalidConfig { field: "gating_cap", .. }),
        ));

        let solution = GoldSolution::from_rubric([("(x - 2 = 0", 1.0, true)]).unwrap();
        assert!(matches!(
            Grader::new(solution, GraderConfig::default()),
            Err(ConfigurationError::UnparseableStep { order: 1, .. }),
        ));
    }

    #[test]
    fn concurrent_grading() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Grader>();

        let grader = Grader::new(quadratic(), GraderConfig::default()).unwrap();
        let expected = grader.grade(["x^2 - 5x + 6 = 0", "x = 2 or x = 3"]);
        std::thread::scope(|scope| {
            let handles = (0..4)
                .map(|_| scope.spawn(|| grader.grade(["x^2 - 5x + 6 = 0", "x = 2 or x = 3"])))
                .collect::<Vec<_>>();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
