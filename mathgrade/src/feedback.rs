//! Human-readable report of a [`GradingResult`].

use crate::result::{GradingResult, StepStatus};
use std::fmt;

/// Width of the rules separating the sections of the report.
const RULE_WIDTH: usize = 70;

/// Renders the text report of a grading result: the overall score, a breakdown of each gold step,
/// counts of each outcome, the required steps that were missed, and recommendations.
///
/// ```
/// use mathgrade::{feedback::render_report, grade, GoldSolution};
///
/// let solution = GoldSolution::from_rubric([("2x = 8", 1.0, true), ("x = 4", 1.0, true)]).unwrap();
/// let result = grade(&solution, ["2x = 8", "x = 4"], 1e-6).unwrap();
/// let report = render_report(&result);
/// assert!(report.contains("OVERALL SCORE: 2/2 (100.0%)"));
/// ```
pub fn render_report(result: &GradingResult) -> String {
    Report(result).to_string()
}

/// Displays a grading result as a text report.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a>(pub &'a GradingResult);

impl Report<'_> {
    fn fmt_steps(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "STEP-BY-STEP BREAKDOWN:")?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        for evaluation in &self.0.evaluations {
            let label = if evaluation.final_answer { "Final answer" } else { "Step" };
            writeln!(f)?;
            writeln!(f, "{} {} [{}]:", label, evaluation.step_number, evaluation.status)?;
            writeln!(f, "  Your answer: {}", evaluation.received.as_deref().unwrap_or("(none)"))?;
            if let Some(expected) = &evaluation.expected {
                writeln!(f, "  Expected: {}", expected)?;
            }
            writeln!(f, "  Points: {}/{}", evaluation.points_earned, evaluation.points_possible)?;
            writeln!(f, "  {}", evaluation.feedback)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))
    }

    fn fmt_recommendations(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let summary = self.0.summary();
        writeln!(f, "RECOMMENDATIONS:")?;
        let overall = if self.0.percentage >= 90.0 {
            "Excellent work! You demonstrated strong problem-solving skills."
        } else if self.0.percentage >= 70.0 {
            "Good job! Review the steps marked as partial or incorrect."
        } else {
            "Keep practicing! Focus on showing all required steps clearly."
        };
        writeln!(f, "  {}", overall)?;

        if !summary.missing_required.is_empty() {
            writeln!(f, "  • Make sure to include all required steps in your solution.")?;
        }
        if summary.partially_correct > 0 {
            writeln!(f, "  • Some steps were partially correct - check for minor errors.")?;
        }
        if summary.incorrect > summary.correct {
            writeln!(f, "  • Review the solution method and practice similar problems.")?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let result = self.0;
        let summary = result.summary();
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "GRADING FEEDBACK")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;
        writeln!(
            f,
            "OVERALL SCORE: {}/{} ({:.1}%)",
            result.total_score,
            result.max_score,
            result.percentage,
        )?;
        writeln!(f)?;

        self.fmt_steps(f)?;

        writeln!(f)?;
        writeln!(f, "STATISTICS:")?;
        writeln!(f, "  ✓ Correct steps: {}", summary.correct)?;
        writeln!(f, "  ~ Partial steps: {}", summary.partially_correct)?;
        writeln!(f, "  ✗ Incorrect steps: {}", summary.incorrect)?;
        if summary.extra_steps > 0 {
            writeln!(f, "  + Extra steps: {}", summary.extra_steps)?;
        }

        if !summary.missing_required.is_empty() {
            writeln!(f)?;
            writeln!(f, "MISSING REQUIRED STEPS:")?;
            let missing = result.evaluations.iter()
                .filter(|e| e.required && e.status == StepStatus::Incorrect);
            for evaluation in missing {
                writeln!(
                    f,
                    "  • Step {}: {}",
                    evaluation.step_number,
                    evaluation.expected.as_deref().unwrap_or_default(),
                )?;
            }
        }

        writeln!(f)?;
        self.fmt_recommendations(f)?;
        writeln!(f)?;
        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grader::grade, rubric::GoldSolution};

    fn quadratic() -> GoldSolution {
        GoldSolution::from_rubric([
            ("x^2 - 5x + 6 = 0", 1.0, true),
            ("(x-2)(x-3)=0", 1.0, true),
            ("x=2 or x=3", 2.0, true),
        ]).unwrap()
    }

    #[test]
    fn full_marks() {
        let result = grade(&quadratic(), ["x^2 - 5x + 6 = 0", "(x-2)(x-3)=0", "x=2 or x=3"], 1e-6).unwrap();
        let report = render_report(&result);
        assert!(report.starts_with(&"=".repeat(RULE_WIDTH)));
        assert!(report.contains("OVERALL SCORE: 4/4 (100.0%)"));
        assert!(report.contains("  ✓ Correct steps: 3"));
        assert!(report.contains("Excellent work!"));
        assert!(!report.contains("MISSING REQUIRED STEPS"));
        assert!(!report.contains("  • "));
    }

    #[test]
    fn missing_steps_are_listed() {
        let result = grade(&quadratic(), ["x^2 - 5x + 6 = 0", "x = 2 or x = 3"], 1e-6).unwrap();
        let report = render_report(&result);
        assert!(report.contains("OVERALL SCORE: 2/4 (50.0%)"));
        assert!(report.contains("MISSING REQUIRED STEPS:\n  • Step 2: (x-2)(x-3)=0\n"));
        assert!(report.contains("Keep practicing!"));
        assert!(report.contains("  • Make sure to include all required steps in your solution."));
        assert!(report.contains("  • Some steps were partially correct - check for minor errors."));
        assert!(!report.contains("  • Review the solution method"));
    }

    #[test]
    fn empty_submission() {
        let result = grade(&quadratic(), Vec::<String>::new(), 1e-6).unwrap();
        let report = render_report(&result);
        assert!(report.contains("  Your answer: (none)"));
        assert!(report.contains("  ✗ Incorrect steps: 3"));
        assert!(report.contains("  • Review the solution method and practice similar problems."));
    }
}
