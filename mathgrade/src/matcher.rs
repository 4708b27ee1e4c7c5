//! Alignment of student steps with gold steps.
//!
//! The matcher makes a single greedy left-to-right pass over the student steps, keeping a pointer
//! `g` to the next gold step. Gold steps are never revisited once passed, so a submission that
//! reorders its steps is graded less favorably than one in rubric order.
//!
//! For each student step `s`:
//!
//! 1. If every gold step has been passed, `s` is an extra step.
//! 2. If `s` is textually identical to `gold[g]` after normalization, it is an exact match and `g`
//!    advances.
//! 3. If `s` cannot be parsed, it is recorded as uninterpretable against `gold[g]`.
//! 4. If `s` is equivalent to `gold[g]`, it is an equivalent match and `g` advances.
//! 5. If `s` is [intermediate work](mathgrade_compute::is_intermediate_step) between `gold[g - 1]`
//!    and `gold[g]`, it is recorded against `gold[g]` without advancing.
//! 6. Otherwise the next few gold steps are tried for an exact or equivalent match. On a match,
//!    the skipped gold steps are marked as not attempted, and `g` moves past the matched step.
//! 7. Otherwise `s` matches nothing.
//!
//! When the rubric has a final answer that is still unmatched after the pass, the unmatched
//! student steps are scanned from the end for an exact or equivalent match with it.

use crate::{config::GraderConfig, error::ConfigurationError, rubric::GoldStep, step::StudentStep};
use mathgrade_compute::{equals_exact, equivalent, is_intermediate_step, parse, EquivalenceOptions, ParsedExpr};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A gold step with its content parsed once, when the grader is created.
#[derive(Debug, Clone)]
pub struct GoldTarget {
    step: GoldStep,
    parsed: ParsedExpr,
    final_answer: bool,
}

impl GoldTarget {
    /// Parses a gold step. A gold step that does not parse makes the rubric invalid.
    pub fn new(step: &GoldStep, final_answer: bool) -> Result<Self, ConfigurationError> {
        let parsed = parse(step.content()).map_err(|err| ConfigurationError::UnparseableStep {
            order: step.order(),
            content: step.content().to_owned(),
            message: err.message(),
        })?;
        Ok(Self {
            step: step.clone(),
            parsed,
            final_answer,
        })
    }

    pub fn step(&self) -> &GoldStep {
        &self.step
    }

    pub fn parsed(&self) -> &ParsedExpr {
        &self.parsed
    }

    /// Whether this is the final answer of the rubric.
    pub fn is_final_answer(&self) -> bool {
        self.final_answer
    }
}

/// How strongly a student step supports a gold step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Exact,
    Equivalent,
    IntermediateDerivation,
    None,
}

impl Confidence {
    /// Ranks the confidence levels, higher is stronger.
    fn strength(self) -> u8 {
        match self {
            Confidence::Exact => 3,
            Confidence::Equivalent => 2,
            Confidence::IntermediateDerivation => 1,
            Confidence::None => 0,
        }
    }

    /// Returns true for an exact or equivalent match.
    pub fn is_full_match(self) -> bool {
        matches!(self, Confidence::Exact | Confidence::Equivalent)
    }
}

/// The match found for one student step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub student_index: usize,
    pub gold_index: Option<usize>,
    pub confidence: Confidence,
}

/// The strongest evidence a student step gave for a gold step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evidence {
    pub student_index: usize,
    pub confidence: Confidence,
}

/// Everything the matcher learned about one gold step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotEvidence {
    /// The strongest evidence for the step, if any.
    pub best: Option<Evidence>,

    /// Whether the matcher skipped past the step to match a later one.
    pub not_attempted: bool,

    /// The first uninterpretable student step recorded against the gold step.
    pub uninterpretable: Option<usize>,
}

impl SlotEvidence {
    /// Records evidence, keeping the stronger of the old and new.
    fn record(&mut self, student_index: usize, confidence: Confidence) {
        let stronger = self.best.map_or(true, |best| confidence.strength() > best.confidence.strength());
        if stronger {
            self.best = Some(Evidence { student_index, confidence });
        }
    }

    /// Returns true if the step has an exact or equivalent match.
    fn is_satisfied(&self) -> bool {
        self.best.is_some_and(|best| best.confidence.is_full_match())
    }
}

/// The output of the matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// One entry per student step, in submission order.
    pub matches: Vec<MatchResult>,

    /// One entry per gold step, in rubric order.
    pub slots: Vec<SlotEvidence>,

    /// Student steps submitted after every gold step was passed.
    pub extra: Vec<usize>,
}

/// Compares a student step with a gold step for an exact or equivalent match.
fn full_match(student: &StudentStep, target: &GoldTarget, options: &EquivalenceOptions) -> Option<Confidence> {
    if equals_exact(student.normalized(), target.parsed.normalized()) {
        return Some(Confidence::Exact);
    }
    let parsed = student.parsed().ok()?;
    equivalent(parsed, &target.parsed, options).then_some(Confidence::Equivalent)
}

/// Aligns student steps with gold steps.
pub fn align(gold: &[GoldTarget], students: &[StudentStep], config: &GraderConfig) -> Alignment {
    let options = config.equivalence_options();
    let mut matches = Vec::with_capacity(students.len());
    let mut slots = vec![SlotEvidence::default(); gold.len()];
    let mut extra = Vec::new();
    let mut g = 0;

    for student in students {
        let index = student.index();
        let mut result = MatchResult {
            student_index: index,
            gold_index: None,
            confidence: Confidence::None,
        };

        if g >= gold.len() {
            debug!(index, "extra step");
            extra.push(index);
            matches.push(result);
            continue;
        }

        if equals_exact(student.normalized(), gold[g].parsed.normalized()) {
            debug!(index, gold = g, "exact match");
            result.gold_index = Some(g);
            result.confidence = Confidence::Exact;
            slots[g].record(index, Confidence::Exact);
            g += 1;
            matches.push(result);
            continue;
        }

        let parsed = match student.parsed() {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(index, gold = g, %err, "uninterpretable step");
                slots[g].uninterpretable.get_or_insert(index);
                matches.push(result);
                continue;
            },
        };

        if equivalent(parsed, &gold[g].parsed, &options) {
            debug!(index, gold = g, "equivalent match");
            result.gold_index = Some(g);
            result.confidence = Confidence::Equivalent;
            slots[g].record(index, Confidence::Equivalent);
            g += 1;
            matches.push(result);
            continue;
        }

        let from = g.checked_sub(1).map(|prev| &gold[prev].parsed);
        if is_intermediate_step(parsed, from, &gold[g].parsed, &options) {
            debug!(index, gold = g, "intermediate derivation");
            result.gold_index = Some(g);
            result.confidence = Confidence::IntermediateDerivation;
            slots[g].record(index, Confidence::IntermediateDerivation);
            matches.push(result);
            continue;
        }

        let ahead = (1..=config.lookahead)
            .take_while(|k| g + k < gold.len())
            .find_map(|k| full_match(student, &gold[g + k], &options).map(|confidence| (g + k, confidence)));
        if let Some((target, confidence)) = ahead {
            debug!(index, gold = target, skipped = target - g, "matched after skipping gold steps");
            for slot in &mut slots[g..target] {
                slot.not_attempted = true;
            }
            result.gold_index = Some(target);
            result.confidence = confidence;
            slots[target].record(index, confidence);
            g = target + 1;
        } else {
            debug!(index, gold = g, "no match");
        }
        matches.push(result);
    }

    if config.final_answer_anywhere {
        recover_final_answer(gold, students, &options, g, &mut matches, &mut slots, &mut extra);
    }

    Alignment { matches, slots, extra }
}

/// Credits a final answer that was written out of order. `g` is the position of the matcher
/// after its pass.
fn recover_final_answer(
    gold: &[GoldTarget],
    students: &[StudentStep],
    options: &EquivalenceOptions,
    g: usize,
    matches: &mut [MatchResult],
    slots: &mut [SlotEvidence],
    extra: &mut Vec<usize>,
) {
    let Some(last) = gold.len().checked_sub(1).filter(|&last| gold[last].final_answer) else {
        return;
    };
    if slots[last].is_satisfied() {
        return;
    }

    let found = matches.iter()
        .rev()
        .filter(|m| m.confidence == Confidence::None)
        .find_map(|m| {
            let student = students.iter().find(|s| s.index() == m.student_index)?;
            full_match(student, &gold[last], options).map(|confidence| (m.student_index, confidence))
        });
    let Some((index, confidence)) = found else {
        return;
    };

    debug!(index, "final answer found out of order");
    for slot in &mut slots[g.min(last)..last] {
        slot.not_attempted = true;
    }
    slots[last].record(index, confidence);
    if let Some(result) = matches.iter_mut().find(|m| m.student_index == index) {
        result.gold_index = Some(last);
        result.confidence = confidence;
    }
    extra.retain(|&i| i != index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::GoldSolution;
    use pretty_assertions::assert_eq;

    fn targets(solution: &GoldSolution) -> Vec<GoldTarget> {
        let last = solution.all_steps().count() - 1;
        solution.all_steps()
            .enumerate()
            .map(|(i, step)| GoldTarget::new(step, i == last && solution.final_answer().is_some()).unwrap())
            .collect()
    }

    fn students(steps: &[&str]) -> Vec<StudentStep> {
        steps.iter().enumerate().map(|(i, s)| StudentStep::new(i, *s)).collect()
    }

    fn quadratic() -> GoldSolution {
        GoldSolution::from_rubric([
            ("x^2 - 5x + 6 = 0", 1.0, true),
            ("(x-2)(x-3)=0", 1.0, true),
            ("x=2 or x=3", 2.0, true),
        ]).unwrap()
    }

    fn confidences(alignment: &Alignment) -> Vec<(Option<usize>, Confidence)> {
        alignment.matches.iter().map(|m| (m.gold_index, m.confidence)).collect()
    }

    #[test]
    fn exact_and_equivalent() {
        let gold = targets(&quadratic());
        let alignment = align(
            &gold,
            &students(&["x^2 - 5x + 6 = 0", "(x − 2)(x − 3) = 0", "x = 3 or x = 2"]),
            &GraderConfig::default(),
        );
        assert_eq!(confidences(&alignment), vec![
            (Some(0), Confidence::Exact),
            (Some(1), Confidence::Exact),
            (Some(2), Confidence::Equivalent),
        ]);
        assert!(alignment.extra.is_empty());
    }

    #[test]
    fn lookahead_skips_missing_step() {
        let gold = targets(&quadratic());
        let alignment = align(&gold, &students(&["x^2 - 5x + 6 = 0", "x = 2 or x = 3"]), &GraderConfig::default());
        assert_eq!(confidences(&alignment), vec![
            (Some(0), Confidence::Exact),
            (Some(2), Confidence::Exact),
        ]);
        assert!(alignment.slots[1].not_attempted);
        assert_eq!(alignment.slots[1].best, None);
    }

    #[test]
    fn lookahead_is_bounded() {
        let gold = targets(&GoldSolution::from_rubric([
            ("x = 1", 1.0, true),
            ("x = 2", 1.0, true),
            ("x = 3", 1.0, true),
            ("x = 4", 1.0, true),
        ]).unwrap());
        let config = GraderConfig::builder().lookahead(1).build();
        let alignment = align(&gold, &students(&["x = 3"]), &config);
        assert_eq!(confidences(&alignment), vec![(None, Confidence::None)]);

        let alignment = align(&gold, &students(&["x = 3"]), &GraderConfig::default());
        assert_eq!(confidences(&alignment), vec![(Some(2), Confidence::Exact)]);
    }

    #[test]
    fn intermediate_evidence_is_replaced() {
        let gold = targets(&quadratic());
        let alignment = align(
            &gold,
            &students(&["x^2 - 5x + 6 = 0", "(x-2)(x-3)=0", "x = 2", "x = 2 or x = 3"]),
            &GraderConfig::default(),
        );
        assert_eq!(alignment.matches[2].confidence, Confidence::IntermediateDerivation);
        assert_eq!(alignment.slots[2].best, Some(Evidence { student_index: 3, confidence: Confidence::Exact }));
    }

    #[test]
    fn uninterpretable_steps_do_not_stop_matching() {
        let gold = targets(&quadratic());
        let alignment = align(
            &gold,
            &students(&["x^2 - 5x + 6 = 0", "I think the answer is probably something", "(x-2)(x-3)=0"]),
            &GraderConfig::default(),
        );
        assert_eq!(alignment.slots[1].uninterpretable, Some(1));
        assert_eq!(alignment.matches[1].confidence, Confidence::None);
        assert_eq!(alignment.matches[2].gold_index, Some(1));
    }

    #[test]
    fn extra_steps() {
        let gold = targets(&GoldSolution::from_rubric([("x = 1", 1.0, true)]).unwrap());
        let alignment = align(&gold, &students(&["x = 1", "y = 2"]), &GraderConfig::default());
        assert_eq!(alignment.extra, vec![1]);
    }

    #[test]
    fn final_answer_out_of_order() {
        let solution = GoldSolution::from_rubric([
            ("x^2 - 5x + 6 = 0", 1.0, true),
            ("x^2 - 5x = -6", 1.0, false),
            ("(x-2)(x-3)=0", 1.0, true),
        ])
            .unwrap()
            .with_final_answer("x = 2 or x = 3", 2.0, true)
            .unwrap();
        let gold = targets(&solution);

        // the answer comes first, then a step the matcher cannot place
        let steps = students(&["x = 3 or x = 2", "y = 12"]);
        let alignment = align(&gold, &steps, &GraderConfig::default());
        assert_eq!(alignment.matches[0].gold_index, Some(3));
        assert!(alignment.slots[..3].iter().all(|slot| slot.not_attempted));

        let config = GraderConfig::builder().final_answer_anywhere(false).build();
        let alignment = align(&gold, &steps, &config);
        assert_eq!(alignment.matches[0].gold_index, None);
    }
}
