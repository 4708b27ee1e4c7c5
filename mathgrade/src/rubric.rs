//! The rubric a submission is graded against.
//!
//! A [`GoldSolution`] is an ordered list of [`GoldStep`]s, plus an optional final answer that is
//! always considered last. Rubrics are usually written as JSON:
//!
//! ```
//! use mathgrade::GoldSolution;
//!
//! let solution: GoldSolution = serde_json::from_str(r#"{
//!     "name": "quadratic",
//!     "steps": [
//!         { "content": "x^2 - 5x + 6 = 0", "points": 1.0 },
//!         { "content": "(x-2)(x-3) = 0", "points": 1.0 }
//!     ],
//!     "final_answer": { "content": "x = 2 or x = 3", "points": 2.0 }
//! }"#).unwrap();
//!
//! assert_eq!(solution.max_score(), 4.0);
//! assert_eq!(solution.final_answer().unwrap().order(), 3);
//! ```

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// One expected step of a solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldStep {
    content: String,
    points: f64,
    required: bool,
    order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl GoldStep {
    /// Creates a gold step. The step is validated when it is added to a [`GoldSolution`].
    pub fn new(content: impl Into<String>, points: f64, required: bool, order: u32) -> Self {
        Self {
            content: content.into(),
            points,
            required,
            order,
            description: None,
        }
    }

    /// Attaches a human-readable description of the step.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The expression or equation this step expects.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn points(&self) -> f64 {
        self.points
    }

    /// Whether later steps depend on this one being shown.
    pub fn required(&self) -> bool {
        self.required
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.order == 0 {
            return Err(ConfigurationError::ZeroOrder { content: self.content.clone() });
        }
        if self.content.trim().is_empty() {
            return Err(ConfigurationError::EmptyContent { order: self.order });
        }
        if !self.points.is_finite() || self.points < 0.0 {
            return Err(ConfigurationError::InvalidPoints { order: self.order, points: self.points });
        }
        Ok(())
    }
}

/// A complete rubric: ordered gold steps and an optional final answer.
///
/// A `GoldSolution` is always valid: every constructor checks that
///
/// - there is at least one step or a final answer,
/// - every step has content, a positive order and finite non-negative points,
/// - orders strictly increase, with the final answer last,
/// - the rubric is worth more than zero points in total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSolution")]
pub struct GoldSolution {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    steps: Vec<GoldStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_answer: Option<GoldStep>,
}

impl GoldSolution {
    /// Creates a rubric from gold steps.
    pub fn new(steps: Vec<GoldStep>) -> Result<Self, ConfigurationError> {
        let solution = Self {
            name: None,
            steps,
            final_answer: None,
        };
        solution.validate()?;
        Ok(solution)
    }

    /// Creates a rubric from `(content, points, required)` entries, numbering them from 1.
    ///
    /// ```
    /// use mathgrade::GoldSolution;
    ///
    /// let solution = GoldSolution::from_rubric([
    ///     ("x^2 - 5x + 6 = 0", 1.0, true),
    ///     ("(x-2)(x-3)=0", 1.0, true),
    ///     ("x=2 or x=3", 2.0, true),
    /// ]).unwrap();
    /// assert_eq!(solution.steps().len(), 3);
    /// ```
    pub fn from_rubric<I, S>(rubric: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, f64, bool)>,
        S: Into<String>,
    {
        let steps = rubric.into_iter()
            .zip(1..)
            .map(|((content, points, required), order)| GoldStep::new(content, points, required, order))
            .collect();
        Self::new(steps)
    }

    /// Adds a final answer, ordered after every step.
    pub fn with_final_answer(
        mut self,
        content: impl Into<String>,
        points: f64,
        required: bool,
    ) -> Result<Self, ConfigurationError> {
        let order = self.steps.last().map_or(1, |step| step.order + 1);
        self.final_answer = Some(GoldStep::new(content, points, required, order));
        self.validate()?;
        Ok(self)
    }

    /// Names the rubric.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The gold steps, not including the final answer.
    pub fn steps(&self) -> &[GoldStep] {
        &self.steps
    }

    pub fn final_answer(&self) -> Option<&GoldStep> {
        self.final_answer.as_ref()
    }

    /// Every gold step in grading order, ending with the final answer if there is one.
    pub fn all_steps(&self) -> impl Iterator<Item = &GoldStep> {
        self.steps.iter().chain(self.final_answer.as_ref())
    }

    /// The total number of points the rubric is worth.
    pub fn max_score(&self) -> f64 {
        self.all_steps().map(GoldStep::points).sum()
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let mut previous: Option<u32> = None;
        for step in self.all_steps() {
            step.validate()?;
            match previous {
                Some(previous) if previous == step.order => {
                    return Err(ConfigurationError::DuplicateOrder { order: step.order });
                },
                Some(previous) if previous > step.order => {
                    return Err(ConfigurationError::NonIncreasingOrder { previous, order: step.order });
                },
                _ => previous = Some(step.order),
            }
        }

        if previous.is_none() {
            return Err(ConfigurationError::EmptyRubric);
        }

        let total = self.max_score();
        if total <= 0.0 {
            return Err(ConfigurationError::NonPositiveTotal { total });
        }
        Ok(())
    }
}

fn required_by_default() -> bool {
    true
}

/// A step as written in a rubric file, where `required` and `order` may be left out.
#[derive(Debug, Deserialize)]
struct RawStep {
    content: String,
    points: f64,
    #[serde(default = "required_by_default")]
    required: bool,
    #[serde(default)]
    order: Option<u32>,
    #[serde(default)]
    description: Option<String>,
}

impl RawStep {
    fn into_step(self, default_order: u32) -> GoldStep {
        GoldStep {
            content: self.content,
            points: self.points,
            required: self.required,
            order: self.order.unwrap_or(default_order),
            description: self.description,
        }
    }
}

/// A rubric as written in a rubric file.
#[derive(Debug, Deserialize)]
struct RawSolution {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    steps: Vec<RawStep>,
    #[serde(default)]
    final_answer: Option<RawStep>,
}

impl TryFrom<RawSolution> for GoldSolution {
    type Error = ConfigurationError;

    /// Missing orders are taken from the position of the step, and a final answer without an
    /// order comes right after the last step.
    fn try_from(raw: RawSolution) -> Result<Self, Self::Error> {
        let steps: Vec<GoldStep> = raw.steps.into_iter()
            .zip(1..)
            .map(|(step, position)| step.into_step(position))
            .collect();
        let next_order = steps.last().map_or(1, |step| step.order + 1);
        let solution = Self {
            name: raw.name,
            steps,
            final_answer: raw.final_answer.map(|step| step.into_step(next_order)),
        };
        solution.validate()?;
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn orders_are_assigned_from_position() {
        let solution = GoldSolution::from_rubric([("x = 1", 1.0, true), ("x = 2", 1.0, false)]).unwrap();
        let orders = solution.steps().iter().map(GoldStep::order).collect::<Vec<_>>();
        assert_eq!(orders, vec![1, 2]);
        assert!(!solution.steps()[1].required());
    }

    #[test]
    fn final_answer_comes_last() {
        let solution = GoldSolution::from_rubric([("2x = 8", 1.0, true)])
            .unwrap()
            .with_final_answer("x = 4", 2.0, true)
            .unwrap();
        assert_eq!(solution.final_answer().map(GoldStep::order), Some(2));
        assert_eq!(solution.all_steps().count(), 2);
        assert_eq!(solution.max_score(), 3.0);
    }

    #[test]
    fn final_answer_only() {
        let solution: GoldSolution = serde_json::from_str(
            r#"{ "final_answer": { "content": "3.14159", "points": 1.0 } }"#,
        ).unwrap();
        assert!(solution.steps().is_empty());
        assert_eq!(solution.final_answer().map(GoldStep::order), Some(1));
    }

    #[test]
    fn invalid_rubrics() {
        assert_eq!(GoldSolution::new(Vec::new()), Err(ConfigurationError::EmptyRubric));
        assert_eq!(
            GoldSolution::from_rubric([("x = 1", 0.0, true)]),
            Err(ConfigurationError::NonPositiveTotal { total: 0.0 }),
        );
        assert_eq!(
            GoldSolution::from_rubric([("x = 1", -1.0, true), ("x = 2", 3.0, true)]),
            Err(ConfigurationError::InvalidPoints { order: 1, points: -1.0 }),
        );
        assert_eq!(
            GoldSolution::from_rubric([("  ", 1.0, true)]),
            Err(ConfigurationError::EmptyContent { order: 1 }),
        );
        assert_eq!(
            GoldSolution::new(vec![GoldStep::new("x = 1", 1.0, true, 2), GoldStep::new("x = 2", 1.0, true, 2)]),
            Err(ConfigurationError::DuplicateOrder { order: 2 }),
        );
        assert_eq!(
            GoldSolution::new(vec![GoldStep::new("x = 1", 1.0, true, 3), GoldStep::new("x = 2", 1.0, true, 1)]),
            Err(ConfigurationError::NonIncreasingOrder { previous: 3, order: 1 }),
        );
        assert_eq!(
            GoldSolution::new(vec![GoldStep::new("x = 1", 1.0, true, 0)]),
            Err(ConfigurationError::ZeroOrder { content: "x = 1".to_owned() }),
        );
    }

    #[test]
    fn json_round_trip() {
        let solution = GoldSolution::from_rubric([
            ("x^2 - 5x + 6 = 0", 1.0, true),
            ("(x-2)(x-3)=0", 1.0, false),
        ])
            .unwrap()
            .with_name("quadratic")
            .with_final_answer("x=2 or x=3", 2.0, true)
            .unwrap();

        let json = serde_json::to_string(&solution).unwrap();
        let parsed: GoldSolution = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, solution);
    }

    #[test]
    fn json_is_validated() {
        let result = serde_json::from_str::<GoldSolution>(r#"{ "steps": [] }"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("the rubric has no steps"), "{}", err);
    }

    #[test]
    fn descriptions_are_kept() {
        let solution: GoldSolution = serde_json::from_str(r#"{
            "steps": [
                { "content": "x - 1 = 0", "points": 1.0, "description": "move everything to one side" }
            ]
        }"#).unwrap();
        assert_eq!(solution.steps()[0].description(), Some("move everything to one side"));
        assert!(solution.steps()[0].required());
    }

    #[test]
    fn steps_can_be_described() {
        let step = GoldStep::new("x = 1", 1.0, false, 2).with_description("solve for x");
        assert_eq!(step.description(), Some("solve for x"));
        assert_eq!(step.order(), 2);
        assert!(!step.required());
    }
}
