//! Grading of step-by-step math solutions.
//!
//! A rubric is a [`GoldSolution`]: the ordered steps of a correct solution, each worth some
//! points and either required or optional, plus an optional final answer. A [`Grader`] aligns the
//! steps of a student submission with the rubric, giving credit for steps that match exactly, are
//! mathematically equivalent, or are recognizable work towards a step. Missing a required step
//! caps the credit of every later step.
//!
//! ```
//! use mathgrade::{grade, GoldSolution, StepStatus};
//!
//! let solution = GoldSolution::from_rubric([
//!     ("x^2 - 5x + 6 = 0", 1.0, true),
//!     ("(x-2)(x-3)=0", 1.0, true),
//!     ("x=2 or x=3", 2.0, true),
//! ]).unwrap();
//!
//! // the factored form is missing, so the final answer only earns half its points
//! let result = grade(&solution, ["x^2 - 5x + 6 = 0", "x = 2 or x = 3"], 1e-6).unwrap();
//! assert_eq!(result.total_score, 2.0);
//! assert_eq!(result.evaluations[1].status, StepStatus::Incorrect);
//! assert_eq!(result.evaluations[2].status, StepStatus::PartiallyCorrect);
//! ```

pub mod config;
pub mod error;
pub mod feedback;
pub mod grader;
pub mod matcher;
pub mod result;
pub mod rubric;
pub mod scoring;
pub mod step;

pub use config::GraderConfig;
pub use error::ConfigurationError;
pub use feedback::render_report;
pub use grader::{grade, Grader};
pub use result::{GradingResult, GradingSummary, StepEvaluation, StepStatus, UnmatchedReason, UnmatchedStep};
pub use rubric::{GoldSolution, GoldStep};
pub use step::StudentStep;
