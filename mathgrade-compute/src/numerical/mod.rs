//! Numerical evaluation of expressions at sample points.

pub mod eval;
pub mod sample;

pub use eval::{evaluate, Assignment, EvalError};
pub use sample::{sample_points, within_relative_tolerance, within_tolerance};
