//! Splits a raw submission into the steps it lists.

use crate::normalize::normalize;

/// Splits a submission into steps, one per line or `;`-separated segment. Segments that hold
/// nothing but a step label or whitespace are dropped.
pub fn split_steps(submission: &str) -> Vec<String> {
    submission
        .split(|c: char| c == '\n' || c == ';')
        .map(str::trim)
        .filter(|segment| !normalize(segment).is_empty())
        .map(str::to_owned)
        .collect()
}
