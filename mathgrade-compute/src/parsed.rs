//! Steps parsed into symbolic form, ready for comparison.

use crate::{
    equivalence::{check_statements, Equivalence, EquivalenceOptions},
    statement::Statement,
};
use mathgrade_error::Error;
use mathgrade_parser::{normalize, parse_statement};
use std::io;

/// A step that has been normalized and parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExpr {
    normalized: String,
    statement: Statement,
}

impl ParsedExpr {
    /// Returns the normalized text of the step.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Returns the symbolic form of the step.
    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}

/// Error returned when a step is not recognizable mathematics.
#[derive(Debug, thiserror::Error)]
#[error("{}", .error.message())]
pub struct ParseError {
    normalized: String,
    error: Error,
}

impl ParseError {
    /// Returns the normalized text that failed to parse.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Returns a short description of the problem.
    pub fn message(&self) -> String {
        self.error.message()
    }

    /// Renders a report pointing at the problem in the normalized text.
    pub fn render(&self, src_id: &str) -> io::Result<String> {
        self.error.render(src_id, &self.normalized)
    }

    /// Prints a report pointing at the problem to stderr.
    pub fn report_to_stderr(&self, src_id: &str) -> io::Result<()> {
        self.error.report_to_stderr(src_id, &self.normalized)
    }
}

/// Normalizes and parses a step.
pub fn parse(text: &str) -> Result<ParsedExpr, ParseError> {
    let normalized = normalize(text);
    match parse_statement(&normalized) {
        Ok(statement) => Ok(ParsedExpr {
            statement: statement.into(),
            normalized,
        }),
        Err(error) => Err(ParseError { normalized, error }),
    }
}

/// Returns true if the two texts are identical after normalization.
pub fn equals_exact(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Checks whether two parsed steps are mathematically equivalent.
pub fn check_equivalence(a: &ParsedExpr, b: &ParsedExpr, options: &EquivalenceOptions) -> Equivalence {
    check_statements(&a.statement, &b.statement, options)
}

/// Returns true if two parsed steps are mathematically equivalent. An inconclusive check counts
/// as not equivalent.
pub fn equivalent(a: &ParsedExpr, b: &ParsedExpr, options: &EquivalenceOptions) -> bool {
    check_equivalence(a, b, options).holds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_before_parsing() {
        let parsed = parse("Step 2: (x − 2)(x − 3) = 0").unwrap();
        assert_eq!(parsed.normalized(), "(x-2)(x-3)=0");
        assert!(parsed.statement().as_equation().is_some());
    }

    #[test]
    fn exact_equality_uses_normalized_text() {
        assert!(equals_exact("x² + 3x", "x^2+3x"));
        assert!(!equals_exact("x**2 + 3*x", "x^2+3x"));
    }

    #[test]
    fn prose_is_rejected() {
        let err = parse("I think the answer is probably something").unwrap_err();
        assert!(err.message().starts_with("unrecognized word"), "{}", err.message());
        assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn empty_step_is_rejected() {
        let err = parse("Therefore,").unwrap_err();
        assert_eq!(err.message(), "the step contains no mathematical content");
    }

    #[test]
    fn equivalence_of_parsed_steps() {
        let options = EquivalenceOptions::default();
        let a = parse("x^2 + 3x").unwrap();
        let b = parse("x**2 + 3*x").unwrap();
        assert!(equivalent(&a, &b, &options));
        assert_eq!(check_equivalence(&a, &b, &options), Equivalence::Symbolic);
    }
}
