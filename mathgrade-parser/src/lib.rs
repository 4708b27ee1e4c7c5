//! Reading of handwritten solution steps: notation normalization, tokenization, and parsing into
//! an abstract syntax tree of [`Statement`]s.
//!
//! A step is normalized with [`normalize`] before it is parsed, so `x² − 5x + 6 = 0` and
//! `x^2-5x+6=0` produce the same tree:
//!
//! ```
//! use mathgrade_parser::{normalize, parse_statement};
//!
//! let source = normalize("Step 1: x² − 5x + 6 = 0");
//! assert_eq!(source, "x^2-5x+6=0");
//!
//! let statement = parse_statement(&source).unwrap();
//! assert_eq!(statement.clauses.len(), 1);
//! ```

pub mod normalize;
pub mod parser;
pub mod split;
pub mod tokenizer;

pub use normalize::normalize;
pub use parser::{
    error::Error,
    expr::Expr,
    statement::{Clause, Equation, Statement},
};
pub use split::split_steps;

/// Parses a complete step into a [`Statement`]. The step should already be normalized.
pub fn parse_statement(source: &str) -> Result<Statement, Error> {
    parser::Parser::new(source).try_parse_full::<Statement>()
}
