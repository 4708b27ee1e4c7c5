use crate::{
    parser::{
        error::{kind, Error},
        expr::Expr,
        names,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// An equation, such as `x^2 - 5x + 6 = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    /// The left-hand side of the equation.
    pub lhs: Expr,

    /// The right-hand side of the equation.
    pub rhs: Expr,

    /// The region of the source code that this equation was parsed from.
    pub span: Range<usize>,
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// A single claim in a step: either an expression or an equation.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Expr(Expr),
    Equation(Equation),
}

impl Clause {
    /// Returns the span of the clause.
    pub fn span(&self) -> Range<usize> {
        match self {
            Clause::Expr(expr) => expr.span(),
            Clause::Equation(equation) => equation.span.clone(),
        }
    }
}

impl Parse for Clause {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = input.try_parse::<Expr>()?;
        if input.peek_kind() != Some(TokenKind::Assign) {
            return Ok(Clause::Expr(lhs));
        }

        let first_eq = input.next_token()?;
        let rhs = input.try_parse::<Expr>()?;
        if input.peek_kind() == Some(TokenKind::Assign) {
            let second_eq = input.next_token()?;
            return Err(Error::new_fatal(vec![first_eq.span, second_eq.span], kind::ChainedEquation));
        }

        let span = lhs.span().start..rhs.span().end;
        Ok(Clause::Equation(Equation { lhs, rhs, span }))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Clause::Expr(expr) => expr.fmt(f),
            Clause::Equation(equation) => equation.fmt(f),
        }
    }
}

/// A complete step: one clause, or several clauses listed as alternatives, as in
/// `x = 2 or x = 3`. The connectives `or`, `and` and `,` all list clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The clauses of the step, in the order they were written.
    pub clauses: Vec<Clause>,

    /// The region of the source code that this statement was parsed from.
    pub span: Range<usize>,
}

impl Parse for Statement {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if input.peek_kind().is_none() {
            return Err(input.error(kind::EmptyStep));
        }

        if let Some(word) = input.prose() {
            return Err(Error::new_fatal(vec![word.span.clone()], kind::UnrecognizedWord {
                word: word.lexeme.to_owned(),
                suggestions: names::suggestions(word.lexeme),
            }));
        }

        let mut clauses = vec![input.try_parse::<Clause>()?];
        while input.peek_kind().is_some_and(TokenKind::is_connective) {
            input.next_token()?;
            clauses.push(input.try_parse::<Clause>()?);
        }

        if input.peek_kind() == Some(TokenKind::CloseParen) {
            input.skip_whitespace();
            return Err(input.error_fatal(kind::UnclosedParenthesis { opening: false }));
        }

        let span = clauses[0].span().start..clauses[clauses.len() - 1].span().end;
        Ok(Self { clauses, span })
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            clause.fmt(f)?;
        }
        Ok(())
    }
}
