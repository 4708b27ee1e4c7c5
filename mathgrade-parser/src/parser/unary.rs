use crate::{
    parser::{
        binary::Binary,
        error::Error,
        expr::{Expr, Primary},
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// A negation, such as `-x` or `-(x + 1)`.
///
/// Negation binds looser than exponentiation, so `-x^2` is `-(x^2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    /// The negated expression.
    pub operand: Box<Expr>,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary expression, or lower precedence expressions. A leading `+` is accepted and
    /// dropped.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        match input.peek_kind() {
            Some(TokenKind::Sub) => {
                let op = input.next_token()?;
                let operand = input.nested(Self::parse_or_lower)?;
                let operand = Binary::parse_expr(input, operand, Precedence::Neg)?;
                let span = op.span.start..operand.span().end;
                Ok(Expr::Unary(Self {
                    operand: Box::new(operand),
                    span,
                }))
            },
            Some(TokenKind::Add) => {
                input.next_token()?;
                let operand = input.nested(Self::parse_or_lower)?;
                Binary::parse_expr(input, operand, Precedence::Neg)
            },
            _ => Ok(input.try_parse::<Primary>()?.into()),
        }
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(-{})", self.operand)
    }
}
