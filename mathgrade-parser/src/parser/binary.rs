use crate::{
    parser::{
        error::Error,
        expr::{Expr, Primary},
        token::{BinOp, BinOpKind},
        unary::Unary,
        Associativity,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Creates the binary node `lhs op rhs`.
    fn new(lhs: Expr, op: BinOp, rhs: Expr) -> Self {
        let span = lhs.span().start..rhs.span().end;
        Self {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        }
    }

    /// Peeks at the operator following the current position without consuming it. A primary
    /// expression directly following the current one is reported as an implicit multiplication.
    fn peek_op(input: &Parser) -> Option<BinOp> {
        let kind = match input.peek_kind()? {
            TokenKind::Exp => BinOpKind::Exp,
            TokenKind::Mul => BinOpKind::Mul,
            TokenKind::Div => BinOpKind::Div,
            TokenKind::Add => BinOpKind::Add,
            TokenKind::Sub => BinOpKind::Sub,
            kind if kind.starts_primary() => {
                return Some(BinOp {
                    kind: BinOpKind::Mul,
                    implicit: true,
                    span: input.span(),
                });
            },
            _ => return None,
        };

        Some(BinOp {
            kind,
            implicit: false,
            span: input.span(),
        })
    }

    /// Consumes the operator reported by [`Binary::peek_op`] and parses its right-hand side,
    /// including every following operator that binds tighter than it.
    fn parse_rhs(input: &mut Parser, op: &BinOp) -> Result<Expr, Error> {
        let mut rhs = if op.implicit {
            input.try_parse::<Primary>()?.into()
        } else {
            input.next_token()?;
            Unary::parse_or_lower(input)?
        };

        // before creating the `lhs op rhs` node, check the precedence of the following operator,
        // if any: `3 + 4 * 5` must not become `(3 + 4) * 5`
        while let Some(next) = Self::peek_op(input) {
            let binds_tighter = next.precedence() > op.precedence()
                || (next.precedence() == op.precedence() && next.associativity() == Associativity::Right);
            if !binds_tighter {
                break;
            }
            rhs = input.nested(|input| Self::parse_expr(input, rhs, next.precedence()))?;
        }

        Ok(rhs)
    }

    /// Parses a chain of binary operations starting with the given left-hand side, consuming
    /// only operators with at least the given precedence.
    ///
    /// Each operator of the chain nests the left-hand side one level deeper.
    pub fn parse_expr(input: &mut Parser, mut lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        let mut links = 0;
        while let Some(mut op) = Self::peek_op(input) {
            if op.precedence() < precedence {
                break;
            }

            links += 1;
            input.check_depth(links)?;

            let rhs = Self::parse_rhs(input, &op)?;
            if op.implicit {
                op.span = lhs.span().end..rhs.span().start;
            }
            lhs = Expr::Binary(Self::new(lhs, op, rhs));
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {} {})", self.lhs, self.op.kind, self.rhs)
    }
}
