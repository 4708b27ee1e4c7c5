//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](mathgrade_parser::Expr) type from `mathgrade_parser` is a recursive `enum` that
//! mirrors how a step was written, down to its parentheses. That is convenient for reporting
//! errors, but not for algebra.
//!
//! This module defines a separate [`Expr`], which flattens the AST into lists of terms and
//! factors. Subtraction becomes addition of a term multiplied by `-1`, and division becomes
//! multiplication by a power with exponent `-1`. Numbers are stored as exact [`Rational`]s, so
//! `3.14159` is exactly `314159/100000`.
//!
//! # Strict equality
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`Expr`] implement **strict equality**, not
//! semantic equality. Two expressions are strictly equal if:
//!
//! - They are the same type of expression (i.e. both [`Expr::Primary`], both [`Expr::Add`], etc.).
//! - If both are [`Expr::Primary`], both expressions must have strictly equal values.
//! - If both are [`Expr::Add`] or [`Expr::Mul`], both expressions must have strictly equal terms /
//! factors, in any order.
//! - If both are [`Expr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! `(x + 1)^2` and `x^2 + 2x + 1` are not strictly equal. Deciding that is the job of
//! [`simplify`](super::simplify) and the [`equivalence`](crate::equivalence) checks. Strict
//! equality never reports a false positive, which makes it suitable for finding a subexpression
//! that two steps share.

mod iter;

use crate::primitive::{rational, rational_from_decimal};
use mathgrade_parser::{
    parser::{literal::Literal, token::BinOpKind},
    Expr as AstExpr,
};
use iter::ExprIter;
use rug::Rational;
use std::{collections::BTreeSet, fmt, ops::{Add, Mul, Neg}};

/// Names that denote constants rather than variables.
pub const CONSTANTS: [&str; 1] = ["pi"];

/// A single term in an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    /// An exact rational number.
    Number(Rational),

    /// A variable or constant, such as `x` or `pi`.
    Symbol(String),

    /// A function call, such as `sqrt(x)`.
    Call(String, Vec<Expr>),
}

impl Primary {
    /// Returns true if this is a number that cannot be written next to an operator without
    /// parentheses, i.e. a negative number or a fraction.
    fn is_compound_number(&self) -> bool {
        match self {
            Self::Number(n) => n.cmp0().is_lt() || !n.is_integer(),
            _ => false,
        }
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.is_integer() => write!(f, "{}", n.numer()),
            Self::Number(n) => write!(f, "{}/{}", n.numer(), n.denom()),
            Self::Symbol(name) => write!(f, "{}", name),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            },
        }
    }
}

/// Adds two [`Primary`]s together. Numbers are folded, anything else becomes an [`Expr::Add`].
impl Add for Primary {
    type Output = Expr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => Expr::Primary(Self::Number(lhs + rhs)),
            (lhs, rhs) => Expr::Add(vec![Expr::Primary(lhs), Expr::Primary(rhs)]),
        }
    }
}

/// Multiplies two [`Primary`]s together. Numbers are folded, anything else becomes an
/// [`Expr::Mul`].
impl Mul for Primary {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => Expr::Primary(Self::Number(lhs * rhs)),
            (lhs, rhs) => Expr::Mul(vec![Expr::Primary(lhs), Expr::Primary(rhs)]),
        }
    }
}

/// A mathematical expression with information about its terms and factors.
#[derive(Debug, Clone, Eq)]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Exp(Box<Expr>, Box<Expr>),
}

/// Binding strength of each kind of expression when printed, from loosest to tightest.
mod precedence {
    pub const ADD: u8 = 1;
    pub const NEG: u8 = 2;
    pub const MUL: u8 = 3;
    pub const EXP: u8 = 4;
    pub const PRIMARY: u8 = 5;
}

impl fmt::Display for Expr {
    /// Formats the expression deterministically: the same tree always prints the same way, with
    /// only the parentheses needed to read it back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{}", term)?;
                }
                Ok(())
            },
            Self::Mul(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, " * ")?;
                    }
                    let leading_sign = i == 0 && factor.precedence() == precedence::NEG;
                    if factor.precedence() < precedence::MUL && !leading_sign {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                if base.precedence() <= precedence::EXP {
                    write!(f, "({})", base)?;
                } else {
                    write!(f, "{}", base)?;
                }
                write!(f, "^")?;
                if exp.precedence() < precedence::EXP {
                    write!(f, "({})", exp)
                } else {
                    write!(f, "{}", exp)
                }
            },
        }
    }
}

impl Expr {
    /// Creates a number expression.
    pub fn number<T>(n: T) -> Self
    where
        Rational: From<T>,
    {
        Self::Primary(Primary::Number(rational(n)))
    }

    /// Creates a symbol expression.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Returns the printing precedence of the expression.
    fn precedence(&self) -> u8 {
        match self {
            Self::Primary(primary) if primary.is_compound_number() => {
                match primary {
                    Primary::Number(n) if n.cmp0().is_lt() => precedence::NEG,
                    _ => precedence::MUL,
                }
            },
            Self::Primary(_) => precedence::PRIMARY,
            Self::Add(_) => precedence::ADD,
            Self::Mul(_) => precedence::MUL,
            Self::Exp(_, _) => precedence::EXP,
        }
    }

    /// If the expression is a number, returns it.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(|n| n.cmp0().is_eq())
    }

    /// If the expression is a symbol, returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(name)) => Some(name),
            _ => None,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`Expr::Add`] with zero / one term, or an [`Expr::Mul`]
    /// with zero / one factor. This function checks for these cases and simplifies the expression
    /// into the single term / factor, or an [`Expr::Primary`] containing the number 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::number(0)
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::number(1)
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter<'_> {
        ExprIter::new(self)
    }

    /// Returns the number of nodes in the expression tree.
    pub fn node_count(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns the names of the variables in the expression. Constants such as `pi` are not
    /// included.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        self.post_order_iter()
            .filter_map(Expr::as_symbol)
            .filter(|name| !CONSTANTS.contains(name))
            .map(str::to_owned)
            .collect()
    }
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs.iter().all(|lhs| rhs.contains(lhs))
                    && rhs.iter().all(|rhs| lhs.contains(rhs))
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

impl From<AstExpr> for Expr {
    fn from(expr: AstExpr) -> Self {
        match expr {
            AstExpr::Literal(Literal::Number(num)) => {
                Self::Primary(Primary::Number(rational_from_decimal(&num.value)))
            },
            AstExpr::Literal(Literal::Symbol(sym)) => Self::Primary(Primary::Symbol(sym.name)),
            AstExpr::Paren(paren) => Self::from(*paren.expr),
            AstExpr::Call(call) => {
                let args = call.args.into_iter().map(Self::from).collect();
                Self::Primary(Primary::Call(call.name.name, args))
            },
            // treat this as -1 * operand
            AstExpr::Unary(unary) => Self::from(*unary.operand).neg(),
            AstExpr::Binary(bin) => {
                let lhs = Self::from(*bin.lhs);
                let rhs = Self::from(*bin.rhs);
                match bin.op.kind {
                    BinOpKind::Exp => Self::Exp(Box::new(lhs), Box::new(rhs)),
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => match lhs.as_number() {
                        Some(n) if *n == 1 => reciprocal(rhs),
                        _ => lhs * reciprocal(rhs),
                    },
                    BinOpKind::Add => lhs + rhs,
                    // treat this as lhs + -1 * rhs
                    BinOpKind::Sub => lhs + rhs.neg(),
                }
            },
        }
    }
}

/// Returns `expr^-1`, folding nonzero numbers. Division by a literal zero is kept as a power so
/// that it is reported when the expression is simplified or evaluated.
fn reciprocal(expr: Expr) -> Expr {
    match expr {
        Expr::Primary(Primary::Number(n)) if n.cmp0().is_ne() => Expr::Primary(Primary::Number(n.recip())),
        expr => Expr::Exp(Box::new(expr), Box::new(Expr::number(-1))),
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except for folding two numbers and
/// combining the terms of nested [`Expr::Add`]s into one list (flattening).
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except for folding two numbers
/// and combining the factors of nested [`Expr::Mul`]s into one list (flattening).
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs * rhs,
            (Self::Mul(mut factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

/// Multiplies the expression by `-1`, folding the sign into a leading number if there is one.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Number(n)) => Self::Primary(Primary::Number(-n)),
            Self::Mul(mut factors) => {
                if let Some(Self::Primary(Primary::Number(n))) = factors.first_mut() {
                    *n = -n.clone();
                    return Self::Mul(factors);
                }
                factors.insert(0, Self::number(-1));
                Self::Mul(factors)
            },
            expr => Self::number(-1) * expr,
        }
    }
}
