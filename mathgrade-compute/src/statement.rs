//! Symbolic form of a parsed step.

use crate::symbolic::expr::Expr;
use mathgrade_parser::{Clause as AstClause, Statement as AstStatement};
use std::{collections::BTreeSet, fmt, ops::Neg};

/// An equation `lhs = rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    /// Returns `lhs - rhs`, which is zero exactly when the equation holds.
    pub fn difference(&self) -> Expr {
        self.lhs.clone() + self.rhs.clone().neg()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// A single claim in a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Expr(Expr),
    Equation(Equation),
}

impl Clause {
    /// Returns the expressions that make up the clause: one for an expression, two for an
    /// equation.
    pub fn sides(&self) -> Vec<&Expr> {
        match self {
            Clause::Expr(expr) => vec![expr],
            Clause::Equation(equation) => vec![&equation.lhs, &equation.rhs],
        }
    }

    /// Returns the names of the variables in the clause.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        self.sides().into_iter().flat_map(Expr::free_symbols).collect()
    }
}

impl From<AstClause> for Clause {
    fn from(clause: AstClause) -> Self {
        match clause {
            AstClause::Expr(expr) => Clause::Expr(expr.into()),
            AstClause::Equation(equation) => Clause::Equation(Equation {
                lhs: equation.lhs.into(),
                rhs: equation.rhs.into(),
            }),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Expr(expr) => expr.fmt(f),
            Clause::Equation(equation) => equation.fmt(f),
        }
    }
}

/// A step made of one or more clauses. Several clauses list alternatives, so their order does
/// not matter.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub clauses: Vec<Clause>,
}

impl Statement {
    /// Returns true if the statement is a single equation.
    pub fn as_equation(&self) -> Option<&Equation> {
        match self.clauses.as_slice() {
            [Clause::Equation(equation)] => Some(equation),
            _ => None,
        }
    }
}

impl From<AstStatement> for Statement {
    fn from(statement: AstStatement) -> Self {
        Self {
            clauses: statement.clauses.into_iter().map(Clause::from).collect(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            clause.fmt(f)?;
        }
        Ok(())
    }
}
