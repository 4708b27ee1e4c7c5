//! Mathematical equivalence of expressions, equations and statements.
//!
//! Every check first tries to prove equivalence symbolically by simplifying to a canonical
//! [`Poly`]. When that fails, the check falls back to evaluating both sides at deterministic
//! pseudo-random sample points. Points where either side is undefined are skipped. If every
//! point is skipped, or the check runs out of budget, the result is
//! [`Equivalence::Inconclusive`], which counts as not equivalent.

use crate::{
    budget::Budget,
    numerical::{evaluate, sample_points, within_relative_tolerance, within_tolerance, Assignment, EvalError},
    primitive::float,
    statement::{Clause, Equation, Statement},
    symbolic::{simplify, Expr, Poly, SimplifyError},
};
use rug::{Float, Rational};
use std::{collections::BTreeSet, ops::Neg, time::Duration};
use tracing::{debug, warn};

/// Options controlling how equivalence is decided.
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalenceOptions {
    /// Numeric tolerance. Constants and the roots of linear equations in one variable must differ
    /// by at most this much. Values at sample points are compared relative to their magnitude.
    pub tolerance: f64,

    /// The number of sample points used by the numeric fallback.
    pub samples: usize,

    /// Seed for the sample points.
    pub seed: u64,

    /// The number of simplification and evaluation steps a single check may take.
    pub step_budget: usize,

    /// An optional wall-clock limit for a single check.
    pub time_limit: Option<Duration>,
}

impl Default for EquivalenceOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            samples: 7,
            seed: 0x5EED_CAFE,
            step_budget: 20_000,
            time_limit: None,
        }
    }
}

impl EquivalenceOptions {
    /// Creates a fresh budget for one check.
    fn budget(&self) -> Budget {
        Budget::new(self.step_budget, self.time_limit)
    }
}

/// Why an equivalence check could not reach a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconclusive {
    /// Every sample point was outside the domain of one of the sides.
    DomainErrors,

    /// The check ran out of budget.
    BudgetExceeded,
}

/// The outcome of an equivalence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    /// Both sides simplify to the same canonical form.
    Symbolic,

    /// Both sides agree at every sample point where they are defined.
    Numeric,

    /// The sides differ.
    NotEquivalent,

    /// No decision could be made.
    Inconclusive(Inconclusive),
}

impl Equivalence {
    /// Returns true if the sides were shown to be equivalent.
    pub fn holds(self) -> bool {
        matches!(self, Self::Symbolic | Self::Numeric)
    }
}

/// Checks whether two expressions are equivalent.
pub fn check_expressions(a: &Expr, b: &Expr, options: &EquivalenceOptions) -> Equivalence {
    expressions(a, b, options, &mut options.budget())
}

/// Checks whether two equations are equivalent, that is, whether `a.lhs - a.rhs` is a nonzero
/// constant multiple of `b.lhs - b.rhs`. `2x = 8` and `x = 4` are equivalent.
pub fn check_equations(a: &Equation, b: &Equation, options: &EquivalenceOptions) -> Equivalence {
    equations(a, b, options, &mut options.budget())
}

/// Checks whether two statements are equivalent: they must have the same number of clauses, and
/// there must be a one-to-one pairing of equivalent clauses.
pub fn check_statements(a: &Statement, b: &Statement, options: &EquivalenceOptions) -> Equivalence {
    if a.clauses.len() != b.clauses.len() {
        return Equivalence::NotEquivalent;
    }

    let mut budget = options.budget();
    let mut used = vec![false; b.clauses.len()];
    let mut weakest = Equivalence::Symbolic;

    for lhs in &a.clauses {
        let mut found = None;
        let mut inconclusive = None;
        for (i, rhs) in b.clauses.iter().enumerate() {
            if used[i] {
                continue;
            }
            match clauses(lhs, rhs, options, &mut budget) {
                result if result.holds() => {
                    found = Some((i, result));
                    break;
                },
                Equivalence::Inconclusive(reason) => {
                    inconclusive.get_or_insert(reason);
                },
                _ => (),
            }
        }

        match found {
            Some((i, result)) => {
                used[i] = true;
                if result == Equivalence::Numeric {
                    weakest = Equivalence::Numeric;
                }
            },
            None => return inconclusive.map_or(Equivalence::NotEquivalent, Equivalence::Inconclusive),
        }
    }

    weakest
}

/// Checks whether two clauses are equivalent. An expression is never equivalent to an equation.
pub fn check_clauses(a: &Clause, b: &Clause, options: &EquivalenceOptions) -> Equivalence {
    clauses(a, b, options, &mut options.budget())
}

fn clauses(a: &Clause, b: &Clause, options: &EquivalenceOptions, budget: &mut Budget) -> Equivalence {
    match (a, b) {
        (Clause::Expr(a), Clause::Expr(b)) => expressions(a, b, options, budget),
        (Clause::Equation(a), Clause::Equation(b)) => equations(a, b, options, budget),
        _ => Equivalence::NotEquivalent,
    }
}

/// Handles a failed simplification. Returns the final result if the check must stop.
fn symbolic_failure(err: SimplifyError) -> Option<Equivalence> {
    match err {
        SimplifyError::BudgetExceeded(_) => {
            warn!("symbolic check ran out of budget");
            Some(Equivalence::Inconclusive(Inconclusive::BudgetExceeded))
        },
        SimplifyError::DivisionByZero => {
            debug!("symbolic check divided by zero, sampling instead");
            None
        },
    }
}

fn expressions(a: &Expr, b: &Expr, options: &EquivalenceOptions, budget: &mut Budget) -> Equivalence {
    let difference = a.clone() + b.clone().neg();
    match simplify(&difference, budget) {
        Ok(poly) if poly.is_zero() => return Equivalence::Symbolic,
        Ok(poly) => debug!(%poly, "difference does not simplify to zero, sampling"),
        Err(err) => if let Some(result) = symbolic_failure(err) {
            return result;
        },
    }

    let symbols: BTreeSet<String> = a.free_symbols().into_iter().chain(b.free_symbols()).collect();
    let agree: fn(&Float, &Float, f64) -> bool = if symbols.is_empty() {
        within_tolerance
    } else {
        within_relative_tolerance
    };
    let mut conclusive = 0;
    for point in sample_points(&symbols, options.samples, options.seed) {
        match evaluate_pair(a, b, &point, budget) {
            Ok((lhs, rhs)) => {
                if !agree(&lhs, &rhs, options.tolerance) {
                    return Equivalence::NotEquivalent;
                }
                conclusive += 1;
            },
            Err(EvalError::BudgetExceeded(_)) => {
                warn!("numeric check ran out of budget");
                return Equivalence::Inconclusive(Inconclusive::BudgetExceeded);
            },
            Err(err) => debug!(%err, "skipping sample point"),
        }
    }

    if conclusive == 0 {
        Equivalence::Inconclusive(Inconclusive::DomainErrors)
    } else {
        Equivalence::Numeric
    }
}

fn equations(a: &Equation, b: &Equation, options: &EquivalenceOptions, budget: &mut Budget) -> Equivalence {
    let (a, b) = (a.difference(), b.difference());
    let simplified = simplify(&a, budget).and_then(|lhs| Ok((lhs, simplify(&b, budget)?)));
    match simplified {
        Ok((lhs, rhs)) if proportional(&lhs, &rhs) => return Equivalence::Symbolic,
        Ok((lhs, rhs)) => {
            if let Some(result) = linear_roots(&lhs, &rhs, options.tolerance) {
                return result;
            }
            debug!("equations are not proportional symbolically, sampling");
        },
        Err(err) => if let Some(result) = symbolic_failure(err) {
            return result;
        },
    }

    let symbols = a.free_symbols().into_iter().chain(b.free_symbols()).collect();
    let mut values = Vec::new();
    for point in sample_points(&symbols, options.samples, options.seed) {
        match evaluate_pair(&a, &b, &point, budget) {
            Ok(pair) => values.push(pair),
            Err(EvalError::BudgetExceeded(_)) => {
                warn!("numeric check ran out of budget");
                return Equivalence::Inconclusive(Inconclusive::BudgetExceeded);
            },
            Err(err) => debug!(%err, "skipping sample point"),
        }
    }

    if values.is_empty() {
        return Equivalence::Inconclusive(Inconclusive::DomainErrors);
    }
    if proportional_values(&values, options.tolerance) {
        Equivalence::Numeric
    } else {
        Equivalence::NotEquivalent
    }
}

/// Compares two equations that are both linear in the same variable by their roots, so that
/// `x = 1000` and `x = 1000.0005` differ by `0.0005` no matter where `x` is sampled.
fn linear_roots(a: &Poly, b: &Poly, tolerance: f64) -> Option<Equivalence> {
    let (a_var, a_root) = a.linear_root()?;
    let (b_var, b_root) = b.linear_root()?;
    if a_var != b_var {
        return None;
    }
    if within_tolerance(&float(a_root), &float(b_root), tolerance) {
        Some(Equivalence::Numeric)
    } else {
        Some(Equivalence::NotEquivalent)
    }
}

/// Evaluates two expressions at the same point.
fn evaluate_pair(
    a: &Expr,
    b: &Expr,
    point: &Assignment,
    budget: &mut Budget,
) -> Result<(Float, Float), EvalError> {
    let lhs = evaluate(a, point, budget)?;
    let rhs = evaluate(b, point, budget)?;
    Ok((lhs, rhs))
}

/// Returns true if `a = k * b` for some nonzero rational `k`.
fn proportional(a: &Poly, b: &Poly) -> bool {
    match (a.leading_term(), b.leading_term()) {
        (None, None) => true,
        (Some((monomial, a_coeff)), Some(_)) => {
            let Some(b_coeff) = b.coefficient(monomial) else {
                return false;
            };
            let k = Rational::from(a_coeff / b_coeff);
            let mut rest = a.clone();
            rest.add(&b.scaled(&-k));
            rest.is_zero()
        },
        _ => false,
    }
}

/// Returns true if the sampled values satisfy `a = k * b` for a single nonzero `k`. The ratio is
/// estimated at the point where `b` is largest in magnitude.
fn proportional_values(values: &[(Float, Float)], tolerance: f64) -> bool {
    let Some((a_pivot, b_pivot)) = values.iter()
        .max_by(|(_, x), (_, y)| x.clone().abs().total_cmp(&y.clone().abs()))
    else {
        return false;
    };

    let zero = float(0);
    if within_relative_tolerance(b_pivot, &zero, tolerance) {
        // `b` vanishes everywhere sampled, so `a` has to as well
        return values.iter().all(|(a, _)| within_relative_tolerance(a, &zero, tolerance));
    }

    let k = float(a_pivot / b_pivot);
    if within_relative_tolerance(&k, &zero, tolerance) {
        return false;
    }
    values.iter().all(|(a, b)| within_relative_tolerance(a, &float(&k * b), tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed::parse;
    use pretty_assertions::assert_eq;

    fn check(a: &str, b: &str) -> Equivalence {
        check_with(a, b, &EquivalenceOptions::default())
    }

    fn check_with(a: &str, b: &str, options: &EquivalenceOptions) -> Equivalence {
        let a = parse(a).unwrap();
        let b = parse(b).unwrap();
        check_statements(a.statement(), b.statement(), options)
    }

    #[test]
    fn symbolic_expressions() {
        assert_eq!(check("x^2 + 3*x", "3x + x^2"), Equivalence::Symbolic);
        assert_eq!(check("(x-2)(x-3)", "x^2-5x+6"), Equivalence::Symbolic);
        assert_eq!(check("x^2", "2x"), Equivalence::NotEquivalent);
    }

    #[test]
    fn numeric_fallback() {
        assert_eq!(check("sin(x)^2 + cos(x)^2", "1"), Equivalence::Numeric);
        assert_eq!(check("sqrt(x)^2", "x"), Equivalence::Numeric);
        assert_eq!(check("sin(2x)", "2sin(x)cos(x)"), Equivalence::Numeric);
        assert_eq!(check("sin(x)", "cos(x)"), Equivalence::NotEquivalent);
    }

    #[test]
    fn scaled_equations() {
        assert_eq!(check("2x = 8", "x = 4"), Equivalence::Symbolic);
        assert_eq!(check("x^2 - 5x + 6 = 0", "(x-2)(x-3) = 0"), Equivalence::Symbolic);
        assert_eq!(check("x^2 = 5x - 6", "x^2 - 5x + 6 = 0"), Equivalence::Symbolic);
        assert_eq!(check("x = 4", "x = 5"), Equivalence::NotEquivalent);
    }

    #[test]
    fn single_clauses() {
        let options = EquivalenceOptions::default();
        let expr = |text: &str| match parse(text).unwrap().statement().clauses.as_slice() {
            [Clause::Expr(expr)] => expr.clone(),
            clauses => panic!("expected one expression, got {} clauses", clauses.len()),
        };
        let equation = |text: &str| parse(text).unwrap().statement().as_equation().cloned().unwrap();

        assert_eq!(check_expressions(&expr("2(x + 1)"), &expr("2x + 2"), &options), Equivalence::Symbolic);
        assert_eq!(check_expressions(&expr("ln(exp(x))"), &expr("x"), &options), Equivalence::Numeric);
        assert_eq!(check_equations(&equation("x + 1 = 3"), &equation("2 = x"), &options), Equivalence::Symbolic);
        assert_eq!(check_equations(&equation("x = 2"), &equation("x = -2"), &options), Equivalence::NotEquivalent);
    }

    #[test]
    fn equation_and_expression_differ() {
        assert_eq!(check("x = 4", "x - 4"), Equivalence::NotEquivalent);
    }

    #[test]
    fn clause_order_does_not_matter() {
        assert_eq!(check("x = 2 or x = 3", "x = 3 or x = 2"), Equivalence::Symbolic);
        assert_eq!(check("x = 2, x = 3", "x = 3 and x = 2"), Equivalence::Symbolic);
        assert_eq!(check("x = 2 or x = 3", "x = 2"), Equivalence::NotEquivalent);
        assert_eq!(check("x = 2 or x = 3", "x = 2 or x = 4"), Equivalence::NotEquivalent);
    }

    #[test]
    fn tolerance() {
        let loose = EquivalenceOptions { tolerance: 1e-4, ..Default::default() };
        let strict = EquivalenceOptions { tolerance: 1e-6, ..Default::default() };
        assert!(check_with("3.14159", "3.14160", &loose).holds());
        assert!(!check_with("3.14159", "3.14160", &strict).holds());
        assert!(check_with("x = 3.14159", "x = 3.14160", &loose).holds());
        assert!(!check_with("x = 3.14159", "x = 3.14160", &strict).holds());
    }

    #[test]
    fn tolerance_is_absolute_for_large_answers() {
        let strict = EquivalenceOptions { tolerance: 1e-6, ..Default::default() };
        let loose = EquivalenceOptions { tolerance: 1e-3, ..Default::default() };
        assert_eq!(check_with("1000", "1000.0005", &strict), Equivalence::NotEquivalent);
        assert_eq!(check_with("1000", "1000.0005", &loose), Equivalence::Numeric);
        assert_eq!(check_with("x = 1000", "x = 1000.0005", &strict), Equivalence::NotEquivalent);
        assert_eq!(check_with("2x = 2000", "x = 1000.0005", &loose), Equivalence::Numeric);
        assert_eq!(check_with("1000000", "1000000.5", &strict), Equivalence::NotEquivalent);
    }

    #[test]
    fn undefined_everywhere_is_inconclusive() {
        assert_eq!(
            check("sqrt(-1 - x^2)", "sqrt(-2 - x^2)"),
            Equivalence::Inconclusive(Inconclusive::DomainErrors),
        );
    }

    #[test]
    fn budget_exhaustion_is_inconclusive() {
        let options = EquivalenceOptions { step_budget: 50, ..Default::default() };
        let result = check_with("(x+y+z)^12", "(z+y+x)^12", &options);
        assert_eq!(result, Equivalence::Inconclusive(Inconclusive::BudgetExceeded));
        assert!(!result.holds());
    }
}
