//! Simplification of expressions into canonical polynomial form.

use crate::{
    budget::{Budget, BudgetExceeded},
    primitive::rational,
    symbolic::{expr::{Expr, Primary}, poly::{Atom, Poly}},
};
use rug::Rational;
use tracing::trace;

/// Integer powers up to this size are expanded. Larger powers are kept as atoms.
pub const MAX_EXPANDED_POWER: i64 = 32;

/// Error returned when an expression cannot be simplified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SimplifyError {
    /// The simplification ran out of budget.
    #[error(transparent)]
    BudgetExceeded(#[from] BudgetExceeded),

    /// The expression divides by an expression that simplifies to zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Simplifies an expression into a [`Poly`].
///
/// Sums and products are expanded, integer powers of sums are multiplied out, and like terms are
/// collected. Function calls and non-integer powers become atoms after their arguments are
/// simplified, so `sin(2x + x)` and `sin(3x)` produce the same atom. A few exact evaluations are
/// performed along the way: `sqrt` of a perfect square and `abs` of a number.
pub fn simplify(expr: &Expr, budget: &mut Budget) -> Result<Poly, SimplifyError> {
    budget.tick()?;
    match expr {
        Expr::Primary(Primary::Number(n)) => Ok(Poly::constant(n.clone())),
        Expr::Primary(Primary::Symbol(_)) => Ok(Poly::atom(Atom::new(expr.clone()))),
        Expr::Primary(Primary::Call(name, args)) => simplify_call(name, args, budget),
        Expr::Add(terms) => {
            let mut sum = Poly::zero();
            for term in terms {
                sum.add(&simplify(term, budget)?);
            }
            Ok(sum)
        },
        Expr::Mul(factors) => {
            let mut product = Poly::constant(rational(1));
            for factor in factors {
                product = product.mul(&simplify(factor, budget)?, budget)?;
            }
            Ok(product)
        },
        Expr::Exp(base, exp) => {
            let base = simplify(base, budget)?;
            let exp = simplify(exp, budget)?;
            power(base, exp, budget)
        },
    }
}

/// Simplifies a function call.
fn simplify_call(name: &str, args: &[Expr], budget: &mut Budget) -> Result<Poly, SimplifyError> {
    let args = args.iter()
        .map(|arg| simplify(arg, budget))
        .collect::<Result<Vec<_>, _>>()?;

    match (name, args.as_slice()) {
        ("sqrt", [arg]) => power(arg.clone(), Poly::constant(rational((1, 2))), budget),
        ("abs", [arg]) => match arg.as_constant() {
            Some(value) => Ok(Poly::constant(value.abs())),
            None => Ok(opaque_call(name, &args)),
        },
        _ => Ok(opaque_call(name, &args)),
    }
}

/// Creates an atom for a call that cannot be simplified further.
fn opaque_call(name: &str, args: &[Poly]) -> Poly {
    let args = args.iter().map(Poly::to_expr).collect();
    Poly::atom(Atom::new(Expr::Primary(Primary::Call(name.to_owned(), args))))
}

/// Creates an atom for a power that cannot be simplified further.
fn opaque_power(base: &Poly, exp: &Poly) -> Poly {
    Poly::atom(Atom::new(Expr::Exp(Box::new(base.to_expr()), Box::new(exp.to_expr()))))
}

/// Simplifies `base^exp`.
fn power(base: Poly, exp: Poly, budget: &mut Budget) -> Result<Poly, SimplifyError> {
    let Some(exp_value) = exp.as_constant() else {
        return Ok(opaque_power(&base, &exp));
    };

    if exp_value.is_integer() {
        let Some(n) = exp_value.numer().to_i64().filter(|n| n.abs() <= MAX_EXPANDED_POWER) else {
            trace!(%exp_value, "power too large to expand");
            return Ok(opaque_power(&base, &exp));
        };

        if n >= 0 {
            return Ok(base.pow(n as u32, budget)?);
        }

        if base.is_zero() {
            return Err(SimplifyError::DivisionByZero);
        }
        let count = n.unsigned_abs() as u32;
        return match base.recip() {
            Some(recip) => Ok(recip.pow(count, budget)?),
            None => {
                let recip = opaque_power(&base, &Poly::constant(rational(-1)));
                Ok(recip.pow(count, budget)?)
            },
        };
    }

    if let Some(value) = base.as_constant() {
        if value.cmp0().is_eq() && exp_value.cmp0().is_gt() {
            return Ok(Poly::zero());
        }
        if let Some(root) = exact_square_root(&value).filter(|_| exp_value == rational((1, 2))) {
            return Ok(Poly::constant(root));
        }
    }

    Ok(opaque_power(&base, &exp))
}

/// Returns the square root of a non-negative rational whose numerator and denominator are both
/// perfect squares.
fn exact_square_root(value: &Rational) -> Option<Rational> {
    if value.cmp0().is_lt() || !value.numer().is_perfect_square() || !value.denom().is_perfect_square() {
        return None;
    }
    Some(Rational::from((value.numer().clone().sqrt(), value.denom().clone().sqrt())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgrade_parser::{parse_statement, Clause};
    use pretty_assertions::assert_eq;

    fn simplified(source: &str) -> Result<Poly, SimplifyError> {
        let statement = parse_statement(source).unwrap();
        let Some(Clause::Expr(expr)) = statement.clauses.into_iter().next() else {
            panic!("expected an expression");
        };
        simplify(&Expr::from(expr), &mut Budget::unlimited())
    }

    fn same(a: &str, b: &str) {
        assert_eq!(simplified(a).unwrap(), simplified(b).unwrap(), "{} vs {}", a, b);
    }

    #[test]
    fn expands_products() {
        same("(x-2)(x-3)", "x^2-5x+6");
        same("(x+1)^2", "x^2+2x+1");
        same("2(a+b)", "2a+2b");
    }

    #[test]
    fn collects_like_terms() {
        same("x+x+x", "3x");
        same("x*x", "x^2");
        same("x^2*x^3", "x^5");
    }

    #[test]
    fn commutativity() {
        same("x^2+3*x", "3x+x^2");
        same("y*x", "x*y");
    }

    #[test]
    fn rational_arithmetic() {
        same("1/2+1/3", "5/6");
        same("0.5x", "x/2");
        same("x/x", "1");
    }

    #[test]
    fn simplifies_inside_calls() {
        same("sin(2x+x)", "sin(3x)");
        same("sqrt(16)", "4");
        same("sqrt(9/4)", "1.5");
        same("abs(-3)", "3");
    }

    #[test]
    fn different_expressions_stay_different() {
        assert_ne!(simplified("x^2").unwrap(), simplified("2x").unwrap());
        assert_ne!(simplified("sqrt(x)^2").unwrap(), simplified("x^2").unwrap());
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(simplified("1/(x-x)"), Err(SimplifyError::DivisionByZero));
    }

    #[test]
    fn budget_is_enforced() {
        let statement = parse_statement("(x+y+z+w)^30").unwrap();
        let Some(Clause::Expr(expr)) = statement.clauses.into_iter().next() else {
            panic!("expected an expression");
        };
        let mut budget = Budget::new(20_000, None);
        assert_eq!(
            simplify(&Expr::from(expr), &mut budget),
            Err(SimplifyError::BudgetExceeded(BudgetExceeded)),
        );
    }
}
