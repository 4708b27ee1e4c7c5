//! Heuristic recognition of valid intermediate work.
//!
//! A student often writes a step that is not in the rubric but clearly sits between two gold
//! steps. [`is_intermediate_step`] recognizes a few common shapes of such work. It is a heuristic:
//! it accepts some steps that are not strictly derivations, and rejects some that are.

use crate::{
    equivalence::{check_clauses, check_statements, EquivalenceOptions},
    parsed::{equivalent, ParsedExpr},
    statement::{Clause, Equation, Statement},
    symbolic::{Expr, Primary},
};
use tracing::debug;

/// Minimum node count for a sum or call to count as non-trivial structure.
const MIN_SUM_NODES: usize = 3;

/// Minimum node count for a product or power to count as non-trivial structure.
const MIN_PRODUCT_NODES: usize = 5;

/// Returns true if `candidate` looks like valid work between `from` (the previous gold step, if
/// any) and `to` (the gold step being worked towards).
///
/// The candidate is never intermediate if it is textually identical or equivalent to `to`, or
/// equivalent to `from`. Otherwise it is intermediate when any of these hold:
///
/// - it is a partial solution: `to` lists several clauses, and each clause of the candidate is
///   equivalent to a distinct clause of `to`;
/// - it is a product set to zero, `P*Q*... = 0`, whose split `P = 0 or Q = 0 ...` is equivalent to
///   `to`;
/// - it has as many clauses as `to`, and shares a non-trivial subexpression with `to` that does
///   not already occur in `from`.
pub fn is_intermediate_step(
    candidate: &ParsedExpr,
    from: Option<&ParsedExpr>,
    to: &ParsedExpr,
    options: &EquivalenceOptions,
) -> bool {
    if candidate.normalized() == to.normalized() || equivalent(candidate, to, options) {
        return false;
    }
    if from.is_some_and(|from| equivalent(candidate, from, options)) {
        return false;
    }

    let (candidate, to) = (candidate.statement(), to.statement());
    if partial_solution(candidate, to, options) {
        debug!(%candidate, %to, "partial solution");
        true
    } else if zero_product_split(candidate, to, options) {
        debug!(%candidate, %to, "zero-product split");
        true
    } else if shares_new_structure(candidate, from.map(ParsedExpr::statement), to) {
        debug!(%candidate, %to, "shared structure");
        true
    } else {
        false
    }
}

/// Each clause of the candidate is equivalent to a distinct clause of `to`, which has more
/// clauses.
fn partial_solution(candidate: &Statement, to: &Statement, options: &EquivalenceOptions) -> bool {
    if candidate.clauses.len() >= to.clauses.len() {
        return false;
    }

    let mut used = vec![false; to.clauses.len()];
    candidate.clauses.iter().all(|clause| {
        let found = to.clauses.iter()
            .enumerate()
            .position(|(i, target)| !used[i] && check_clauses(clause, target, options).holds());
        match found {
            Some(i) => {
                used[i] = true;
                true
            },
            None => false,
        }
    })
}

/// The candidate is `P*Q*... = 0` and `P = 0 or Q = 0 ...` is equivalent to `to`.
fn zero_product_split(candidate: &Statement, to: &Statement, options: &EquivalenceOptions) -> bool {
    let Some(equation) = candidate.as_equation() else {
        return false;
    };
    let product = match (equation.lhs.is_zero(), equation.rhs.is_zero()) {
        (false, true) => &equation.lhs,
        (true, false) => &equation.rhs,
        _ => return false,
    };
    let Expr::Mul(factors) = product else {
        return false;
    };

    let clauses = factors.iter()
        .filter(|factor| !factor.free_symbols().is_empty())
        .map(|factor| match factor {
            Expr::Exp(base, exp) if exp.as_number().is_some_and(|n| n.cmp0().is_gt()) => (**base).clone(),
            factor => factor.clone(),
        })
        .map(|factor| Clause::Equation(Equation { lhs: factor, rhs: Expr::number(0) }))
        .collect::<Vec<_>>();
    if clauses.len() < 2 {
        return false;
    }

    check_statements(&Statement { clauses }, to, options).holds()
}

/// Returns true if the expression is large enough to be evidence of shared work.
fn is_notable(expr: &Expr) -> bool {
    match expr {
        Expr::Add(_) | Expr::Primary(Primary::Call(..)) => expr.node_count() >= MIN_SUM_NODES,
        Expr::Mul(_) | Expr::Exp(..) => expr.node_count() >= MIN_PRODUCT_NODES,
        Expr::Primary(_) => false,
    }
}

/// Returns every notable subexpression of the statement.
fn notable_subexpressions(statement: &Statement) -> Vec<&Expr> {
    statement.clauses.iter()
        .flat_map(Clause::sides)
        .flat_map(Expr::post_order_iter)
        .filter(|expr| is_notable(expr))
        .collect()
}

/// The candidate has as many clauses as `to`, and they share a notable subexpression that `from`
/// does not contain.
fn shares_new_structure(candidate: &Statement, from: Option<&Statement>, to: &Statement) -> bool {
    if candidate.clauses.len() != to.clauses.len() {
        return false;
    }

    let target = notable_subexpressions(to);
    let previous = from.map(notable_subexpressions).unwrap_or_default();
    notable_subexpressions(candidate)
        .into_iter()
        .any(|expr| target.contains(&expr) && !previous.contains(&expr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed::parse;

    fn intermediate(candidate: &str, from: Option<&str>, to: &str) -> bool {
        let candidate = parse(candidate).unwrap();
        let from = from.map(|from| parse(from).unwrap());
        let to = parse(to).unwrap();
        is_intermediate_step(&candidate, from.as_ref(), &to, &EquivalenceOptions::default())
    }

    #[test]
    fn partial_solution_counts() {
        assert!(intermediate("x = 2", Some("(x-2)(x-3) = 0"), "x = 2 or x = 3"));
        assert!(!intermediate("x = 4", Some("(x-2)(x-3) = 0"), "x = 2 or x = 3"));
    }

    #[test]
    fn zero_product_split_counts() {
        assert!(intermediate("(x-2)(x-3) = 0", Some("x^2 - 5x + 6"), "x - 2 = 0 or x - 3 = 0"));
        assert!(intermediate("(x-2)(x-3) = 0", None, "x = 2 or x = 3"));
    }

    #[test]
    fn shared_structure_counts() {
        // completing the square, with a slip in the constant
        assert!(intermediate("(x-3)^2 = 5", Some("x^2 - 6x + 5 = 0"), "(x-3)^2 = 4"));
    }

    #[test]
    fn structure_already_in_from_does_not_count() {
        assert!(!intermediate("2(x+1) = 8", Some("x + 1 = 3"), "x + 1 = 3.5"));
    }

    #[test]
    fn equivalent_steps_are_not_intermediate() {
        assert!(!intermediate("x^2 - 5x + 6 = 0", None, "x^2 + 6 = 5x"));
        assert!(!intermediate("x^2 - 5x + 6 = 0", Some("x^2 + 6 = 5x"), "(x-2)(x-3) = 0"));
    }

    #[test]
    fn unrelated_steps_are_not_intermediate() {
        assert!(!intermediate("y = 7", Some("x^2 - 5x + 6 = 0"), "x = 2 or x = 3"));
    }
}
