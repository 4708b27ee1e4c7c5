use crate::{
    budget::{Budget, BudgetExceeded},
    primitive::{float, PRECISION},
    symbolic::expr::{Expr, Primary},
};
use rug::{float::Constant, ops::Pow, Float};
use std::collections::BTreeMap;

/// Values assigned to the free symbols of an expression.
pub type Assignment = BTreeMap<String, Float>;

/// Error returned when an expression cannot be evaluated at a point.
///
/// Apart from [`EvalError::BudgetExceeded`], these are domain errors: the expression is not
/// defined at the point, which says nothing about whether it equals another expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The result of the function or operator is not a real number, such as `sqrt(-1)`.
    #[error("`{0}` is not real-valued here")]
    NonReal(String),

    /// The result overflowed or is otherwise not finite.
    #[error("the result is not a finite number")]
    NonFinite,

    /// A symbol has no value in the assignment.
    #[error("no value was given for `{0}`")]
    UnboundSymbol(String),

    /// The function is not known.
    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    /// The evaluation ran out of budget.
    #[error(transparent)]
    BudgetExceeded(#[from] BudgetExceeded),
}

/// Checks that a computed value is a finite real number.
fn finite(value: Float, op: &str) -> Result<Float, EvalError> {
    if value.is_nan() {
        Err(EvalError::NonReal(op.to_owned()))
    } else if !value.is_finite() {
        Err(EvalError::NonFinite)
    } else {
        Ok(value)
    }
}

/// Evaluates an expression with the given values for its free symbols, using
/// [`PRECISION`]-bit floating point arithmetic.
pub fn evaluate(expr: &Expr, assignment: &Assignment, budget: &mut Budget) -> Result<Float, EvalError> {
    budget.tick()?;
    match expr {
        Expr::Primary(Primary::Number(n)) => Ok(float(n)),
        Expr::Primary(Primary::Symbol(name)) => match name.as_str() {
            "pi" => Ok(float(Constant::Pi)),
            name => assignment.get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundSymbol(name.to_owned())),
        },
        Expr::Primary(Primary::Call(name, args)) => {
            let args = args.iter()
                .map(|arg| evaluate(arg, assignment, budget))
                .collect::<Result<Vec<_>, _>>()?;
            call(name, args)
        },
        Expr::Add(terms) => {
            let mut sum = float(0);
            for term in terms {
                sum += evaluate(term, assignment, budget)?;
            }
            finite(sum, "+")
        },
        Expr::Mul(factors) => {
            let mut product = float(1);
            for factor in factors {
                product *= evaluate(factor, assignment, budget)?;
            }
            finite(product, "*")
        },
        Expr::Exp(base, exp) => {
            let base = evaluate(base, assignment, budget)?;
            let exp = evaluate(exp, assignment, budget)?;
            if base.is_zero() && exp.cmp0().is_some_and(|o| o.is_lt()) {
                return Err(EvalError::DivisionByZero);
            }
            if base.cmp0().is_some_and(|o| o.is_lt()) && !exp.is_integer() {
                return Err(EvalError::NonReal("^".to_owned()));
            }
            finite(base.pow(exp), "^")
        },
    }
}

/// Evaluates a function call with the given arguments.
fn call(name: &str, args: Vec<Float>) -> Result<Float, EvalError> {
    let non_real = || EvalError::NonReal(name.to_owned());
    let mut args = args.into_iter();
    let (Some(arg), rest) = (args.next(), args.next()) else {
        return Err(EvalError::UnknownFunction(name.to_owned()));
    };
    if args.next().is_some() {
        return Err(EvalError::UnknownFunction(name.to_owned()));
    }

    let value = match (name, rest) {
        ("sqrt", None) if arg < 0 => return Err(non_real()),
        ("sqrt", None) => arg.sqrt(),
        ("sin", None) => arg.sin(),
        ("cos", None) => arg.cos(),
        ("tan", None) => arg.tan(),
        ("exp", None) => arg.exp(),
        ("abs", None) => arg.abs(),
        ("ln", None) | ("log", None) if arg <= 0 => return Err(non_real()),
        ("ln", None) => arg.ln(),
        ("log", None) => arg.log10(),
        ("log", Some(base)) => {
            if arg <= 0 || base <= 0 {
                return Err(non_real());
            }
            if base == 1 {
                return Err(EvalError::DivisionByZero);
            }
            Float::with_val(PRECISION, arg.ln() / base.ln())
        },
        _ => return Err(EvalError::UnknownFunction(name.to_owned())),
    };
    finite(value, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::{
        afe_abs,
        afe_absolute_error_msg,
        afe_is_absolute_eq,
        assert_float_absolute_eq,
    };

    fn at(expr: Expr, x: f64) -> Result<f64, EvalError> {
        let assignment = Assignment::from([("x".to_owned(), float(x))]);
        evaluate(&expr, &assignment, &mut Budget::unlimited()).map(|v| v.to_f64())
    }

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn call(name: &str, arg: Expr) -> Expr {
        Expr::Primary(Primary::Call(name.to_owned(), vec![arg]))
    }

    #[test]
    fn polynomial() {
        let expr = Expr::Exp(Box::new(x()), Box::new(Expr::number(2))) + Expr::number(-5) * x() + Expr::number(6);
        assert_float_absolute_eq!(at(expr.clone(), 2.0).unwrap(), 0.0);
        assert_float_absolute_eq!(at(expr, 4.0).unwrap(), 2.0);
    }

    #[test]
    fn pi_and_functions() {
        assert_float_absolute_eq!(at(call("sin", Expr::symbol("pi")), 0.0).unwrap(), 0.0, 1e-12);
        assert_float_absolute_eq!(at(call("sqrt", x()), 2.25).unwrap(), 1.5);
        assert_float_absolute_eq!(at(call("ln", call("exp", x())), 0.75).unwrap(), 0.75, 1e-12);
    }

    #[test]
    fn domain_errors() {
        assert_eq!(at(call("sqrt", x()), -1.0), Err(EvalError::NonReal("sqrt".to_owned())));
        assert_eq!(at(call("ln", x()), 0.0), Err(EvalError::NonReal("ln".to_owned())));
        let recip = Expr::Exp(Box::new(x()), Box::new(Expr::number(-1)));
        assert_eq!(at(recip, 0.0), Err(EvalError::DivisionByZero));
        let root = Expr::Exp(Box::new(x()), Box::new(Expr::number((1, 2))));
        assert_eq!(at(root, -4.0), Err(EvalError::NonReal("^".to_owned())));
    }

    #[test]
    fn unbound_symbol() {
        assert_eq!(at(Expr::symbol("y"), 1.0), Err(EvalError::UnboundSymbol("y".to_owned())));
    }
}
