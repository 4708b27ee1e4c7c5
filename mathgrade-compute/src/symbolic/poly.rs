//! Canonical polynomial form of expressions.
//!
//! A [`Poly`] is a sum of [`Monomial`]s with exact rational coefficients. Each monomial is a
//! product of [`Atom`]s raised to integer powers. Anything that is not a polynomial in the
//! variables, such as `sin(x)` or `(x + 1)^(1/2)`, becomes an atom of its own, so `sin(x)^2` is
//! a monomial in the atom `sin(x)`.
//!
//! Two polynomials in this form are equal exactly when their term maps are equal.

use crate::{budget::{Budget, BudgetExceeded}, primitive::rational, symbolic::expr::{Expr, Primary}};
use rug::Rational;
use std::{cmp::Ordering, collections::BTreeMap, fmt};

/// An irreducible factor of a monomial, identified by its printed form.
#[derive(Debug, Clone)]
pub struct Atom {
    key: String,
    expr: Expr,
}

impl Atom {
    /// Creates an atom from an expression that has already been simplified.
    pub fn new(expr: Expr) -> Self {
        Self {
            key: expr.to_string(),
            expr,
        }
    }

    /// Creates an atom for a variable or constant.
    #[cfg(test)]
    pub fn symbol(name: &str) -> Self {
        Self::new(Expr::symbol(name))
    }

    /// Returns the expression this atom stands for.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Returns the printed form of the atom.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Atom {}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// A product of atoms raised to nonzero integer powers. The empty product is `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Monomial(BTreeMap<Atom, i64>);

impl Monomial {
    /// The monomial `1`.
    pub fn one() -> Self {
        Self::default()
    }

    /// The monomial `atom^1`.
    pub fn atom(atom: Atom) -> Self {
        Self(BTreeMap::from([(atom, 1)]))
    }

    /// Returns true if this is the monomial `1`.
    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the atoms of the monomial with their exponents.
    pub fn atoms(&self) -> impl Iterator<Item = (&Atom, i64)> {
        self.0.iter().map(|(atom, exp)| (atom, *exp))
    }

    /// Multiplies two monomials, adding the exponents of shared atoms.
    pub fn mul(&self, other: &Self) -> Self {
        let mut product = self.0.clone();
        for (atom, exp) in &other.0 {
            let entry = product.entry(atom.clone()).or_insert(0);
            *entry += exp;
            if *entry == 0 {
                product.remove(atom);
            }
        }
        Self(product)
    }

    /// Returns the reciprocal of the monomial.
    pub fn recip(&self) -> Self {
        Self(self.0.iter().map(|(atom, exp)| (atom.clone(), -exp)).collect())
    }
}

/// A sum of monomials with nonzero rational coefficients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Poly {
    terms: BTreeMap<Monomial, Rational>,
}

impl Poly {
    /// The polynomial `0`.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant polynomial.
    pub fn constant(value: Rational) -> Self {
        let mut poly = Self::zero();
        poly.add_term(Monomial::one(), value);
        poly
    }

    /// The polynomial consisting of a single atom.
    pub fn atom(atom: Atom) -> Self {
        let mut poly = Self::zero();
        poly.add_term(Monomial::atom(atom), rational(1));
        poly
    }

    /// Returns true if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns the terms of the polynomial, ordered by monomial.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational)> {
        self.terms.iter()
    }

    /// If the polynomial is constant, returns its value.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(rational(0)),
            1 => self.terms.get(&Monomial::one()).cloned(),
            _ => None,
        }
    }

    /// Returns the coefficient of the given monomial, if it appears.
    pub fn coefficient(&self, monomial: &Monomial) -> Option<&Rational> {
        self.terms.get(monomial)
    }

    /// If the polynomial is `c1 * v + c0` for a single atom `v` with `c1` nonzero, returns `v`
    /// and the root `-c0 / c1`.
    pub fn linear_root(&self) -> Option<(&Atom, Rational)> {
        if self.len() > 2 {
            return None;
        }

        let mut linear = None;
        let mut constant = rational(0);
        for (monomial, coefficient) in self.terms() {
            if monomial.is_one() {
                constant = coefficient.clone();
                continue;
            }
            let mut atoms = monomial.atoms();
            match (atoms.next(), atoms.next()) {
                (Some((atom, 1)), None) if linear.is_none() => linear = Some((atom, coefficient)),
                _ => return None,
            }
        }

        let (atom, coefficient) = linear?;
        Some((atom, -constant / coefficient))
    }

    /// Returns the first term in monomial order.
    pub fn leading_term(&self) -> Option<(&Monomial, &Rational)> {
        self.terms.first_key_value()
    }

    /// Adds `coefficient * monomial` to the polynomial.
    pub fn add_term(&mut self, monomial: Monomial, coefficient: Rational) {
        if coefficient.cmp0().is_eq() {
            return;
        }
        match self.terms.get_mut(&monomial) {
            Some(existing) => {
                *existing += coefficient;
                if existing.cmp0().is_eq() {
                    self.terms.remove(&monomial);
                }
            },
            None => {
                self.terms.insert(monomial, coefficient);
            },
        }
    }

    /// Adds another polynomial to this one.
    pub fn add(&mut self, other: &Self) {
        for (monomial, coefficient) in &other.terms {
            self.add_term(monomial.clone(), coefficient.clone());
        }
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scaled(&self, factor: &Rational) -> Self {
        let mut poly = Self::zero();
        for (monomial, coefficient) in &self.terms {
            poly.add_term(monomial.clone(), rational(coefficient * factor));
        }
        poly
    }

    /// Multiplies two polynomials, spending one step of the budget per pair of terms.
    pub fn mul(&self, other: &Self, budget: &mut Budget) -> Result<Self, BudgetExceeded> {
        let mut product = Self::zero();
        for (lhs_mono, lhs_coeff) in &self.terms {
            for (rhs_mono, rhs_coeff) in &other.terms {
                budget.tick()?;
                product.add_term(lhs_mono.mul(rhs_mono), rational(lhs_coeff * rhs_coeff));
            }
        }
        Ok(product)
    }

    /// Raises the polynomial to a non-negative integer power by repeated multiplication.
    pub fn pow(&self, exp: u32, budget: &mut Budget) -> Result<Self, BudgetExceeded> {
        let mut result = Self::constant(rational(1));
        for _ in 0..exp {
            result = result.mul(self, budget)?;
        }
        Ok(result)
    }

    /// Returns the reciprocal of a single-term polynomial. Returns [`None`] for zero and for
    /// polynomials with more than one term, which have no polynomial reciprocal.
    pub fn recip(&self) -> Option<Self> {
        let mut terms = self.terms.iter();
        match (terms.next(), terms.next()) {
            (Some((monomial, coefficient)), None) => {
                let mut poly = Self::zero();
                poly.add_term(monomial.recip(), coefficient.clone().recip());
                Some(poly)
            },
            _ => None,
        }
    }

    /// Converts the polynomial back to an expression.
    pub fn to_expr(&self) -> Expr {
        let terms = self.terms.iter()
            .map(|(monomial, coefficient)| {
                let mut factors = Vec::new();
                if monomial.is_one() || *coefficient != 1 {
                    factors.push(Expr::Primary(Primary::Number(coefficient.clone())));
                }
                for (atom, exp) in monomial.atoms() {
                    if exp == 1 {
                        factors.push(atom.expr().clone());
                    } else {
                        factors.push(Expr::Exp(Box::new(atom.expr().clone()), Box::new(Expr::number(exp))));
                    }
                }
                Expr::Mul(factors).downgrade()
            })
            .collect();
        Expr::Add(terms).downgrade()
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_expr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn x() -> Poly {
        Poly::atom(Atom::symbol("x"))
    }

    #[test]
    fn cancellation() {
        let mut poly = x();
        poly.add(&x().scaled(&rational(-1)));
        assert!(poly.is_zero());
        assert_eq!(poly.as_constant(), Some(rational(0)));
    }

    #[test]
    fn binomial_square() {
        let mut budget = Budget::unlimited();
        let mut binomial = x();
        binomial.add(&Poly::constant(rational(1)));
        let square = binomial.pow(2, &mut budget).unwrap();
        assert_eq!(square.len(), 3);
        assert_eq!(square.to_string(), "1 + 2 * x + x^2");
    }

    #[test]
    fn linear_roots() {
        let mut line = x().scaled(&rational(2));
        line.add(&Poly::constant(rational(-3)));
        let (atom, root) = line.linear_root().unwrap();
        assert_eq!(atom.key(), "x");
        assert_eq!(root, rational((3, 2)));

        assert_eq!(x().linear_root().map(|(_, root)| root), Some(rational(0)));
        assert_eq!(Poly::constant(rational(4)).linear_root(), None);

        let mut budget = Budget::unlimited();
        assert_eq!(x().pow(2, &mut budget).unwrap().linear_root(), None);
        let mut two_vars = x();
        two_vars.add(&Poly::atom(Atom::symbol("y")));
        assert_eq!(two_vars.linear_root(), None);
        let mut with_root = x();
        with_root.add(&Poly::atom(Atom::new(Expr::Primary(Primary::Call("sqrt".to_owned(), vec![Expr::number(2)])))));
        assert_eq!(with_root.linear_root(), None);
    }

    #[test]
    fn reciprocal_of_monomial() {
        let term = x().scaled(&rational(4));
        assert_eq!(term.recip().unwrap().to_string(), "1/4 * x^(-1)");
        assert_eq!(Poly::zero().recip(), None);
    }

    #[test]
    fn multiplication_respects_budget() {
        let mut budget = Budget::new(3, None);
        let mut binomial = x();
        binomial.add(&Poly::constant(rational(1)));
        assert_eq!(binomial.mul(&binomial, &mut budget), Err(BudgetExceeded));
    }
}
