//! Symbolic manipulation of expressions.
//!
//! Steps are converted to [`Expr`]s, then [`simplify`] brings an expression to a canonical
//! polynomial form ([`Poly`]), which is what makes `(x - 2)(x - 3)` and `x^2 - 5x + 6` compare
//! equal without sampling.

pub mod expr;
pub mod poly;
pub mod simplify;

pub use expr::{Expr, Primary};
pub use poly::{Atom, Monomial, Poly};
pub use simplify::{simplify, SimplifyError};
