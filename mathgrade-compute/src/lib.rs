//! Comparison of solution steps: symbolic simplification, numeric evaluation at sample points, and
//! the equivalence and intermediate-step checks built on them.
//!
//! ```
//! use mathgrade_compute::{equivalent, parse, EquivalenceOptions};
//!
//! let gold = parse("x^2 - 5x + 6 = 0").unwrap();
//! let student = parse("(x − 2)(x − 3) = 0").unwrap();
//! assert!(equivalent(&gold, &student, &EquivalenceOptions::default()));
//! ```

pub mod budget;
pub mod equivalence;
pub mod intermediate;
pub mod numerical;
pub mod parsed;
pub mod primitive;
pub mod statement;
pub mod symbolic;

pub use budget::{Budget, BudgetExceeded};
pub use equivalence::{Equivalence, EquivalenceOptions, Inconclusive};
pub use intermediate::is_intermediate_step;
pub use numerical::{evaluate, EvalError};
pub use parsed::{check_equivalence, equals_exact, equivalent, parse, ParseError, ParsedExpr};
pub use symbolic::{simplify, SimplifyError};
