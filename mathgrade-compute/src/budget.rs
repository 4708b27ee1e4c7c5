//! Limits on the effort a single check may spend.

use std::time::{Duration, Instant};

/// The deadline is only consulted once every this many steps.
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// Error returned when a [`Budget`] runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the effort budget for this check was exhausted")]
pub struct BudgetExceeded;

/// A countdown of simplification and evaluation steps, with an optional wall-clock deadline.
///
/// Every recursive step of [`simplify`](crate::symbolic::simplify) and
/// [`evaluate`](crate::numerical::evaluate) calls [`Budget::tick`], so a pathological input such
/// as `(x + y + z)^30` stops with [`BudgetExceeded`] instead of running unbounded.
#[derive(Debug, Clone)]
pub struct Budget {
    remaining: usize,
    deadline: Option<Instant>,
    ticks: usize,
}

impl Budget {
    /// Creates a budget of the given number of steps, optionally limited in time as well.
    pub fn new(steps: usize, time_limit: Option<Duration>) -> Self {
        Self {
            remaining: steps,
            deadline: time_limit.map(|limit| Instant::now() + limit),
            ticks: 0,
        }
    }

    /// Creates a budget that never runs out.
    pub fn unlimited() -> Self {
        Self::new(usize::MAX, None)
    }

    /// Returns the number of steps left.
    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Spends one step.
    pub fn tick(&mut self) -> Result<(), BudgetExceeded> {
        if self.remaining == 0 {
            return Err(BudgetExceeded);
        }
        self.remaining -= 1;
        self.ticks += 1;

        if self.ticks % DEADLINE_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
        {
            self.remaining = 0;
            return Err(BudgetExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_out() {
        let mut budget = Budget::new(2, None);
        assert_eq!(budget.tick(), Ok(()));
        assert_eq!(budget.tick(), Ok(()));
        assert_eq!(budget.tick(), Err(BudgetExceeded));
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn expired_deadline() {
        let mut budget = Budget::new(usize::MAX, Some(Duration::ZERO));
        let result = (0..DEADLINE_CHECK_INTERVAL).try_for_each(|_| budget.tick());
        assert_eq!(result, Err(BudgetExceeded));
    }
}
