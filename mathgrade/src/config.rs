use crate::error::ConfigurationError;
use mathgrade_compute::EquivalenceOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Settings for a [`Grader`](crate::Grader).
///
/// ```
/// use mathgrade::GraderConfig;
///
/// let config = GraderConfig::builder()
///     .tolerance(1e-4)
///     .partial_credit(0.25)
///     .build();
/// assert_eq!(config.lookahead, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
#[builder(doc)]
pub struct GraderConfig {
    /// Numeric tolerance for equivalence. Constant answers must differ by at most this much.
    #[builder(default = 1e-6)]
    pub tolerance: f64,

    /// Fraction of a step's points awarded for intermediate work only.
    #[builder(default = 0.5)]
    pub partial_credit: f64,

    /// Fraction of a step's points that steps after a missing required step are capped at.
    #[builder(default = 0.5)]
    pub gating_cap: f64,

    /// How many gold steps ahead the matcher looks to recover from an omitted step.
    #[builder(default = 2)]
    pub lookahead: usize,

    /// Sample points used by the numeric equivalence fallback.
    #[builder(default = 7)]
    pub samples: usize,

    /// Seed for the sample points.
    #[builder(default = 0x5EED_CAFE)]
    pub seed: u64,

    /// Effort budget of a single equivalence check.
    #[builder(default = 20_000)]
    pub step_budget: usize,

    /// Optional wall-clock limit of a single equivalence check, in milliseconds.
    #[builder(default, setter(strip_option))]
    pub time_limit_ms: Option<u64>,

    /// Whether a final answer written out of order can still be credited.
    #[builder(default = true)]
    pub final_answer_anywhere: bool,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GraderConfig {
    /// Returns the default configuration with the given tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self::builder().tolerance(tolerance).build()
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |field, reason| Err(ConfigurationError::InvalidConfig { field, reason });

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return invalid("tolerance", "must be finite and non-negative");
        }
        if !(0.0..=1.0).contains(&self.partial_credit) {
            return invalid("partial_credit", "must be between 0 and 1");
        }
        if !(0.0..=1.0).contains(&self.gating_cap) {
            return invalid("gating_cap", "must be between 0 and 1");
        }
        if self.samples == 0 {
            return invalid("samples", "must be at least 1");
        }
        if self.step_budget == 0 {
            return invalid("step_budget", "must be at least 1");
        }
        Ok(())
    }

    /// Returns the options for equivalence checks.
    pub fn equivalence_options(&self) -> EquivalenceOptions {
        EquivalenceOptions {
            tolerance: self.tolerance,
            samples: self.samples,
            seed: self.seed,
            step_budget: self.step_budget,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = GraderConfig::default();
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.partial_credit, 0.5);
        assert_eq!(config.gating_cap, 0.5);
        assert_eq!(config.samples, 7);
        assert_eq!(config.time_limit_ms, None);
        assert!(config.final_answer_anywhere);
        assert_eq!(config.equivalence_options(), EquivalenceOptions::default());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: GraderConfig = serde_json::from_str(r#"{ "tolerance": 0.0001, "time_limit_ms": 50 }"#).unwrap();
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.lookahead, 2);
        assert_eq!(config.equivalence_options().time_limit, Some(Duration::from_millis(50)));
    }

    #[test]
    fn out_of_range_values() {
        let config = GraderConfig::builder().partial_credit(1.5).build();
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::InvalidConfig { field: "partial_credit", reason: "must be between 0 and 1" }),
        );
        assert!(GraderConfig::with_tolerance(f64::NAN).validate().is_err());
        assert!(GraderConfig::builder().samples(0).build().validate().is_err());
        assert!(GraderConfig::default().validate().is_ok());
    }
}
