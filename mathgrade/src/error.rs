//! Errors raised while setting up a [`Grader`](crate::Grader).
//!
//! Grading itself never fails: problems with individual student steps become feedback on the
//! affected steps instead.

/// An invalid rubric or grader configuration. Only raised before any student work is graded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// The rubric has neither steps nor a final answer.
    #[error("the rubric has no steps")]
    EmptyRubric,

    /// A step has no content.
    #[error("step {order} has no content")]
    EmptyContent { order: u32 },

    /// A step has negative, infinite or NaN points.
    #[error("step {order} is worth {points} points, but points must be finite and non-negative")]
    InvalidPoints { order: u32, points: f64 },

    /// A step has order `0`.
    #[error("step `{content}` has order 0, but orders start at 1")]
    ZeroOrder { content: String },

    /// Two steps share an order.
    #[error("order {order} is used by more than one step")]
    DuplicateOrder { order: u32 },

    /// A step's order is lower than the order of the step before it.
    #[error("step order {order} comes after order {previous}, but orders must increase")]
    NonIncreasingOrder { previous: u32, order: u32 },

    /// The rubric is worth nothing.
    #[error("the rubric is worth {total} points in total, but it must be worth more than 0")]
    NonPositiveTotal { total: f64 },

    /// A gold step is not recognizable mathematics.
    #[error("step {order} `{content}` could not be parsed: {message}")]
    UnparseableStep {
        order: u32,
        content: String,
        message: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}
