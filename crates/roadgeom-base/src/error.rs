//! Numeric-core failure kinds (spec.md §4.1).

use thiserror::Error;

/// Failure modes of a [`crate::Range`]/[`crate::Function`] evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericError {
    /// the queried value fell outside the domain
    #[error("value {value} is out of domain {range}")]
    OutOfDomain {
        /// the queried value
        value: f64,
        /// a debug rendering of the offending domain
        range: String,
    },
    /// a coefficient or evaluated result was not finite
    #[error("non-finite value encountered: {context}")]
    NonFinite {
        /// where the non-finite value was produced
        context: String,
    },
    /// operands of a stacked/composite function did not share a domain
    #[error("inconsistent domain: {context}")]
    InconsistentDomain {
        /// description of the mismatch
        context: String,
    },
}
