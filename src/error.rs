// src/error.rs
// Error kinds shared by every computation path. Each variant carries the offending value
// so a failed run can be diagnosed from the message alone.

use thiserror::Error;

/// Failure of a pendulum computation. Nothing is retried or clamped: the error aborts
/// the series being produced and travels straight back to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PendulumError {
    /// A precondition on a caller-supplied value was violated.
    #[error("invalid argument `{name}`: {value}")]
    InvalidArgument { name: &'static str, value: f64 },

    /// A special-function or series evaluation is undefined for the given input.
    #[error("{what} is undefined for {value}")]
    DomainError { what: &'static str, value: f64 },

    /// A computation produced a non-finite value or failed to converge.
    #[error("numerical failure in {context}: {value}")]
    NumericalError { context: &'static str, value: f64 },

    /// The comparison chart could not be drawn or encoded.
    #[error("render failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PendulumError>;

impl PendulumError {
    pub(crate) fn invalid(name: &'static str, value: f64) -> Self {
        PendulumError::InvalidArgument { name, value }
    }

    pub(crate) fn domain(what: &'static str, value: f64) -> Self {
        PendulumError::DomainError { what, value }
    }

    pub(crate) fn numerical(context: &'static str, value: f64) -> Self {
        PendulumError::NumericalError { context, value }
    }
}

/// Returns `value` when finite, otherwise a `NumericalError` tagged with `context`.
pub(crate) fn finite(context: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PendulumError::numerical(context, value))
    }
}
