//! Error types
//!
//! Library operations fail with one of three kinds of error. None of them is
//! retryable: generation and extraction are pure computations, so an error is
//! terminal for the operation that raised it and leaves no shared state behind.
//!
//! - **Configuration**: invalid or missing distribution parameters, `p_irm`
//!   outside `[0, 1]`, empty or non-positive weight vectors. Raised before any
//!   sampling happens.
//! - **DegenerateInput**: an input trace that cannot support the requested
//!   statistic (empty trace, no finite inter-reference distances).
//! - **NumericGuard**: a division by zero or non-finite intermediate in a
//!   mean/ratio/normalization path.

use thiserror::Error;

/// Errors raised by trace generation and model extraction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid or missing model parameters
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input trace too small or too uniform for the requested statistic
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Zero denominator or non-finite value in a numeric path
    #[error("numeric guard: {0}")]
    NumericGuard(String),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    pub(crate) fn numeric(msg: impl Into<String>) -> Self {
        Self::NumericGuard(msg.into())
    }

    /// True for configuration errors
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// True for degenerate-input errors
    pub fn is_degenerate_input(&self) -> bool {
        matches!(self, Self::DegenerateInput(_))
    }
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Divide, failing instead of producing `inf`/`NaN`
pub(crate) fn checked_ratio(num: f64, den: f64, what: &str) -> Result<f64> {
    if den == 0.0 || !den.is_finite() || !num.is_finite() {
        return Err(Error::numeric(format!(
            "cannot compute {}: {} / {}",
            what, num, den
        )));
    }
    Ok(num / den)
}
