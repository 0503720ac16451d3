//! Structured error types for signal computation.
//!
//! Every error is a local validation failure raised before any output is
//! produced. Nothing here is retryable: the engine is a pure function over
//! fixed input.

use thiserror::Error;

/// Errors raised by the return, slope, crossover and engine stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// Series too short, non-positive price, out-of-order dates, bad thresholds.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Target and benchmark cannot be aligned on a common date index.
    #[error("alignment error: {reason}")]
    Alignment { reason: String },
}

impl SignalError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn alignment(reason: impl Into<String>) -> Self {
        Self::Alignment {
            reason: reason.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    pub fn is_alignment(&self) -> bool {
        matches!(self, Self::Alignment { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let err = SignalError::invalid_input("need at least 2 prices, got 1");
        assert_eq!(err.to_string(), "invalid input: need at least 2 prices, got 1");

        let err = SignalError::alignment("length mismatch: 5 vs 4");
        assert_eq!(err.to_string(), "alignment error: length mismatch: 5 vs 4");
    }

    #[test]
    fn kind_predicates() {
        assert!(SignalError::invalid_input("x").is_invalid_input());
        assert!(!SignalError::invalid_input("x").is_alignment());
        assert!(SignalError::alignment("x").is_alignment());
    }
}
