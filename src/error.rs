//! Error taxonomy shared by every engine operation
//!
//! Errors are returned as values; no engine function panics on bad numeric
//! input and none retries on its own.

use thiserror::Error;

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Failure modes of the simulation engine
///
/// # Variants
/// - `InvalidInput`: a field failed its range check before any work started
/// - `NonConvergent`: a numerical solve could not bracket or reach a root
/// - `Divergent`: a simulation cannot reach its terminal state in the horizon
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// A field is out of range (non-positive principal, negative rate, ...)
    #[error("Invalid input: {field} {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// Root finding failed and no fallback value is available
    #[error("Solver did not converge: {reason}")]
    NonConvergent {
        /// Description of the failure
        reason: String,
    },

    /// Terminal condition not reachable within the time horizon
    #[error("Simulation diverges: {reason}")]
    Divergent {
        /// Human-readable reason, naming the debt or goal involved
        reason: String,
    },
}

impl EngineError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn non_convergent(reason: impl Into<String>) -> Self {
        EngineError::NonConvergent {
            reason: reason.into(),
        }
    }

    pub fn divergent(reason: impl Into<String>) -> Self {
        EngineError::Divergent {
            reason: reason.into(),
        }
    }

    /// Short machine-friendly tag for the variant
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { .. } => "invalid_input",
            EngineError::NonConvergent { .. } => "non_convergent",
            EngineError::Divergent { .. } => "divergent",
        }
    }
}

/// Require a finite value strictly greater than zero
pub(crate) fn ensure_positive(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::invalid(field, format!("must be > 0 (got {})", value)));
    }
    Ok(())
}

/// Require a finite value greater than or equal to zero
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::invalid(field, format!("must be >= 0 (got {})", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::invalid("principal", "must be > 0 (got -1)");
        assert_eq!(err.to_string(), "Invalid input: principal must be > 0 (got -1)");
        assert_eq!(err.kind(), "invalid_input");

        let err = EngineError::divergent("exceeds time horizon");
        assert!(err.to_string().contains("exceeds time horizon"));
        assert_eq!(err.kind(), "divergent");
    }

    #[test]
    fn test_range_checks() {
        assert!(ensure_positive("x", 1.0).is_ok());
        assert!(ensure_positive("x", 0.0).is_err());
        assert!(ensure_positive("x", f64::NAN).is_err());
        assert!(ensure_non_negative("x", 0.0).is_ok());
        assert!(ensure_non_negative("x", -0.01).is_err());
        assert!(ensure_non_negative("x", f64::INFINITY).is_err());
    }
}
