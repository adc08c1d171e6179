//! Error types for annealing runs.

use thiserror::Error;

/// Errors surfaced by the annealing state machine and runner.
///
/// Numerical divergence is reported through [`AnnealError::NanAssignments`]
/// at the end of the fixed point iteration that produced it; the failing
/// result is never committed to the annealing state, so the caller can
/// recover by reheating and adjusting the cooling ratio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnealError {
    /// A fixed point iteration produced NaN assignment expectations.
    ///
    /// Typically caused by cooling too aggressively, or by assignment
    /// entries drifting onto the closed endpoints of (0, 1).
    #[error("NaN in computed assignment expectations at temperature {temperature:e}")]
    NanAssignments {
        /// Temperature at which the iteration diverged.
        temperature: f64,
    },

    /// The cooling ratio is outside the open interval (0, 1).
    #[error("cooling ratio must be in (0, 1), got {ratio}")]
    InvalidRatio {
        /// The offending ratio.
        ratio: f64,
    },

    /// A runner configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_ratio() {
        let err = AnnealError::InvalidRatio { ratio: 1.5 };
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_nan_error_carries_temperature() {
        let err = AnnealError::NanAssignments { temperature: 0.25 };
        match err {
            AnnealError::NanAssignments { temperature } => {
                assert!((temperature - 0.25).abs() < 1e-15)
            }
            _ => unreachable!(),
        }
    }
}
