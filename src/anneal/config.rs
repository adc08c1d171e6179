//! Annealing schedule configuration.

use crate::error::AnnealError;

/// Configuration for a complete annealing run driven by
/// [`AnnealRunner`].
///
/// # Examples
///
/// ```
/// use detanneal::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_ratio(0.85)
///     .with_stages(30)
///     .with_tolerance(1e-8)
///     .with_seed(42);
/// assert_eq!(config.stages, 30);
/// ```
///
/// [`AnnealRunner`]: super::AnnealRunner
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Temperature ratio applied at each cooling stage, in (0, 1).
    pub ratio: f64,

    /// Number of cooling stages.
    pub stages: usize,

    /// Maximum fixed point iterations within one temperature stage.
    ///
    /// A stage normally ends earlier, when consecutive assignment
    /// matrices differ by less than `tolerance`.
    pub max_iterations_per_stage: usize,

    /// Convergence tolerance: maximum absolute entrywise change between
    /// consecutive assignment matrices.
    pub tolerance: f64,

    /// Maximum number of reheat-and-retry recoveries after numerical
    /// divergence before the run gives up.
    pub max_reheats: usize,

    /// Random seed for the initial assignments (None for random).
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            ratio: 0.73,
            stages: 20,
            max_iterations_per_stage: 100,
            tolerance: 1e-6,
            max_reheats: 5,
            seed: None,
        }
    }
}

impl AnnealConfig {
    /// Sets the cooling ratio.
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Sets the number of cooling stages.
    pub fn with_stages(mut self, stages: usize) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the per-stage iteration cap.
    pub fn with_max_iterations_per_stage(mut self, n: usize) -> Self {
        self.max_iterations_per_stage = n;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the divergence-recovery budget.
    pub fn with_max_reheats(mut self, n: usize) -> Self {
        self.max_reheats = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AnnealError> {
        if !(self.ratio > 0.0 && self.ratio < 1.0) {
            return Err(AnnealError::InvalidRatio { ratio: self.ratio });
        }
        if self.stages == 0 {
            return Err(AnnealError::InvalidConfig(
                "stages must be at least 1".into(),
            ));
        }
        if self.max_iterations_per_stage == 0 {
            return Err(AnnealError::InvalidConfig(
                "max_iterations_per_stage must be at least 1".into(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(AnnealError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealConfig::default();
        assert!((config.ratio - 0.73).abs() < 1e-12);
        assert_eq!(config.stages, 20);
        assert_eq!(config.max_iterations_per_stage, 100);
        assert!((config.tolerance - 1e-6).abs() < 1e-18);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(AnnealConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_ratio() {
        for ratio in [0.0, 1.0, -0.1, 3.0] {
            let config = AnnealConfig::default().with_ratio(ratio);
            assert_eq!(
                config.validate().unwrap_err(),
                AnnealError::InvalidRatio { ratio }
            );
        }
    }

    #[test]
    fn test_validate_zero_stages() {
        let config = AnnealConfig::default().with_stages(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_tolerance() {
        let config = AnnealConfig::default().with_tolerance(0.0);
        assert!(config.validate().is_err());
        let config = AnnealConfig::default().with_tolerance(f64::NAN);
        assert!(config.validate().is_err());
    }
}
