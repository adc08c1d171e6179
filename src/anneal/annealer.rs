//! Annealing state machine: stepping, cooling, and reheating.

use crate::error::AnnealError;
use ndarray::{Array2, ArrayView2};

use super::types::StepFunction;

/// Holds the state of one deterministic annealing run.
///
/// The state is the current assignment expectations, the temperature
/// (always starting at 1), the cooling ratio, and a single-slot stash
/// of `(temperature, assignments)` refreshed immediately before every
/// cooling step.
///
/// The machine never decides when a run is finished: the caller drives
/// [`step`] at a fixed temperature until its own convergence criterion
/// is met, then calls [`cool`], and repeats for as many temperature
/// stages as it wants. When an iteration diverges to NaN the state is
/// left untouched and [`reheat`] rolls back to the last checkpoint so
/// the caller can soften the ratio and retry.
///
/// ```
/// use detanneal::anneal::{AssignmentAnnealing, DistanceStep, random_assignments};
/// use ndarray::array;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let upper = array![
///     [0.0, 1.9, 0.1],
///     [0.0, 0.0, 2.1],
///     [0.0, 0.0, 0.0],
/// ];
/// let distances = &upper + &upper.t();
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let initial = random_assignments(3, 2, &mut rng);
/// let mut annealer =
///     AssignmentAnnealing::new(DistanceStep::new(distances), initial, 0.73).unwrap();
///
/// for _stage in 0..5 {
///     for _ in 0..20 {
///         annealer.step().unwrap();
///     }
///     annealer.cool().unwrap();
/// }
/// assert!(annealer.temperature() < 1.0);
/// ```
///
/// [`step`]: AssignmentAnnealing::step
/// [`cool`]: AssignmentAnnealing::cool
/// [`reheat`]: AssignmentAnnealing::reheat
#[derive(Debug, Clone)]
pub struct AssignmentAnnealing<F: StepFunction> {
    function: F,
    assignments: Array2<f64>,
    temperature: f64,
    ratio: f64,
    stash: (f64, Array2<f64>),
}

impl<F: StepFunction> AssignmentAnnealing<F> {
    /// Creates a new annealing state at temperature 1.
    ///
    /// `initial_assignments` should be row-stochastic with entries
    /// strictly inside (0, 1); this is a caller obligation and is not
    /// validated. `ratio` must lie in the open interval (0, 1).
    ///
    /// The initial stash is `(1, initial_assignments)`, so a [`reheat`]
    /// before any [`cool`] restores the starting state.
    ///
    /// [`cool`]: AssignmentAnnealing::cool
    /// [`reheat`]: AssignmentAnnealing::reheat
    pub fn new(
        function: F,
        initial_assignments: Array2<f64>,
        ratio: f64,
    ) -> Result<Self, AnnealError> {
        validate_ratio(ratio)?;
        let stash = (1.0, initial_assignments.clone());
        Ok(Self {
            function,
            assignments: initial_assignments,
            temperature: 1.0,
            ratio,
            stash,
        })
    }

    /// The current assignment expectations.
    pub fn assignments(&self) -> ArrayView2<'_, f64> {
        self.assignments.view()
    }

    /// The current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// The current cooling ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Changes the cooling ratio.
    ///
    /// The new value is not checked here; it is re-validated by the
    /// next [`cool`] call, which fails without mutating anything if the
    /// ratio has left (0, 1).
    ///
    /// [`cool`]: AssignmentAnnealing::cool
    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
    }

    /// Performs one fixed point iteration at the current temperature
    /// and commits the result.
    ///
    /// Temperature is never changed by stepping. If the step function
    /// reports divergence the current assignments are left exactly as
    /// they were.
    pub fn step(&mut self) -> Result<ArrayView2<'_, f64>, AnnealError> {
        let next = self.function.step(self.assignments.view(), self.temperature)?;
        self.assignments = next;
        Ok(self.assignments.view())
    }

    /// Lowers the temperature by the configured ratio.
    ///
    /// The current `(temperature, assignments)` pair is stashed before
    /// the temperature changes, replacing any earlier stash. Cooling
    /// never touches the assignments themselves.
    pub fn cool(&mut self) -> Result<(), AnnealError> {
        validate_ratio(self.ratio)?;
        self.stash = (self.temperature, self.assignments.clone());
        self.temperature *= self.ratio;
        Ok(())
    }

    /// Restores the temperature and assignments captured by the most
    /// recent [`cool`] call (or the initial state if cooling has not
    /// happened yet).
    ///
    /// This is a single-level undo: a second consecutive call restores
    /// the same snapshot again.
    ///
    /// [`cool`]: AssignmentAnnealing::cool
    pub fn reheat(&mut self) {
        self.temperature = self.stash.0;
        self.assignments = self.stash.1.clone();
    }
}

fn validate_ratio(ratio: f64) -> Result<(), AnnealError> {
    if ratio > 0.0 && ratio < 1.0 {
        Ok(())
    } else {
        Err(AnnealError::InvalidRatio { ratio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Step function that scales assignments by a constant. Keeps the
    /// arithmetic transparent so state transitions can be checked
    /// exactly.
    #[derive(Debug)]
    struct ScaleStep(f64);

    impl StepFunction for ScaleStep {
        fn step(
            &self,
            assignments: ArrayView2<'_, f64>,
            _temperature: f64,
        ) -> Result<Array2<f64>, AnnealError> {
            Ok(&assignments * self.0)
        }
    }

    /// Step function that always reports divergence.
    #[derive(Debug)]
    struct FailStep;

    impl StepFunction for FailStep {
        fn step(
            &self,
            _assignments: ArrayView2<'_, f64>,
            temperature: f64,
        ) -> Result<Array2<f64>, AnnealError> {
            Err(AnnealError::NanAssignments { temperature })
        }
    }

    fn initial() -> Array2<f64> {
        array![[0.6, 0.4], [0.3, 0.7]]
    }

    #[test]
    fn test_new_rejects_bad_ratio() {
        for ratio in [0.0, 1.0, -0.5, 2.0] {
            let err = AssignmentAnnealing::new(ScaleStep(1.0), initial(), ratio).unwrap_err();
            assert_eq!(err, AnnealError::InvalidRatio { ratio });
        }
    }

    #[test]
    fn test_initial_temperature_is_one() {
        let annealer = AssignmentAnnealing::new(ScaleStep(1.0), initial(), 0.73).unwrap();
        assert_eq!(annealer.temperature(), 1.0);
    }

    #[test]
    fn test_step_commits_result_and_keeps_temperature() {
        let mut annealer = AssignmentAnnealing::new(ScaleStep(2.0), initial(), 0.5).unwrap();
        annealer.step().unwrap();
        assert_eq!(annealer.assignments()[[0, 0]], 1.2);
        assert_eq!(annealer.temperature(), 1.0);
    }

    #[test]
    fn test_cooling_is_geometric() {
        let mut annealer = AssignmentAnnealing::new(ScaleStep(1.0), initial(), 0.73).unwrap();
        for _ in 0..5 {
            annealer.cool().unwrap();
        }
        assert!((annealer.temperature() - 0.73f64.powi(5)).abs() < 1e-15);
    }

    #[test]
    fn test_cool_then_reheat_restores_exact_state() {
        let mut annealer = AssignmentAnnealing::new(ScaleStep(2.0), initial(), 0.5).unwrap();
        annealer.step().unwrap();
        let before = annealer.assignments().to_owned();
        let temp_before = annealer.temperature();

        annealer.cool().unwrap();
        annealer.reheat();

        assert_eq!(annealer.temperature(), temp_before);
        assert_eq!(annealer.assignments(), before);
    }

    #[test]
    fn test_reheat_is_single_level() {
        let mut annealer = AssignmentAnnealing::new(ScaleStep(1.0), initial(), 0.5).unwrap();
        annealer.cool().unwrap();
        annealer.cool().unwrap();
        // Stash holds the state before the *second* cool.
        annealer.reheat();
        assert_eq!(annealer.temperature(), 0.5);
        annealer.reheat();
        assert_eq!(annealer.temperature(), 0.5);
    }

    #[test]
    fn test_reheat_before_any_cool_restores_initial() {
        let mut annealer = AssignmentAnnealing::new(ScaleStep(3.0), initial(), 0.5).unwrap();
        annealer.step().unwrap();
        annealer.reheat();
        assert_eq!(annealer.temperature(), 1.0);
        assert_eq!(annealer.assignments(), initial());
    }

    #[test]
    fn test_failed_step_leaves_state_untouched() {
        let mut annealer = AssignmentAnnealing::new(FailStep, initial(), 0.5).unwrap();
        let err = annealer.step().unwrap_err();
        assert!(matches!(err, AnnealError::NanAssignments { .. }));
        assert_eq!(annealer.assignments(), initial());
        assert_eq!(annealer.temperature(), 1.0);
    }

    #[test]
    fn test_cool_rejects_ratio_changed_out_of_range() {
        let mut annealer = AssignmentAnnealing::new(ScaleStep(1.0), initial(), 0.5).unwrap();
        annealer.cool().unwrap();
        annealer.set_ratio(1.2);
        let err = annealer.cool().unwrap_err();
        assert_eq!(err, AnnealError::InvalidRatio { ratio: 1.2 });
        // Failed cool mutates nothing, including the stash.
        assert_eq!(annealer.temperature(), 0.5);
        annealer.reheat();
        assert_eq!(annealer.temperature(), 1.0);
    }
}
