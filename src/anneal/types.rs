//! Core trait for deterministic annealing.

use crate::error::AnnealError;
use ndarray::{Array2, ArrayView2};

/// A fixed point iteration step for deterministic annealing.
///
/// Maps the current assignment expectations and temperature to the next
/// expectations. The input matrix is N×K and row-stochastic (each row
/// sums to 1); the output must have the same shape and constraints.
///
/// Implementations must detect NaN entries in the result and return
/// [`AnnealError::NanAssignments`] instead of handing corrupted state
/// back to the caller. [`AssignmentAnnealing`] relies on this to leave
/// its state untouched when an iteration diverges.
///
/// The stock implementation is [`DistanceStep`], which composes the
/// potential and expectation kernels over a fixed pairwise distance
/// matrix. Any other mapping with the same contract can be plugged in.
///
/// [`AssignmentAnnealing`]: super::AssignmentAnnealing
/// [`DistanceStep`]: super::DistanceStep
pub trait StepFunction {
    /// Performs one fixed point iteration at the given temperature.
    fn step(
        &self,
        assignments: ArrayView2<'_, f64>,
        temperature: f64,
    ) -> Result<Array2<f64>, AnnealError>;
}
