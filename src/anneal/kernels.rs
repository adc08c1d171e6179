//! Numerical kernels: assignment potentials and expectations.

use crate::error::AnnealError;
use ndarray::{Array2, ArrayView2, Axis};

use super::types::StepFunction;

/// Computes the assignment potentials from the current assignment
/// expectations and the pairwise distance matrix.
///
/// For object `i` and cluster `λ`, with `sum_M1[i,λ]` the total expected
/// mass of cluster `λ` excluding object `i`:
///
/// ```text
/// P[i,λ] = ((D·M)[i,λ] − (MᵗDM)[λ,λ] / (2·sum_M1[i,λ])) / (sum_M1[i,λ] + 1)
/// ```
///
/// The assignment matrix must contain entries strictly inside (0, 1) and
/// each row must sum to 1; the distance matrix must be symmetric with a
/// zero diagonal. Neither is validated here. If `sum_M1` reaches zero
/// (a cluster's expected mass concentrated entirely on one object) the
/// division is undefined and the result will contain infinities; that is
/// a precondition violation, not a handled case.
pub fn assignment_potential(
    assignments: ArrayView2<'_, f64>,
    distances: ArrayView2<'_, f64>,
) -> Array2<f64> {
    let (n, k) = assignments.dim();

    // mdm[λ,λ] is the expected within-cluster pairwise distance sum.
    let mdm = assignments.t().dot(&distances).dot(&assignments);
    let column_sums = assignments.sum_axis(Axis(0));

    let mut potentials = distances.dot(&assignments);
    for i in 0..n {
        for lambda in 0..k {
            let sum_m1 = column_sums[lambda] - assignments[[i, lambda]];
            let sum_outer = potentials[[i, lambda]] - mdm[[lambda, lambda]] / (2.0 * sum_m1);
            potentials[[i, lambda]] = sum_outer / (sum_m1 + 1.0);
        }
    }
    potentials
}

/// Computes assignment expectations from potentials at the given
/// temperature: each row is the softmax of `−P[i,:] / T`.
///
/// High temperatures flatten the rows toward `1/K`; as `T → 0` each row
/// approaches a one-hot vector selecting the minimum-potential cluster.
/// Rows of the result sum to 1 by construction.
///
/// The exponentials are stabilised by subtracting the per-row maximum
/// logit, so extreme `−P/T` values do not overflow. A row whose logits
/// are all non-finite still normalises to NaN; detecting that is the
/// step function's job, not this kernel's.
pub fn assignment_expectations(potentials: ArrayView2<'_, f64>, temperature: f64) -> Array2<f64> {
    let (n, k) = potentials.dim();
    let mut expectations = Array2::zeros((n, k));

    for i in 0..n {
        let logit_max = potentials
            .row(i)
            .iter()
            .map(|p| -p / temperature)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut row_sum = 0.0;
        for lambda in 0..k {
            let e = (-potentials[[i, lambda]] / temperature - logit_max).exp();
            expectations[[i, lambda]] = e;
            row_sum += e;
        }
        for lambda in 0..k {
            expectations[[i, lambda]] /= row_sum;
        }
    }
    expectations
}

/// The stock fixed point iteration: potential kernel followed by the
/// expectation kernel, bound to a fixed pairwise distance matrix.
///
/// This is the composition suitable for [`AssignmentAnnealing`]. It
/// checks the freshly computed expectations for NaN entries and reports
/// [`AnnealError::NanAssignments`] rather than returning them.
///
/// [`AssignmentAnnealing`]: super::AssignmentAnnealing
#[derive(Debug, Clone)]
pub struct DistanceStep {
    distances: Array2<f64>,
}

impl DistanceStep {
    /// Binds the given pairwise distance matrix.
    ///
    /// The matrix must be symmetric with a zero diagonal; this is a
    /// documented caller obligation and is not validated.
    pub fn new(distances: Array2<f64>) -> Self {
        Self { distances }
    }

    /// The bound distance matrix.
    pub fn distances(&self) -> ArrayView2<'_, f64> {
        self.distances.view()
    }
}

impl StepFunction for DistanceStep {
    fn step(
        &self,
        assignments: ArrayView2<'_, f64>,
        temperature: f64,
    ) -> Result<Array2<f64>, AnnealError> {
        let potentials = assignment_potential(assignments, self.distances.view());
        let next = assignment_expectations(potentials.view(), temperature);

        if next.iter().any(|v| v.is_nan()) {
            return Err(AnnealError::NanAssignments { temperature });
        }
        Ok(next)
    }
}
