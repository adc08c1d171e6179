//! Annealing execution loop.

use crate::error::AnnealError;
use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::annealer::AssignmentAnnealing;
use super::config::AnnealConfig;
use super::kernels::DistanceStep;

/// Result of a complete annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// Final assignment expectations.
    pub assignments: Array2<f64>,

    /// Hard cluster label per object, from the row arg-max of the final
    /// assignments.
    pub labels: Vec<usize>,

    /// Temperature when the run finished.
    pub final_temperature: f64,

    /// Total number of fixed point iterations performed.
    pub iterations: usize,

    /// Number of divergence recoveries (reheat plus ratio softening).
    pub reheats: usize,
}

/// Drives a full annealing schedule over a pairwise distance matrix.
///
/// The state machine itself never decides when to stop; this runner
/// packages the documented caller-side pattern: for each temperature
/// stage, iterate until consecutive assignment matrices differ by less
/// than the configured tolerance (or the per-stage cap is hit), then
/// cool. If an iteration diverges to NaN, the runner reheats to the
/// last checkpoint, softens the cooling ratio halfway toward 1, and
/// continues; after `max_reheats` recoveries the error is returned.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs a full schedule from seeded random initial assignments.
    ///
    /// `distances` must be N×N, symmetric with a zero diagonal;
    /// `clusters` is the number of groups K. How K is chosen is the
    /// caller's problem.
    pub fn run(
        distances: &Array2<f64>,
        clusters: usize,
        config: &AnnealConfig,
    ) -> Result<AnnealResult, AnnealError> {
        config.validate()?;
        if clusters < 2 {
            return Err(AnnealError::InvalidConfig(format!(
                "need at least 2 clusters, got {clusters}"
            )));
        }

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let initial = random_assignments(distances.nrows(), clusters, &mut rng);
        Self::run_from(distances, initial, config)
    }

    /// Runs a full schedule from the given initial assignments.
    ///
    /// The initial matrix must be row-stochastic with entries strictly
    /// inside (0, 1); this is not validated.
    pub fn run_from(
        distances: &Array2<f64>,
        initial_assignments: Array2<f64>,
        config: &AnnealConfig,
    ) -> Result<AnnealResult, AnnealError> {
        config.validate()?;

        let step_fn = DistanceStep::new(distances.clone());
        let mut annealer = AssignmentAnnealing::new(step_fn, initial_assignments, config.ratio)?;

        let mut iterations = 0usize;
        let mut reheats = 0usize;

        for _stage in 0..config.stages {
            let mut previous = annealer.assignments().to_owned();
            let mut inner = 0usize;

            while inner < config.max_iterations_per_stage {
                match annealer.step() {
                    Ok(next) => {
                        iterations += 1;
                        inner += 1;
                        let delta = max_abs_diff(next, previous.view());
                        if delta < config.tolerance {
                            break;
                        }
                        previous = next.to_owned();
                    }
                    Err(err @ AnnealError::NanAssignments { .. }) => {
                        if reheats >= config.max_reheats {
                            return Err(err);
                        }
                        reheats += 1;
                        // Roll back to the last checkpoint and re-descend
                        // with a gentler ratio.
                        annealer.reheat();
                        annealer.set_ratio((annealer.ratio() + 1.0) / 2.0);
                        annealer.cool()?;
                        previous = annealer.assignments().to_owned();
                        inner = 0;
                    }
                    Err(err) => return Err(err),
                }
            }

            annealer.cool()?;
        }

        let assignments = annealer.assignments().to_owned();
        let labels = hard_labels(assignments.view());
        Ok(AnnealResult {
            assignments,
            labels,
            final_temperature: annealer.temperature(),
            iterations,
            reheats,
        })
    }
}

/// Generates random row-stochastic initial assignments.
///
/// Entries start near `1/k` with a small uniform perturbation, then
/// each row is normalised to sum to 1. Keeping the start close to
/// uniform keeps every entry well inside (0, 1), which the potential
/// kernel requires.
pub fn random_assignments<R: Rng>(n: usize, k: usize, rng: &mut R) -> Array2<f64> {
    let mut assignments =
        Array2::from_shape_fn((n, k), |_| 0.5 + 0.1 * (rng.random_range(0.0..1.0) - 0.5));
    for mut row in assignments.rows_mut() {
        let sum: f64 = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    assignments
}

/// Hard cluster label per object: the arg-max of each row.
///
/// A matrix with zero columns has no arg-max to take, so it yields an
/// empty label vector rather than a panic.
pub fn hard_labels(assignments: ArrayView2<'_, f64>) -> Vec<usize> {
    assignments
        .rows()
        .into_iter()
        .filter_map(|row| {
            row.iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(lambda, _)| lambda)
        })
        .collect()
}

fn max_abs_diff(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
