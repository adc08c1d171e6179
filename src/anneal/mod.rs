//! Deterministic annealing for pairwise-distance soft clustering.
//!
//! Softens the hard assignment problem into a temperature-parameterised
//! relaxation: an N×K matrix of assignment expectations is refined by
//! fixed point iteration at each temperature, and lowering the
//! temperature drives the expectations toward a hard {0, 1} partition.
//! The continuation avoids the poor local minima that direct hard
//! clustering (e.g. k-medoids) is prone to.
//!
//! # Core Types
//!
//! - [`StepFunction`]: the fixed point iteration seam —
//!   `(assignments, temperature) → assignments`, failing on NaN
//! - [`DistanceStep`]: the stock step, composing the potential and
//!   expectation kernels over a fixed distance matrix
//! - [`AssignmentAnnealing`]: state machine holding the current
//!   expectations, temperature, and the cool/reheat checkpoint
//! - [`AnnealConfig`] / [`AnnealRunner`]: packaged schedule driving
//!   stages of iterate-until-tolerance followed by cooling
//!
//! # References
//!
//! - Hofmann & Buhmann (1997), "Pairwise Data Clustering by
//!   Deterministic Annealing"
//! - Rose (1998), "Deterministic Annealing for Clustering, Compression,
//!   Classification, Regression, and Related Optimization Problems"

mod annealer;
mod config;
mod kernels;
mod runner;
mod types;

pub use annealer::AssignmentAnnealing;
pub use config::AnnealConfig;
pub use kernels::{assignment_expectations, assignment_potential, DistanceStep};
pub use runner::{hard_labels, random_assignments, AnnealResult, AnnealRunner};
pub use types::StepFunction;
