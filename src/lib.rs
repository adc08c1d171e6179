//! Deterministic annealing for soft clustering over pairwise
//! dissimilarity matrices.
//!
//! Given only an N×N symmetric distance matrix with a zero diagonal,
//! this crate anneals an N×K matrix of soft cluster memberships toward
//! a hard partition by minimising a Lagrangian-regularised potential at
//! decreasing temperatures.
//!
//! The crate is a library core: it does not choose the number of
//! clusters, does not pick the random initialisation strategy, and does
//! not decide convergence for the caller. The [`anneal::AnnealRunner`]
//! packages the documented outer-loop pattern for callers who want a
//! complete schedule; everything it does can also be driven manually
//! through [`anneal::AssignmentAnnealing`].
//!
//! # Example
//!
//! ```
//! use detanneal::anneal::{AnnealConfig, AnnealRunner};
//! use ndarray::array;
//!
//! let upper = array![
//!     [0.0, 2.1, 0.10, 0.85, 0.2, 0.78],
//!     [0.0, 0.0, 0.92, 0.05, 1.01, 0.01],
//!     [0.0, 0.0, 0.0, 2.02, 0.15, 0.99],
//!     [0.0, 0.0, 0.0, 0.0, 1.30, 0.31],
//!     [0.0, 0.0, 0.0, 0.0, 0.0, 1.05],
//!     [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
//! ];
//! let distances = &upper + &upper.t();
//!
//! let config = AnnealConfig::default().with_seed(42);
//! let result = AnnealRunner::run(&distances, 2, &config).unwrap();
//!
//! // Objects 0, 2 and 4 are mutually close, as are 1, 3 and 5.
//! assert_eq!(result.labels[0], result.labels[2]);
//! assert_ne!(result.labels[0], result.labels[1]);
//! ```

pub mod anneal;
pub mod error;

pub use error::AnnealError;
