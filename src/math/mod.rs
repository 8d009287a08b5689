//! Mathematical utilities for the solver and kernel construction

/// Probability densities used to build smoothing kernels
pub mod probability;
/// Deterministic dense vector kernels
pub mod vector;
