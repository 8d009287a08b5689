//! Image compression and reconstruction by homogeneous diffusion inpainting
//!
//! A sparse set of pixels is selected near edges of the smoothed image, and
//! the remaining pixels are recovered by solving the discrete Laplace equation
//! with the selected pixels as boundary values.

#![forbid(unsafe_code)]

/// Mask selection, halftoning, the diffusion system, its solver and the pipeline
pub mod algorithm;
/// Kernels, convolution and grid statistics
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Vector kernels and probability densities
pub mod math;
/// Grids, boundary mirroring and masks
pub mod spatial;

pub use io::error::{InpaintError, Result};
