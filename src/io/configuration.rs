//! Algorithm constants and runtime configuration defaults

// Mask selection
/// Fraction of pixels the Belhachmi mask aims to retain
pub const DEFAULT_COMPRESSION_RATIO: f64 = 0.1;
/// Standard deviation of the pre-smoothing Gaussian
pub const DEFAULT_SMOOTHING_SIGMA: f64 = 1.0;
/// Gaussian half-width in multiples of sigma
pub const DEFAULT_GAUSSIAN_ACCURACY: f64 = 2.0;

// Intensity range of integer rasters
/// Largest representable intensity
pub const MAX_INTENSITY: f64 = 255.0;
/// Quantiser decision level between the two output intensities
pub const DITHER_THRESHOLD: f64 = 127.5;

// Floyd-Steinberg weights, in sixteenths
/// Share of the error pushed to the right neighbour
pub const DIFFUSION_RIGHT: f64 = 7.0 / 16.0;
/// Share of the error pushed to the lower-left neighbour
pub const DIFFUSION_BELOW_LEFT: f64 = 3.0 / 16.0;
/// Share of the error pushed to the neighbour below
pub const DIFFUSION_BELOW: f64 = 5.0 / 16.0;
/// Share of the error pushed to the lower-right neighbour
pub const DIFFUSION_BELOW_RIGHT: f64 = 1.0 / 16.0;

// Solver
/// Default iteration budget for conjugate gradient
pub const DEFAULT_MAX_ITERATIONS: usize = 5_000;
/// Default absolute residual tolerance for conjugate gradient
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 32_768;

/// Fixed seed for reproducible random masks
pub const DEFAULT_SEED: u64 = 42;

// Output settings
/// Suffix added to reconstructed image filenames
pub const INPAINT_SUFFIX: &str = "_inpainted";
/// Suffix added to mask filenames
pub const MASK_SUFFIX: &str = "_mask";
/// Suffix added to halftoned image filenames
pub const DITHER_SUFFIX: &str = "_dithered";
/// Suffix added to filtered image filenames
pub const FILTER_SUFFIX: &str = "_filtered";

// Progress bar display settings
/// Solver iterations between progress bar refreshes
pub const PROGRESS_REFRESH_INTERVAL: usize = 16;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
