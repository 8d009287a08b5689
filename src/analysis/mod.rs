//! Image analysis primitives: kernels, convolution and grid statistics

/// Mirrored-boundary convolution engine
pub mod convolution;
/// Kernel families and construction
pub mod kernel;
/// Summary statistics and quality metrics
pub mod statistics;
