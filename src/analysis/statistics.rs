//! Summary statistics and reconstruction-quality metrics over grids

use crate::io::configuration::MAX_INTENSITY;
use crate::io::error::{Result, ensure_same_shape};
use crate::spatial::grid::{Grid, Sample};

/// Smallest sample of the grid
pub fn min<T: Sample>(grid: &Grid<T>) -> T {
    grid.iter()
        .reduce(|lowest, value| if value < lowest { value } else { lowest })
        .unwrap_or_else(T::zero)
}

/// Largest sample of the grid
pub fn max<T: Sample>(grid: &Grid<T>) -> T {
    grid.iter()
        .reduce(|highest, value| if value > highest { value } else { highest })
        .unwrap_or_else(T::zero)
}

/// Arithmetic mean of all samples
pub fn mean<T: Sample>(grid: &Grid<T>) -> f64 {
    let total = grid.iter().fold(0.0, |sum, value| sum + value.to_f64());
    total / grid.pixel_count() as f64
}

/// Mean squared difference between two grids of the same shape
///
/// # Errors
///
/// Returns `DimensionMismatch` when the grids differ in shape
pub fn mean_squared_error<A: Sample, B: Sample>(a: &Grid<A>, b: &Grid<B>) -> Result<f64> {
    ensure_same_shape(a.dimensions(), b.dimensions())?;
    let total = a.iter().zip(b.iter()).fold(0.0, |sum, (x, y)| {
        let delta = x.to_f64() - y.to_f64();
        delta.mul_add(delta, sum)
    });
    Ok(total / a.pixel_count() as f64)
}

/// Peak signal-to-noise ratio in decibels for 8-bit intensities
///
/// Identical grids yield `f64::INFINITY`.
///
/// # Errors
///
/// Returns `DimensionMismatch` when the grids differ in shape
pub fn psnr<A: Sample, B: Sample>(a: &Grid<A>, b: &Grid<B>) -> Result<f64> {
    let mse = mean_squared_error(a, b)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (MAX_INTENSITY * MAX_INTENSITY / mse).log10())
}
