//! Kernel convolution with mirrored boundaries
//!
//! Taps are applied in correlation order: weight `(k, l)` multiplies the
//! sample at offset `(k - half_height, l - half_width)` from the output pixel.
//! Sums are accumulated in `f64` and narrowed to the grid's kind once per
//! output sample.

use crate::analysis::kernel::Kernel;
use crate::io::error::{InpaintError, Result};
use crate::spatial::boundary::mirror;
use crate::spatial::grid::{Grid, Sample, allocate};

// Maps `position` in `[0, len + 2 * half)` to the mirrored index of
// `position - half`; fails when the kernel reaches past one reflection
fn mirror_table(len: usize, half: usize) -> Result<Vec<usize>> {
    (0..len + 2 * half)
        .map(|position| mirror(position as isize - half as isize, len))
        .collect()
}

/// Convolve `src` with `kernel`, choosing the two-pass path for separable kernels
///
/// # Errors
///
/// Returns `OutOfBounds` if the kernel's half-extent exceeds the image
/// dimension along either axis
pub fn convolve<T: Sample>(src: &Grid<T>, kernel: &Kernel) -> Result<Grid<T>> {
    if kernel.is_separable() {
        convolve_separable(src, kernel)
    } else {
        convolve_2d(src, kernel)
    }
}

/// Destructive convolution: the result replaces the contents of `image`
///
/// The full result is computed into a scratch grid before being copied back,
/// so no partially convolved state is ever visible through `image`.
///
/// # Errors
///
/// Same conditions as [`convolve`]; `image` is untouched on failure
pub fn convolve_in_place<T: Sample>(image: &mut Grid<T>, kernel: &Kernel) -> Result<()> {
    let scratch = convolve(image, kernel)?;
    image.assign(&scratch)
}

/// Full 2D convolution, applying the kernel matrix as given
///
/// A 1-row kernel passed here is applied along rows only.
///
/// # Errors
///
/// Returns `OutOfBounds` if the kernel's half-extent exceeds the image
pub fn convolve_2d<T: Sample>(src: &Grid<T>, kernel: &Kernel) -> Result<Grid<T>> {
    let (width, height) = src.dimensions();
    let cols = mirror_table(width, kernel.half_width())?;
    let rows = mirror_table(height, kernel.half_height())?;

    let mut output = allocate(width * height, T::zero())?;
    for (index, out) in output.iter_mut().enumerate() {
        let (row, col) = (index / width, index % width);
        let mut sum = 0.0;
        for (k, weight_row) in kernel.weights().chunks_exact(kernel.width()).enumerate() {
            let Some(&source_row) = rows.get(row + k) else {
                continue;
            };
            for (l, weight) in weight_row.iter().enumerate() {
                let value = cols
                    .get(col + l)
                    .and_then(|&source_col| src.get(source_row, source_col))
                    .map_or(0.0, |sample| sample.to_f64());
                sum = value.mul_add(*weight, sum);
            }
        }
        *out = T::from_f64(sum);
    }

    Grid::from_vec(width, height, output)
}

/// Two-pass convolution with a 1D kernel: along rows, then along columns
///
/// Both passes use the same weights, which is what a separable Gaussian
/// requires. The intermediate pass is kept in `f64` regardless of the grid's
/// kind.
///
/// # Errors
///
/// Returns `NotImplemented` for a kernel with more than one row and
/// `OutOfBounds` if the kernel's half-width exceeds either image dimension
pub fn convolve_separable<T: Sample>(src: &Grid<T>, kernel: &Kernel) -> Result<Grid<T>> {
    if !kernel.is_separable() {
        return Err(InpaintError::NotImplemented {
            feature: format!(
                "separable convolution with a {}x{} {} kernel",
                kernel.width(),
                kernel.height(),
                kernel.family()
            ),
        });
    }

    let (width, height) = src.dimensions();
    let half = kernel.half_width();
    let cols = mirror_table(width, half)?;
    let rows = mirror_table(height, half)?;
    let weights = kernel.weights();

    let mut horizontal = allocate(width * height, 0.0)?;
    for (index, out) in horizontal.iter_mut().enumerate() {
        let (row, col) = (index / width, index % width);
        *out = weights.iter().enumerate().fold(0.0, |sum, (l, weight)| {
            let value = cols
                .get(col + l)
                .and_then(|&source_col| src.get(row, source_col))
                .map_or(0.0, |sample| sample.to_f64());
            value.mul_add(*weight, sum)
        });
    }

    let mut output = allocate(width * height, T::zero())?;
    for (index, out) in output.iter_mut().enumerate() {
        let (row, col) = (index / width, index % width);
        let sum = weights.iter().enumerate().fold(0.0, |sum, (k, weight)| {
            let value = rows
                .get(row + k)
                .and_then(|&source_row| horizontal.get(source_row * width + col))
                .copied()
                .unwrap_or(0.0);
            value.mul_add(*weight, sum)
        });
        *out = T::from_f64(sum);
    }

    Grid::from_vec(width, height, output)
}
