//! Binary known/unknown pixel masks
//!
//! One bit per pixel in row-major order: set bits are retained ("known")
//! samples, cleared bits are reconstructed by the diffusion solve.

use bitvec::prelude::*;

use crate::io::configuration::MAX_INTENSITY;
use crate::io::error::{InpaintError, Result};
use crate::spatial::grid::{Grid, Sample};

/// Selection of known pixels over a `width x height` image
///
/// Always contains at least one known pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    bits: BitVec,
    width: usize,
    height: usize,
}

impl Mask {
    /// Wrap a row-major bit vector
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the bit count is not `width * height`,
    /// `InvalidDimensions` for a zero extent and `EmptyMask` if no bit is set
    pub fn new(width: usize, height: usize, bits: BitVec) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(InpaintError::InvalidDimensions { width, height });
        }
        if width.checked_mul(height) != Some(bits.len()) {
            return Err(InpaintError::DimensionMismatch {
                expected: (width, height),
                found: (bits.len(), 1),
            });
        }
        if bits.not_any() {
            return Err(InpaintError::EmptyMask {
                dimensions: (width, height),
            });
        }
        Ok(Self {
            bits,
            width,
            height,
        })
    }

    /// Build a mask by evaluating `known(row, col)` for every pixel
    ///
    /// # Errors
    ///
    /// Same conditions as [`Mask::new`]
    pub fn from_fn(
        width: usize,
        height: usize,
        mut known: impl FnMut(usize, usize) -> bool,
    ) -> Result<Self> {
        let len = width.saturating_mul(height);
        let mut bits = BitVec::with_capacity(len);
        for index in 0..len {
            bits.push(known(index / width, index % width));
        }
        Self::new(width, height, bits)
    }

    /// Treat every non-zero sample of `grid` as known
    ///
    /// # Errors
    ///
    /// Returns `EmptyMask` if the grid is entirely zero
    pub fn from_grid<T: Sample>(grid: &Grid<T>) -> Result<Self> {
        let bits: BitVec = grid.iter().map(|value| !value.is_zero()).collect();
        Self::new(grid.width(), grid.height(), bits)
    }

    /// Mask with every pixel known
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero extent
    pub fn all_known(width: usize, height: usize) -> Result<Self> {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Mask whose known pixels are exactly the outermost ring
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero extent
    pub fn border(width: usize, height: usize) -> Result<Self> {
        Self::from_fn(width, height, |row, col| {
            row == 0 || col == 0 || row + 1 == height || col + 1 == width
        })
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Dimensions as `(width, height)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of pixels covered by the mask
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false: a mask covers at least one pixel
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Test whether the pixel at `(row, col)` is known
    pub fn is_known(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.is_known_linear(row * self.width + col)
    }

    /// Test whether the pixel at a row-major index is known
    pub fn is_known_linear(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Count of known pixels
    pub fn known_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of pixels that are known
    pub fn density(&self) -> f64 {
        self.known_count() as f64 / self.len() as f64
    }

    /// Whether every pixel is known, leaving nothing to reconstruct
    pub fn is_fully_known(&self) -> bool {
        self.bits.all()
    }

    /// Row-major indices of the known pixels
    pub fn known_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Render as an integer raster: 255 for known pixels, 0 otherwise
    ///
    /// # Errors
    ///
    /// Returns `FailedAllocation` if the raster cannot be stored
    pub fn to_grid(&self) -> Result<Grid<i32>> {
        let known = i32::from_f64(MAX_INTENSITY);
        Grid::from_fn(self.width, self.height, |row, col| {
            if self.is_known(row, col) { known } else { 0 }
        })
    }
}
