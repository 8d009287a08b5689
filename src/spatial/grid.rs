//! Dense single-channel sample grids
//!
//! A `Grid<T>` owns a row-major `(height, width)` array whose element kind is
//! fixed by the type parameter. `Raster` is the tagged form used where the kind
//! is only known at runtime, such as after decoding a file.

use std::fmt;

use ndarray::Array2;
use num_traits::Zero;

use crate::io::configuration::{MAX_GRID_DIMENSION, MAX_INTENSITY};
use crate::io::error::{InpaintError, Result, computation_error, ensure_same_shape};

/// Element kind stored in a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// Integer intensities, nominally 0..=255
    Integer,
    /// Unconstrained floating-point values used during computation
    Float,
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "floating-point"),
        }
    }
}

/// Numeric element type that a grid can hold
pub trait Sample: Copy + PartialOrd + Zero + fmt::Debug + 'static {
    /// Runtime tag for this element type
    const KIND: SampleKind;

    /// Widen to `f64` for accumulation
    fn to_f64(self) -> f64;

    /// Narrow a computed value back into this element type
    fn from_f64(value: f64) -> Self;
}

impl Sample for i32 {
    const KIND: SampleKind = SampleKind::Integer;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    // Rounds to nearest and saturates; NaN maps to zero
    fn from_f64(value: f64) -> Self {
        value.round() as Self
    }
}

impl Sample for f64 {
    const KIND: SampleKind = SampleKind::Float;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Allocate a buffer of `len` copies of `value`, reporting exhaustion as an error
///
/// # Errors
///
/// Returns `FailedAllocation` when the allocator cannot reserve the storage
pub fn allocate<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_reserve_error| InpaintError::FailedAllocation { elements: len })?;
    buffer.resize(len, value);
    Ok(buffer)
}

// Validates dimensions and returns the element count
fn checked_len(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(InpaintError::InvalidDimensions { width, height });
    }
    if width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
        return Err(InpaintError::FailedAllocation {
            elements: width.saturating_mul(height),
        });
    }
    width
        .checked_mul(height)
        .ok_or(InpaintError::FailedAllocation {
            elements: usize::MAX,
        })
}

/// Rectangular array of samples addressed as `(row, col)`
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Array2<T>,
}

impl<T: Sample> Grid<T> {
    /// Create a zero-filled grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero extent and `FailedAllocation` when
    /// the grid is too large to store
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, T::zero())
    }

    /// Create a grid with every sample set to `value`
    ///
    /// # Errors
    ///
    /// Same conditions as [`Grid::new`]
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self> {
        let len = checked_len(width, height)?;
        Self::from_vec(width, height, allocate(len, value)?)
    }

    /// Wrap a row-major buffer
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `data.len() != width * height`, plus the
    /// conditions of [`Grid::new`]
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let len = checked_len(width, height)?;
        if data.len() != len {
            return Err(InpaintError::DimensionMismatch {
                expected: (width, height),
                found: (data.len(), 1),
            });
        }
        let data = Array2::from_shape_vec((height, width), data)
            .map_err(|shape_error| computation_error("grid construction", &shape_error))?;
        Ok(Self { data })
    }

    /// Build a grid by evaluating `f(row, col)` for every pixel
    ///
    /// # Errors
    ///
    /// Same conditions as [`Grid::new`]
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Result<Self> {
        let len = checked_len(width, height)?;
        let mut values = allocate(len, T::zero())?;
        for (index, value) in values.iter_mut().enumerate() {
            *value = f(index / width, index % width);
        }
        Self::from_vec(width, height, values)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Dimensions as `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Total number of samples
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Sample at `(row, col)`, or `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.data.get((row, col)).copied()
    }

    /// Mutable sample at `(row, col)`, or `None` outside the grid
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.data.get_mut((row, col))
    }

    /// Sample at a row-major linear index
    pub fn get_linear(&self, index: usize) -> Option<T> {
        let width = self.width();
        self.get(index / width, index % width)
    }

    /// Iterate samples in row-major order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    /// Copy the samples out in row-major order
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Apply `f` to every sample, producing a grid of another kind
    #[must_use]
    pub fn map<U: Sample>(&self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid {
            data: self.data.mapv(f),
        }
    }

    /// Widen into a floating-point grid
    #[must_use]
    pub fn to_float(&self) -> Grid<f64> {
        self.map(|value| value.to_f64())
    }

    /// Overwrite every sample with those of `other`
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the shapes differ
    pub fn assign(&mut self, other: &Self) -> Result<()> {
        ensure_same_shape(self.dimensions(), other.dimensions())?;
        self.data.assign(&other.data);
        Ok(())
    }
}

impl Grid<f64> {
    /// Round into an integer grid without clamping
    #[must_use]
    pub fn to_integer(&self) -> Grid<i32> {
        self.map(i32::from_f64)
    }

    /// Round and clamp into displayable 0..=255 intensities
    #[must_use]
    pub fn to_intensity(&self) -> Grid<i32> {
        self.map(|value| i32::from_f64(value.clamp(0.0, MAX_INTENSITY)))
    }
}

/// Grid whose element kind is decided at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Raster {
    /// Integer intensities
    Integer(Grid<i32>),
    /// Floating-point samples
    Float(Grid<f64>),
}

impl Raster {
    /// Element kind of the wrapped grid
    pub const fn kind(&self) -> SampleKind {
        match self {
            Self::Integer(_) => SampleKind::Integer,
            Self::Float(_) => SampleKind::Float,
        }
    }

    /// Dimensions as `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Integer(grid) => grid.dimensions(),
            Self::Float(grid) => grid.dimensions(),
        }
    }

    /// Borrow as a floating-point grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` if the raster holds integers
    pub fn as_float(&self) -> Result<&Grid<f64>> {
        match self {
            Self::Float(grid) => Ok(grid),
            Self::Integer(_) => Err(InpaintError::InvalidType {
                expected: SampleKind::Float,
                found: SampleKind::Integer,
            }),
        }
    }

    /// Borrow as an integer grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` if the raster holds floating-point samples
    pub fn as_integer(&self) -> Result<&Grid<i32>> {
        match self {
            Self::Integer(grid) => Ok(grid),
            Self::Float(_) => Err(InpaintError::InvalidType {
                expected: SampleKind::Integer,
                found: SampleKind::Float,
            }),
        }
    }

    /// Explicitly convert into a floating-point grid
    pub fn to_float(&self) -> Grid<f64> {
        match self {
            Self::Integer(grid) => grid.to_float(),
            Self::Float(grid) => grid.clone(),
        }
    }
}

impl From<Grid<i32>> for Raster {
    fn from(grid: Grid<i32>) -> Self {
        Self::Integer(grid)
    }
}

impl From<Grid<f64>> for Raster {
    fn from(grid: Grid<f64>) -> Self {
        Self::Float(grid)
    }
}
