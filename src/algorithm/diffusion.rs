//! Discretised Laplace operator in compressed diagonal storage (CDS)
//!
//! One row per pixel. Known pixels get identity rows pinning them to their
//! value. Unknown pixels get the negated five-point Laplacian: the number of
//! distinct neighbours on the diagonal and `-1` toward every unknown
//! neighbour. Contributions of known neighbours live in the right-hand side,
//! which keeps the operator symmetric positive definite for conjugate
//! gradient. Neighbours are found with the same mirroring rule as
//! convolution, so a border pixel's reflected neighbour is itself and drops
//! out of the stencil.
//!
//! With `n = width * height` the non-zero diagonals are `{0, ±1, ±width}`,
//! each stored as `n` coefficients aligned to the row index:
//! `diagonal[d][i] == A[i, i + offset[d]]`.

use crate::io::error::{InpaintError, Result, computation_error, ensure_same_shape};
use crate::spatial::boundary::mirror_offset;
use crate::spatial::grid::{Grid, allocate};
use crate::spatial::mask::Mask;

/// Square operator consumed through matrix-vector products
pub trait LinearOperator {
    /// Number of rows (and columns)
    fn order(&self) -> usize;

    /// Compute `out = A * x`
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x` or `out` is not of length `order()`
    fn apply(&self, x: &[f64], out: &mut [f64]) -> Result<()>;
}

// Up, down, left, right
const STENCIL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// Distinct mirrored neighbours of a pixel; the pixel itself is excluded
fn neighbours(index: usize, width: usize, height: usize) -> Result<Vec<usize>> {
    let (row, col) = (index / width, index % width);
    let mut found = Vec::with_capacity(STENCIL.len());
    for (row_step, col_step) in STENCIL {
        let neighbour_row = mirror_offset(row, row_step, height)?;
        let neighbour_col = mirror_offset(col, col_step, width)?;
        let neighbour = neighbour_row * width + neighbour_col;
        if neighbour != index {
            found.push(neighbour);
        }
    }
    Ok(found)
}

fn check_len(expected: usize, found: usize) -> Result<()> {
    ensure_same_shape((expected, 1), (found, 1))
}

/// Banded diffusion operator for one mask
#[derive(Clone, Debug)]
pub struct DiffusionMatrix {
    offsets: Vec<isize>,
    diagonals: Vec<Vec<f64>>,
    mask: Mask,
}

impl DiffusionMatrix {
    /// Assemble the operator for `mask`
    ///
    /// # Errors
    ///
    /// Returns `FailedAllocation` if the diagonals cannot be stored
    pub fn build(mask: &Mask) -> Result<Self> {
        let (width, height) = mask.dimensions();
        let order = mask.len();
        let band = width as isize;

        let mut offsets = vec![-band, -1, 0, 1, band];
        offsets.sort_unstable();
        offsets.dedup();

        let mut diagonals = offsets
            .iter()
            .map(|_| allocate(order, 0.0))
            .collect::<Result<Vec<_>>>()?;
        let main = offsets
            .iter()
            .position(|&offset| offset == 0)
            .ok_or_else(|| computation_error("diffusion assembly", &"missing main diagonal"))?;

        for index in 0..order {
            if mask.is_known_linear(index) {
                set_coefficient(&mut diagonals, main, index, 1.0);
                continue;
            }

            let adjacent = neighbours(index, width, height)?;
            set_coefficient(&mut diagonals, main, index, adjacent.len() as f64);
            for neighbour in adjacent {
                if mask.is_known_linear(neighbour) {
                    continue;
                }
                let offset = neighbour as isize - index as isize;
                let diagonal = offsets
                    .iter()
                    .position(|&candidate| candidate == offset)
                    .ok_or_else(|| {
                        computation_error(
                            "diffusion assembly",
                            &format!("offset {offset} outside the stencil band"),
                        )
                    })?;
                set_coefficient(&mut diagonals, diagonal, index, -1.0);
            }
        }

        Ok(Self {
            offsets,
            diagonals,
            mask: mask.clone(),
        })
    }

    /// Mask the operator was assembled for
    pub const fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Diagonal offsets relative to the main diagonal, ascending
    pub fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    /// Largest distance of a stored diagonal from the main diagonal
    pub fn bandwidth(&self) -> usize {
        self.offsets
            .iter()
            .map(|offset| offset.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Row-aligned coefficients of the diagonal at `offset`
    pub fn diagonal(&self, offset: isize) -> Option<&[f64]> {
        self.offsets
            .iter()
            .position(|&candidate| candidate == offset)
            .and_then(|index| self.diagonals.get(index))
            .map(Vec::as_slice)
    }

    /// Entry `A[row, col]`, zero outside the stored band
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let offset = col as isize - row as isize;
        self.diagonal(offset)
            .and_then(|diagonal| diagonal.get(row))
            .copied()
            .unwrap_or(0.0)
    }

    /// Right-hand side for reconstructing `image` under this operator
    ///
    /// Known rows carry the pixel's own value; unknown rows carry the sum of
    /// their known neighbours' values.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `image` and the mask differ in shape
    pub fn rhs(&self, image: &Grid<f64>) -> Result<Vec<f64>> {
        let (width, height) = self.mask.dimensions();
        ensure_same_shape((width, height), image.dimensions())?;

        let mut b = allocate(self.order(), 0.0)?;
        for (index, entry) in b.iter_mut().enumerate() {
            *entry = if self.mask.is_known_linear(index) {
                image.get_linear(index).unwrap_or(0.0)
            } else {
                neighbours(index, width, height)?
                    .into_iter()
                    .filter(|&neighbour| self.mask.is_known_linear(neighbour))
                    .filter_map(|neighbour| image.get_linear(neighbour))
                    .sum()
            };
        }
        Ok(b)
    }

    /// Allocate and return `A * x`
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x` is not of length `order()`
    pub fn mat_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        let mut out = allocate(self.order(), 0.0)?;
        self.apply(x, &mut out)?;
        Ok(out)
    }
}

impl LinearOperator for DiffusionMatrix {
    fn order(&self) -> usize {
        self.mask.len()
    }

    fn apply(&self, x: &[f64], out: &mut [f64]) -> Result<()> {
        let order = self.order();
        check_len(order, x.len())?;
        check_len(order, out.len())?;

        out.fill(0.0);
        for (&offset, diagonal) in self.offsets.iter().zip(&self.diagonals) {
            for (row, (target, coefficient)) in out.iter_mut().zip(diagonal).enumerate() {
                if *coefficient == 0.0 {
                    continue;
                }
                let value = row
                    .checked_add_signed(offset)
                    .and_then(|col| x.get(col))
                    .ok_or(InpaintError::OutOfBounds {
                        index: row as isize + offset,
                        len: order,
                    })?;
                *target = coefficient.mul_add(*value, *target);
            }
        }
        Ok(())
    }
}

fn set_coefficient(diagonals: &mut [Vec<f64>], diagonal: usize, row: usize, value: f64) {
    if let Some(entry) = diagonals
        .get_mut(diagonal)
        .and_then(|coefficients| coefficients.get_mut(row))
    {
        *entry = value;
    }
}
