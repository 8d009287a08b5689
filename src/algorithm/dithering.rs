//! Floyd-Steinberg error-diffusion quantisation to two levels
//!
//! Used by the mask generator to binarise its scaled edge field and on its
//! own as a halftoning transform.

use crate::io::configuration::{
    DIFFUSION_BELOW, DIFFUSION_BELOW_LEFT, DIFFUSION_BELOW_RIGHT, DIFFUSION_RIGHT,
    DITHER_THRESHOLD, MAX_INTENSITY,
};
use crate::io::error::Result;
use crate::spatial::grid::{Grid, Raster};

// (row offset, column offset, share of the error) for not-yet-visited neighbours
const NEIGHBOURS: [(usize, isize, f64); 4] = [
    (0, 1, DIFFUSION_RIGHT),
    (1, -1, DIFFUSION_BELOW_LEFT),
    (1, 0, DIFFUSION_BELOW),
    (1, 1, DIFFUSION_BELOW_RIGHT),
];

/// Quantise every sample to 0 or 255, diffusing the rounding error forward
///
/// Pixels are visited in row-major order. Each one is compared against the
/// threshold after the error of earlier pixels has been added, and its own
/// error is added to the right, lower-left, lower and lower-right neighbours.
/// Neighbours outside the grid are skipped, so that share of the error is lost.
///
/// # Errors
///
/// Returns `FailedAllocation` if the output grid cannot be stored
pub fn dither_binary(image: &Grid<f64>) -> Result<Grid<f64>> {
    let (width, height) = image.dimensions();
    let mut field = image.to_vec();

    for index in 0..field.len() {
        let (row, col) = (index / width, index % width);
        let Some(current) = field.get_mut(index) else {
            continue;
        };
        let value = *current;
        let level = if value >= DITHER_THRESHOLD {
            MAX_INTENSITY
        } else {
            0.0
        };
        *current = level;
        let error = value - level;
        if error == 0.0 {
            continue;
        }

        for (row_offset, col_offset, share) in NEIGHBOURS {
            let target_row = row + row_offset;
            let Some(target_col) = col.checked_add_signed(col_offset) else {
                continue;
            };
            if target_row >= height || target_col >= width {
                continue;
            }
            if let Some(neighbour) = field.get_mut(target_row * width + target_col) {
                *neighbour = error.mul_add(share, *neighbour);
            }
        }
    }

    Grid::from_vec(width, height, field)
}

/// Halftone a raster of either kind, returning the same kind
///
/// Integer rasters are widened for the diffusion and narrowed back to 0/255.
///
/// # Errors
///
/// Returns `FailedAllocation` if an intermediate grid cannot be stored
pub fn dither_raster(raster: &Raster) -> Result<Raster> {
    match raster {
        Raster::Float(grid) => Ok(Raster::Float(dither_binary(grid)?)),
        Raster::Integer(grid) => Ok(Raster::Integer(
            dither_binary(&grid.to_float())?.to_integer(),
        )),
    }
}
