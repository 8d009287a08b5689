//! Grayscale raster loading and saving by file extension
//!
//! Netpbm extensions go through [`crate::io::pnm`]; every other extension is
//! handed to the `image` crate and converted to 8-bit luma.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::io::error::{InpaintError, Result};
use crate::io::pnm::{PnmEncoding, read_pnm, write_pnm};
use crate::spatial::grid::Grid;

const PNM_EXTENSIONS: [&str; 4] = ["pgm", "pbm", "pnm", "ppm"];

/// Whether `path` names a Netpbm file
pub fn is_pnm(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            PNM_EXTENSIONS
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(extension))
        })
}

/// Load a single-channel integer raster
///
/// # Errors
///
/// Returns `FileNotFound` if the file is missing, `InvalidFormat` /
/// `InvalidDimensions` for malformed Netpbm files and `ImageLoad` when the
/// `image` crate cannot decode the file
pub fn read_image(path: &Path) -> Result<Grid<i32>> {
    if !path.exists() {
        return Err(InpaintError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if is_pnm(path) {
        return read_pnm(path);
    }

    let decoded = image::open(path)
        .map_err(|source| InpaintError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);
    Grid::from_vec(
        width,
        height,
        decoded.pixels().map(|pixel| i32::from(pixel.0[0])).collect(),
    )
}

/// Save a raster, clamping samples to 0..=255
///
/// The parent directory is created when missing. Netpbm output is a binary
/// gray map.
///
/// # Errors
///
/// Returns `FileSystem` if the parent directory cannot be created,
/// `WriteFailed` for Netpbm write failures and `ImageExport` when the `image`
/// crate cannot encode the file
pub fn write_image(grid: &Grid<i32>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| InpaintError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source,
        })?;
    }

    if is_pnm(path) {
        return write_pnm(grid, path, PnmEncoding::Binary);
    }

    let (width, height) = grid.dimensions();
    let mut buffer = GrayImage::new(width as u32, height as u32);
    for (row, col, pixel) in buffer.enumerate_pixels_mut().map(|(x, y, pixel)| (y, x, pixel)) {
        let value = grid.get(row as usize, col as usize).unwrap_or(0);
        *pixel = Luma([value.clamp(0, 255) as u8]);
    }

    buffer.save(path).map_err(|source| InpaintError::ImageExport {
        path: path.to_path_buf(),
        source,
    })
}
