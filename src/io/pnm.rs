//! Grayscale Netpbm reading and writing on top of the `image` PNM codec
//!
//! Bit maps (P1, P4) and gray maps (P2, P5) decode to integer grids on the
//! 0..=255 scale: a set bit is black and becomes 0, and gray maps with a
//! maxval other than 255 are rescaled. Colour pixmaps are rejected instead of
//! being converted. Headers are checked against the grid limits and the input
//! length before any raster storage is reserved.

use std::path::Path;

use image::codecs::pnm::{PnmDecoder, PnmEncoder, PnmHeader, PnmSubtype, SampleEncoding};
use image::{ColorType, DynamicImage, ExtendedColorType, ImageDecoder};

use crate::io::configuration::{MAX_GRID_DIMENSION, MAX_INTENSITY};
use crate::io::error::{InpaintError, Result, computation_error};
use crate::spatial::grid::Grid;

/// Body encoding of a written gray map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PnmEncoding {
    /// ASCII samples (P2)
    Plain,
    /// One byte per sample (P5)
    #[default]
    Binary,
}

impl PnmEncoding {
    const fn subtype(self) -> PnmSubtype {
        match self {
            Self::Plain => PnmSubtype::Graymap(SampleEncoding::Ascii),
            Self::Binary => PnmSubtype::Graymap(SampleEncoding::Binary),
        }
    }
}

fn invalid_format(path: &Path, reason: &impl ToString) -> InpaintError {
    InpaintError::InvalidFormat {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

// Fewest input bytes that can hold the raster; ASCII samples take at least one byte each
fn minimum_body_len(header: &PnmHeader, width: usize, height: usize, decoded: u64) -> u64 {
    let samples = (width as u64).saturating_mul(height as u64);
    match header.subtype() {
        PnmSubtype::Bitmap(SampleEncoding::Binary) => {
            (width.div_ceil(8) as u64).saturating_mul(height as u64)
        }
        PnmSubtype::Graymap(SampleEncoding::Binary) => decoded,
        _ => samples,
    }
}

/// Decode an in-memory Netpbm file; `path` is only used in error messages
///
/// # Errors
///
/// Returns `InvalidFormat` for unsupported magic numbers, colour or alpha
/// samples, malformed headers and truncated bodies, and `InvalidDimensions`
/// for a zero width or height or one above the grid limit
pub fn decode_pnm(bytes: &[u8], path: &Path) -> Result<Grid<i32>> {
    let decoder = PnmDecoder::new(bytes).map_err(|error| invalid_format(path, &error))?;

    match decoder.color_type() {
        ColorType::L8 | ColorType::L16 => {}
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgba8 | ColorType::Rgba16 => {
            return Err(invalid_format(path, &"colour pixmaps are not supported"));
        }
        other => {
            return Err(invalid_format(
                path,
                &format!("{other:?} samples are not supported"),
            ));
        }
    }

    let (width, height) = decoder.dimensions();
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 || width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
        return Err(InpaintError::InvalidDimensions { width, height });
    }

    let required = minimum_body_len(decoder.header(), width, height, decoder.total_bytes());
    if (bytes.len() as u64) < required {
        return Err(invalid_format(
            path,
            &format!(
                "raster data truncated: {} bytes present, at least {required} expected",
                bytes.len()
            ),
        ));
    }

    let decoded = DynamicImage::from_decoder(decoder)
        .map_err(|error| invalid_format(path, &error))?
        .into_luma8();
    Grid::from_vec(
        width,
        height,
        decoded.pixels().map(|pixel| i32::from(pixel.0[0])).collect(),
    )
}

/// Read a grayscale Netpbm file
///
/// # Errors
///
/// Returns `FileNotFound` if the file does not exist, `FileSystem` for other
/// read failures and the conditions of [`decode_pnm`]
pub fn read_pnm(path: &Path) -> Result<Grid<i32>> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            InpaintError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            InpaintError::FileSystem {
                path: path.to_path_buf(),
                operation: "read",
                source,
            }
        }
    })?;
    decode_pnm(&bytes, path)
}

/// Encode a grid as a gray map with maxval 255, clamping samples to 0..=255
///
/// Plain output wraps its lines at 70 characters.
///
/// # Errors
///
/// Returns `InvalidDimensions` if the grid is too wide for the format and
/// `Computation` if the codec rejects the raster
pub fn encode_pnm(grid: &Grid<i32>, encoding: PnmEncoding) -> Result<Vec<u8>> {
    let (width, height) = grid.dimensions();
    let (Ok(columns), Ok(rows)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(InpaintError::InvalidDimensions { width, height });
    };
    let samples: Vec<u8> = grid
        .iter()
        .map(|value| value.clamp(0, MAX_INTENSITY as i32) as u8)
        .collect();

    let mut output = Vec::new();
    PnmEncoder::new(&mut output)
        .with_subtype(encoding.subtype())
        .encode(samples.as_slice(), columns, rows, ExtendedColorType::L8)
        .map_err(|error| computation_error("PNM encoding", &error))?;
    Ok(output)
}

/// Write a grid as a gray map
///
/// # Errors
///
/// Returns `WriteFailed` if the file cannot be written, plus the conditions
/// of [`encode_pnm`]
pub fn write_pnm(grid: &Grid<i32>, path: &Path, encoding: PnmEncoding) -> Result<()> {
    let encoded = encode_pnm(grid, encoding)?;
    std::fs::write(path, encoded).map_err(|source| InpaintError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
