//! Reflective boundary handling shared by convolution and matrix assembly

use crate::io::error::{InpaintError, Result};

/// Reflect a coordinate back into `[0, len)`
///
/// Indices inside the axis are returned unchanged. Out-of-range indices are
/// mirrored about the edge including the edge sample itself, so `-1` maps to
/// `0` and `len` maps to `len - 1`. Only one reflection is supported.
///
/// # Errors
///
/// Returns `OutOfBounds` for indices outside `[-len, 2 * len - 1]`
pub fn mirror(index: isize, len: usize) -> Result<usize> {
    let extent = len as isize;
    let reflected = if (0..extent).contains(&index) {
        index
    } else if (-extent..0).contains(&index) {
        -index - 1
    } else if (extent..2 * extent).contains(&index) {
        2 * extent - index - 1
    } else {
        return Err(InpaintError::OutOfBounds { index, len });
    };
    Ok(reflected as usize)
}

/// Mirror `base + offset`, the common case of a stencil tap around a pixel
///
/// # Errors
///
/// Returns `OutOfBounds` under the same conditions as [`mirror`]
pub fn mirror_offset(base: usize, offset: isize, len: usize) -> Result<usize> {
    mirror(base as isize + offset, len)
}
