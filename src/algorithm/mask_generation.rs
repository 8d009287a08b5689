//! Selection of the pixels retained for reconstruction
//!
//! The Belhachmi heuristic keeps pixels where the smoothed image has a strong
//! Laplacian response, i.e. near edges, with a density steered by the
//! compression ratio. A uniformly random selection is provided as a baseline.

use bitvec::prelude::*;
use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use crate::algorithm::dithering::dither_binary;
use crate::analysis::convolution::convolve;
use crate::analysis::kernel::{Kernel, KernelSpec};
use crate::analysis::statistics::mean;
use crate::io::configuration::{
    DEFAULT_COMPRESSION_RATIO, DEFAULT_GAUSSIAN_ACCURACY, DEFAULT_SMOOTHING_SIGMA, MAX_INTENSITY,
};
use crate::io::error::{InpaintError, Result, invalid_parameter};
use crate::spatial::grid::{Grid, Raster};
use crate::spatial::mask::Mask;

/// Edge-driven mask selection
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskGenerator {
    /// Fraction of pixels to aim for; scales the mean response to `ratio * 255`
    pub compression_ratio: f64,
    /// Standard deviation of the Gaussian applied before the Laplacian
    pub sigma: f64,
}

impl Default for MaskGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_RATIO)
    }
}

impl MaskGenerator {
    /// Generator with the default smoothing
    pub const fn new(compression_ratio: f64) -> Self {
        Self {
            compression_ratio,
            sigma: DEFAULT_SMOOTHING_SIGMA,
        }
    }

    /// Replace the smoothing standard deviation
    #[must_use]
    pub const fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Select known pixels of `image`
    ///
    /// The image is smoothed with a Gaussian, passed through the Laplacian and
    /// made absolute. That response is scaled so its mean becomes
    /// `compression_ratio * 255` and binarised by error diffusion. Ratios large
    /// enough to saturate the field are accepted and simply yield dense masks.
    ///
    /// A flat response (constant image) is not scaled. If the quantiser keeps
    /// nothing, the pixel with the strongest response is retained so the mask
    /// is never empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a non-positive or non-finite ratio or
    /// sigma, and propagates convolution failures such as `OutOfBounds` for
    /// images smaller than the smoothing kernel
    pub fn generate(&self, image: &Grid<f64>) -> Result<Mask> {
        if !self.compression_ratio.is_finite() || self.compression_ratio <= 0.0 {
            return Err(invalid_parameter(
                "compression_ratio",
                &self.compression_ratio,
                &"must be a positive finite number",
            ));
        }

        let smoothing = Kernel::new(KernelSpec::Gaussian {
            sigma: self.sigma,
            accuracy: DEFAULT_GAUSSIAN_ACCURACY,
        })?;
        let laplacian = Kernel::new(KernelSpec::Laplacian)?;

        let smoothed = convolve(image, &smoothing)?;
        let response = convolve(&smoothed, &laplacian)?.map(f64::abs);

        let mean_response = mean(&response);
        let scale = if mean_response > f64::EPSILON {
            self.compression_ratio * MAX_INTENSITY / mean_response
        } else {
            0.0
        };
        let dithered = dither_binary(&response.map(|value| value * scale))?;

        let mut bits: BitVec = dithered.iter().map(|level| level > 0.0).collect();
        if bits.not_any() {
            let strongest = response
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (index, value)| {
                    if value > best.1 { (index, value) } else { best }
                })
                .0;
            debug!("Quantiser kept no pixels; retaining strongest response at {strongest}");
            bits.set(strongest, true);
        }

        let (width, height) = image.dimensions();
        let mask = Mask::new(width, height, bits)?;
        debug!(
            "Belhachmi mask {width}x{height}: mean response {mean_response:.4}, scale {scale:.4}, density {:.4}",
            mask.density()
        );
        Ok(mask)
    }

    /// Select known pixels of a runtime-tagged raster
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` unless the raster holds floating-point samples,
    /// plus the conditions of [`MaskGenerator::generate`]
    pub fn generate_from_raster(&self, raster: &Raster) -> Result<Mask> {
        self.generate(raster.as_float()?)
    }
}

/// Uniformly random selection of `round(density * width * height)` pixels
///
/// At least one pixel is always selected. The same seed yields the same mask.
///
/// # Errors
///
/// Returns `InvalidParameter` unless `0 < density <= 1` and
/// `InvalidDimensions` for a zero extent
pub fn random_mask(width: usize, height: usize, density: f64, seed: u64) -> Result<Mask> {
    if !(density > 0.0 && density <= 1.0) {
        return Err(invalid_parameter(
            "density",
            &density,
            &"must lie in (0, 1]",
        ));
    }
    let len = width
        .checked_mul(height)
        .filter(|&len| len > 0)
        .ok_or(InpaintError::InvalidDimensions { width, height })?;
    let amount = ((density * len as f64).round() as usize).clamp(1, len);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bits = bitvec![0; len];
    for index in rand::seq::index::sample(&mut rng, len, amount) {
        bits.set(index, true);
    }

    debug!("Random mask {width}x{height}: {amount} of {len} pixels, seed {seed}");
    Mask::new(width, height, bits)
}
