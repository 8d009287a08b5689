//! End-to-end inpainting: mask selection, operator assembly, solve, scatter

use log::{debug, info};

use crate::algorithm::diffusion::DiffusionMatrix;
use crate::algorithm::mask_generation::MaskGenerator;
use crate::algorithm::solver::{ConjugateGradient, IterationReport};
use crate::io::configuration::{
    DEFAULT_COMPRESSION_RATIO, DEFAULT_MAX_ITERATIONS, DEFAULT_SMOOTHING_SIGMA, DEFAULT_TOLERANCE,
};
use crate::io::error::{Result, ensure_same_shape};
use crate::spatial::grid::{Grid, allocate};
use crate::spatial::mask::Mask;

/// Parameters of a full inpainting run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InpaintingConfig {
    /// Target fraction of retained pixels for the generated mask
    pub compression_ratio: f64,
    /// Gaussian standard deviation used before edge detection
    pub smoothing_sigma: f64,
    /// Conjugate gradient iteration budget
    pub max_iterations: usize,
    /// Absolute residual tolerance of the solve
    pub tolerance: f64,
    /// Fail with `NonConvergence` instead of returning an unconverged result
    pub require_convergence: bool,
}

impl Default for InpaintingConfig {
    fn default() -> Self {
        Self {
            compression_ratio: DEFAULT_COMPRESSION_RATIO,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            require_convergence: false,
        }
    }
}

/// Reconstructed image together with how it was obtained
#[derive(Clone, Debug, PartialEq)]
pub struct Reconstruction {
    /// Image with unknown pixels filled in
    pub image: Grid<f64>,
    /// Mask that was applied
    pub mask: Mask,
    /// Solver iterations spent
    pub iterations: usize,
    /// Residual norm at termination
    pub residual_norm: f64,
    /// Whether the solve reached its tolerance
    pub converged: bool,
}

/// Runs the diffusion inpainting pipeline
#[derive(Clone, Copy, Debug, Default)]
pub struct Inpainter {
    config: InpaintingConfig,
}

impl Inpainter {
    /// Inpainter with the given configuration
    pub const fn new(config: InpaintingConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub const fn config(&self) -> &InpaintingConfig {
        &self.config
    }

    /// Mask generator derived from the configuration
    pub const fn mask_generator(&self) -> MaskGenerator {
        MaskGenerator::new(self.config.compression_ratio).with_sigma(self.config.smoothing_sigma)
    }

    /// Generate a mask for `image` and reconstruct from it
    ///
    /// # Errors
    ///
    /// See [`Inpainter::inpaint_observed`]
    pub fn inpaint(&self, image: &Grid<f64>) -> Result<Reconstruction> {
        self.inpaint_observed(image, &mut |_| {})
    }

    /// Generate a mask for `image` and reconstruct from it, reporting solver progress
    ///
    /// # Errors
    ///
    /// Propagates mask generation failures and those of
    /// [`Inpainter::reconstruct_observed`]
    pub fn inpaint_observed(
        &self,
        image: &Grid<f64>,
        observer: &mut dyn FnMut(&IterationReport),
    ) -> Result<Reconstruction> {
        let mask = self.mask_generator().generate(image)?;
        self.reconstruct_observed(image, &mask, observer)
    }

    /// Reconstruct `image` from the pixels selected by `mask`
    ///
    /// # Errors
    ///
    /// See [`Inpainter::reconstruct_observed`]
    pub fn reconstruct(&self, image: &Grid<f64>, mask: &Mask) -> Result<Reconstruction> {
        self.reconstruct_observed(image, mask, &mut |_| {})
    }

    /// Reconstruct `image` from the pixels selected by `mask`, reporting solver progress
    ///
    /// Known pixels are copied from `image` unchanged. A mask with every pixel
    /// known returns the input without solving.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if mask and image differ in shape,
    /// `NonConvergence` if convergence is required and not reached, and
    /// propagates assembly and solver failures
    pub fn reconstruct_observed(
        &self,
        image: &Grid<f64>,
        mask: &Mask,
        observer: &mut dyn FnMut(&IterationReport),
    ) -> Result<Reconstruction> {
        ensure_same_shape(mask.dimensions(), image.dimensions())?;
        let (width, height) = image.dimensions();

        if mask.is_fully_known() {
            debug!("Mask keeps every pixel of the {width}x{height} image; skipping solve");
            return Ok(Reconstruction {
                image: image.clone(),
                mask: mask.clone(),
                iterations: 0,
                residual_norm: 0.0,
                converged: true,
            });
        }

        let matrix = DiffusionMatrix::build(mask)?;
        let b = matrix.rhs(image)?;
        let guess = initial_guess(image, mask)?;
        debug!(
            "Assembled {}-row diffusion operator with {} unknowns",
            mask.len(),
            mask.len() - mask.known_count()
        );

        let solver = ConjugateGradient::new(self.config.max_iterations, self.config.tolerance);
        let solution = solver.solve_observed(&matrix, &b, Some(&guess), observer)?;
        let (iterations, residual_norm, converged) =
            (solution.iterations, solution.residual_norm, solution.converged);
        let values = if self.config.require_convergence {
            solution.into_converged()?
        } else {
            solution.x
        };

        let reconstructed = Grid::from_fn(width, height, |row, col| {
            if mask.is_known(row, col) {
                image.get(row, col).unwrap_or(0.0)
            } else {
                values.get(row * width + col).copied().unwrap_or(0.0)
            }
        })?;

        info!(
            "Reconstructed {width}x{height} image from {} known pixels ({:.2}%) in {iterations} iterations",
            mask.known_count(),
            mask.density() * 100.0
        );

        Ok(Reconstruction {
            image: reconstructed,
            mask: mask.clone(),
            iterations,
            residual_norm,
            converged,
        })
    }
}

// Known rows start at their value, unknown rows at the mean known value
fn initial_guess(image: &Grid<f64>, mask: &Mask) -> Result<Vec<f64>> {
    let known_total: f64 = mask
        .known_indices()
        .filter_map(|index| image.get_linear(index))
        .sum();
    let fill = known_total / mask.known_count() as f64;

    let mut guess = allocate(mask.len(), fill)?;
    for index in mask.known_indices() {
        if let (Some(entry), Some(value)) = (guess.get_mut(index), image.get_linear(index)) {
            *entry = value;
        }
    }
    Ok(guess)
}

/// Inpaint `image` with a Belhachmi mask at `compression_ratio`
///
/// Convenience wrapper over [`Inpainter`] with default smoothing that
/// returns only the reconstructed grid; an unconverged solve is still
/// returned.
///
/// # Errors
///
/// Propagates the first failure of any stage
pub fn inpaint(
    image: &Grid<f64>,
    compression_ratio: f64,
    max_iterations: usize,
    tolerance: f64,
) -> Result<Grid<f64>> {
    let inpainter = Inpainter::new(InpaintingConfig {
        compression_ratio,
        max_iterations,
        tolerance,
        ..InpaintingConfig::default()
    });
    inpainter.inpaint(image).map(|reconstruction| reconstruction.image)
}
