//! Command-line interface for inpainting, mask selection, halftoning and filtering

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::info;

use crate::algorithm::dithering::dither_raster;
use crate::algorithm::mask_generation::{MaskGenerator, random_mask};
use crate::algorithm::pipeline::{Inpainter, InpaintingConfig};
use crate::analysis::convolution::convolve;
use crate::analysis::kernel::{Kernel, KernelSpec};
use crate::analysis::statistics::psnr;
use crate::io::configuration::{
    DEFAULT_COMPRESSION_RATIO, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, DEFAULT_SMOOTHING_SIGMA,
    DEFAULT_TOLERANCE, DITHER_SUFFIX, FILTER_SUFFIX, INPAINT_SUFFIX, MASK_SUFFIX,
};
use crate::io::error::{Result, computation_error};
use crate::io::image::{read_image, write_image};
use crate::io::progress::SolverProgress;
use crate::spatial::grid::Raster;
use crate::spatial::mask::Mask;

#[derive(Parser, Debug)]
#[command(name = "pdeinpaint")]
#[command(
    author,
    version,
    about = "Compress grayscale images to a sparse pixel mask and reconstruct them by diffusion"
)]
/// Command-line arguments for the inpainting tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and summaries
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default `env_logger` filter implied by `--verbose`
    pub const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select a mask and reconstruct the image from it
    Inpaint(InpaintArgs),
    /// Write the selected mask as a 0/255 image
    Mask(MaskArgs),
    /// Halftone an image with Floyd-Steinberg error diffusion
    Dither(DitherArgs),
    /// Convolve an image with a named kernel
    Filter(FilterArgs),
}

/// Arguments of `inpaint`
#[derive(Args, Debug)]
pub struct InpaintArgs {
    /// Grayscale input image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (defaults to `<stem>_inpainted.<ext>` beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fraction of pixels to keep
    #[arg(short, long, default_value_t = DEFAULT_COMPRESSION_RATIO)]
    pub ratio: f64,

    /// Gaussian smoothing before edge detection
    #[arg(short, long, default_value_t = DEFAULT_SMOOTHING_SIGMA)]
    pub sigma: f64,

    /// Conjugate gradient iteration budget
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub iterations: usize,

    /// Absolute residual tolerance
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Use this mask image (non-zero = known) instead of selecting one
    #[arg(short, long)]
    pub mask: Option<PathBuf>,

    /// Also write the applied mask to this path
    #[arg(long)]
    pub mask_output: Option<PathBuf>,

    /// Fail if the solver does not reach the tolerance
    #[arg(long)]
    pub strict: bool,
}

/// Arguments of `mask`
#[derive(Args, Debug)]
pub struct MaskArgs {
    /// Grayscale input image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (defaults to `<stem>_mask.<ext>` beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fraction of pixels to keep
    #[arg(short, long, default_value_t = DEFAULT_COMPRESSION_RATIO)]
    pub ratio: f64,

    /// Gaussian smoothing before edge detection
    #[arg(short, long, default_value_t = DEFAULT_SMOOTHING_SIGMA)]
    pub sigma: f64,

    /// Pick pixels uniformly at random instead of near edges
    #[arg(long)]
    pub random: bool,

    /// Seed for `--random`
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Arguments of `dither`
#[derive(Args, Debug)]
pub struct DitherArgs {
    /// Grayscale input image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (defaults to `<stem>_dithered.<ext>` beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments of `filter`
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Grayscale input image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (defaults to `<stem>_filtered.<ext>` beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Kernel as `name[:p1,p2]`, e.g. `gaussian:1.5`, `sobel-x`, `laplacian`
    #[arg(short, long, default_value = "gaussian:1")]
    pub kernel: KernelSpec,

    /// Store absolute responses
    #[arg(short, long)]
    pub absolute: bool,
}

/// Derive `<stem><suffix>.<ext>` next to `input`
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let extension = input.extension().unwrap_or_default();
    let output_name = format!(
        "{}{}.{}",
        stem.to_string_lossy(),
        suffix,
        extension.to_string_lossy()
    );

    if let Some(parent) = input.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}

/// Executes the parsed command line
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the given arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected subcommand, returning the path written
    ///
    /// # Errors
    ///
    /// Returns the first I/O or processing failure of the subcommand
    pub fn run(&self) -> Result<PathBuf> {
        match &self.cli.command {
            Command::Inpaint(args) => self.run_inpaint(args),
            Command::Mask(args) => self.run_mask(args),
            Command::Dither(args) => self.run_dither(args),
            Command::Filter(args) => self.run_filter(args),
        }
    }

    fn run_inpaint(&self, args: &InpaintArgs) -> Result<PathBuf> {
        let start_time = Instant::now();
        let output = resolve(args.output.as_ref(), &args.input, INPAINT_SUFFIX);
        let image = read_image(&args.input)?.to_float();

        let inpainter = Inpainter::new(InpaintingConfig {
            compression_ratio: args.ratio,
            smoothing_sigma: args.sigma,
            max_iterations: args.iterations,
            tolerance: args.tolerance,
            require_convergence: args.strict,
        });
        let mask = match &args.mask {
            Some(path) => Mask::from_grid(&read_image(path)?)?,
            None => inpainter.mask_generator().generate(&image)?,
        };

        let mut progress = if self.cli.should_show_progress() {
            SolverProgress::new(&args.input, args.iterations)
        } else {
            SolverProgress::hidden()
        };
        let reconstruction =
            inpainter.reconstruct_observed(&image, &mask, &mut |report| progress.observe(report))?;
        progress.finish(reconstruction.iterations, reconstruction.converged);

        write_image(&reconstruction.image.to_intensity(), &output)?;
        if let Some(mask_path) = &args.mask_output {
            write_image(&reconstruction.mask.to_grid()?, mask_path)?;
        }

        let quality = psnr(&image, &reconstruction.image)?;
        info!(
            "{}: {} iterations, residual {:.3e}, PSNR {quality:.2} dB, {:.2?}",
            args.input.display(),
            reconstruction.iterations,
            reconstruction.residual_norm,
            start_time.elapsed()
        );
        self.report(&format!(
            "{} -> {} (kept {:.2}% of pixels, PSNR {quality:.2} dB)",
            args.input.display(),
            output.display(),
            reconstruction.mask.density() * 100.0
        ));
        Ok(output)
    }

    fn run_mask(&self, args: &MaskArgs) -> Result<PathBuf> {
        let output = resolve(args.output.as_ref(), &args.input, MASK_SUFFIX);
        let image = read_image(&args.input)?.to_float();
        let (width, height) = image.dimensions();

        let mask = if args.random {
            random_mask(width, height, args.ratio, args.seed)?
        } else {
            MaskGenerator::new(args.ratio)
                .with_sigma(args.sigma)
                .generate(&image)?
        };
        write_image(&mask.to_grid()?, &output)?;

        self.report(&format!(
            "{} -> {} ({} of {} pixels known)",
            args.input.display(),
            output.display(),
            mask.known_count(),
            mask.len()
        ));
        Ok(output)
    }

    fn run_dither(&self, args: &DitherArgs) -> Result<PathBuf> {
        let output = resolve(args.output.as_ref(), &args.input, DITHER_SUFFIX);
        let raster = Raster::Integer(read_image(&args.input)?);
        let dithered = dither_raster(&raster)?;
        write_image(dithered.as_integer()?, &output)?;

        self.report(&format!("{} -> {}", args.input.display(), output.display()));
        Ok(output)
    }

    fn run_filter(&self, args: &FilterArgs) -> Result<PathBuf> {
        let output = resolve(args.output.as_ref(), &args.input, FILTER_SUFFIX);
        let kernel = Kernel::new(args.kernel)?;
        let image = read_image(&args.input)?.to_float();

        let mut filtered = convolve(&image, &kernel)?;
        if args.absolute {
            filtered = filtered.map(f64::abs);
        }
        if filtered.iter().any(|value| !value.is_finite()) {
            return Err(computation_error(
                "filter",
                &"convolution produced non-finite samples",
            ));
        }
        write_image(&filtered.to_intensity(), &output)?;

        self.report(&format!(
            "{} -> {} ({} kernel)",
            args.input.display(),
            output.display(),
            kernel.family()
        ));
        Ok(output)
    }

    // Allow print for user feedback on completed files
    #[allow(clippy::print_stderr)]
    fn report(&self, message: &str) {
        if !self.cli.quiet {
            eprintln!("{message}");
        }
    }
}

fn resolve(explicit: Option<&PathBuf>, input: &Path, suffix: &str) -> PathBuf {
    explicit.cloned().unwrap_or_else(|| output_path(input, suffix))
}
