//! Convolution kernels for smoothing and edge detection
//!
//! Each kernel family is a variant of [`KernelSpec`] carrying exactly the
//! parameters it needs. Strings such as `"gaussian:1.5"` are resolved through
//! [`KernelSpec::parse`], which is where arity and family errors surface.

use std::fmt;
use std::str::FromStr;

use crate::io::configuration::{DEFAULT_GAUSSIAN_ACCURACY, MAX_GRID_DIMENSION};
use crate::io::error::{InpaintError, Result, invalid_parameter};
use crate::math::probability::normal_density;
use crate::spatial::grid::allocate;

// Validates Gaussian parameters and returns the half-width in taps
fn gaussian_half_width(sigma: f64, accuracy: f64) -> Result<usize> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(invalid_parameter(
            "sigma",
            &sigma,
            &"must be a positive finite number",
        ));
    }
    if !accuracy.is_finite() || accuracy <= 0.0 {
        return Err(invalid_parameter(
            "accuracy",
            &accuracy,
            &"must be a positive finite number",
        ));
    }
    let half = (accuracy * sigma).round();
    if half > MAX_GRID_DIMENSION as f64 {
        return Err(invalid_parameter(
            "sigma",
            &sigma,
            &format!("half-width {half} exceeds {MAX_GRID_DIMENSION} taps"),
        ));
    }
    Ok(half as usize)
}

/// Gradient direction of a Sobel kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal gradient (responds to vertical edges)
    X,
    /// Vertical gradient (responds to horizontal edges)
    Y,
}

/// Generating family of a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelFamily {
    /// Sampled normal density
    Gaussian,
    /// Horizontal Sobel gradient
    SobelX,
    /// Vertical Sobel gradient
    SobelY,
    /// Four-neighbour discrete Laplacian
    Laplacian,
}

impl KernelFamily {
    /// Canonical lowercase name, as accepted by [`KernelSpec::parse`]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::SobelX => "sobel-x",
            Self::SobelY => "sobel-y",
            Self::Laplacian => "laplacian",
        }
    }
}

impl fmt::Display for KernelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters identifying a kernel to construct
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelSpec {
    /// Separable Gaussian with half-width `round(accuracy * sigma)`
    Gaussian {
        /// Standard deviation in pixels
        sigma: f64,
        /// Half-width in multiples of `sigma`
        accuracy: f64,
    },
    /// 3x3 Sobel gradient
    Sobel {
        /// Gradient direction
        axis: Axis,
    },
    /// 3x3 Laplacian `{0,1,0; 1,-4,1; 0,1,0}`
    Laplacian,
}

impl KernelSpec {
    /// Gaussian with the default accuracy
    pub const fn gaussian(sigma: f64) -> Self {
        Self::Gaussian {
            sigma,
            accuracy: DEFAULT_GAUSSIAN_ACCURACY,
        }
    }

    /// Family this kernel description belongs to
    pub const fn family(&self) -> KernelFamily {
        match self {
            Self::Gaussian { .. } => KernelFamily::Gaussian,
            Self::Sobel { axis: Axis::X } => KernelFamily::SobelX,
            Self::Sobel { axis: Axis::Y } => KernelFamily::SobelY,
            Self::Laplacian => KernelFamily::Laplacian,
        }
    }

    /// Resolve a family name and its positional parameters
    ///
    /// Gaussian takes `sigma` and an optional `accuracy`; Sobel and Laplacian
    /// take none. Names are case-insensitive and accept `_` for `-`.
    ///
    /// # Errors
    ///
    /// Returns `NotImplemented` for an unknown family, `InvalidArgCount`
    /// when the parameter count does not fit the family and `InvalidParameter`
    /// for a Gaussian whose `sigma` or `accuracy` [`Kernel::new`] would refuse
    pub fn parse(name: &str, params: &[f64]) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "gaussian" => {
                let (sigma, accuracy) = match *params {
                    [sigma] => (sigma, DEFAULT_GAUSSIAN_ACCURACY),
                    [sigma, accuracy] => (sigma, accuracy),
                    _ => {
                        return Err(InpaintError::InvalidArgCount {
                            family: KernelFamily::Gaussian.name(),
                            expected: "1 or 2",
                            found: params.len(),
                        });
                    }
                };
                gaussian_half_width(sigma, accuracy)?;
                Ok(Self::Gaussian { sigma, accuracy })
            }
            "sobel-x" | "sobel-y" | "laplacian" => {
                let spec = match normalized.as_str() {
                    "sobel-x" => Self::Sobel { axis: Axis::X },
                    "sobel-y" => Self::Sobel { axis: Axis::Y },
                    _ => Self::Laplacian,
                };
                if params.is_empty() {
                    Ok(spec)
                } else {
                    Err(InpaintError::InvalidArgCount {
                        family: spec.family().name(),
                        expected: "0",
                        found: params.len(),
                    })
                }
            }
            _ => Err(InpaintError::NotImplemented {
                feature: format!("kernel family '{}'", name.trim()),
            }),
        }
    }
}

impl FromStr for KernelSpec {
    type Err = InpaintError;

    /// Parse `name` or `name:p1,p2,...`
    fn from_str(s: &str) -> Result<Self> {
        let (name, raw_params) = s.split_once(':').unwrap_or((s, ""));
        let params = raw_params
            .split(',')
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .map(|param| {
                param
                    .parse::<f64>()
                    .map_err(|parse_error| invalid_parameter("kernel", &param, &parse_error))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::parse(name, &params)
    }
}

/// Row-major weight matrix with odd width and height
///
/// A kernel of height 1 is separable: it is applied along rows and then
/// along columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
    family: KernelFamily,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Construct the kernel described by `spec`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a Gaussian `sigma` or `accuracy` is not a
    /// positive finite number or the half-width would exceed the grid limit
    pub fn new(spec: KernelSpec) -> Result<Self> {
        match spec {
            KernelSpec::Gaussian { sigma, accuracy } => Self::gaussian(sigma, accuracy),
            KernelSpec::Sobel { axis: Axis::X } => Self::from_weights(
                KernelFamily::SobelX,
                3,
                3,
                vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
            ),
            KernelSpec::Sobel { axis: Axis::Y } => Self::from_weights(
                KernelFamily::SobelY,
                3,
                3,
                vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
            ),
            KernelSpec::Laplacian => Self::from_weights(
                KernelFamily::Laplacian,
                3,
                3,
                vec![0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0],
            ),
        }
    }

    fn gaussian(sigma: f64, accuracy: f64) -> Result<Self> {
        let half = gaussian_half_width(sigma, accuracy)?;
        let mut weights = allocate(2 * half + 1, 0.0)?;
        for (tap, weight) in weights.iter_mut().enumerate() {
            *weight = normal_density(tap as f64 - half as f64, sigma);
        }
        let width = weights.len();
        Self::from_weights(KernelFamily::Gaussian, width, 1, weights)
    }

    /// Wrap explicit weights
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an even extent and `DimensionMismatch`
    /// if `weights.len() != width * height`
    pub fn from_weights(
        family: KernelFamily,
        width: usize,
        height: usize,
        weights: Vec<f64>,
    ) -> Result<Self> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(invalid_parameter(
                "kernel size",
                &format!("{width}x{height}"),
                &"width and height must be odd",
            ));
        }
        if width.checked_mul(height) != Some(weights.len()) {
            return Err(InpaintError::DimensionMismatch {
                expected: (width, height),
                found: (weights.len(), 1),
            });
        }
        Ok(Self {
            weights,
            family,
            width,
            height,
        })
    }

    /// Generating family
    pub const fn family(&self) -> KernelFamily {
        self.family
    }

    /// Number of taps per row
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Taps left or right of the centre
    pub const fn half_width(&self) -> usize {
        self.width / 2
    }

    /// Taps above or below the centre
    pub const fn half_height(&self) -> usize {
        self.height / 2
    }

    /// Whether the kernel is a 1D row applied in two passes
    pub const fn is_separable(&self) -> bool {
        self.height == 1
    }

    /// Weights in row-major order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at `(row, col)` of the kernel matrix
    pub fn weight(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.height && col < self.width {
            self.weights.get(row * self.width + col).copied()
        } else {
            None
        }
    }

    /// Expand a separable kernel into its full 2D outer product
    ///
    /// # Errors
    ///
    /// Returns `NotImplemented` if the kernel is not separable
    pub fn outer(&self) -> Result<Self> {
        if !self.is_separable() {
            return Err(InpaintError::NotImplemented {
                feature: format!("outer product of non-separable {} kernel", self.family),
            });
        }
        let weights = self
            .weights
            .iter()
            .flat_map(|row_weight| self.weights.iter().map(move |col_weight| row_weight * col_weight))
            .collect();
        Self::from_weights(self.family, self.width, self.width, weights)
    }
}
