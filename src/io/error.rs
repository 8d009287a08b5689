//! Error types shared by every inpainting stage and the image collaborators

use std::fmt;
use std::path::PathBuf;

use crate::spatial::grid::SampleKind;

/// Main error type for all inpainting operations
#[derive(Debug)]
pub enum InpaintError {
    /// Grid holds the wrong element kind for the requested operation
    InvalidType {
        /// Element kind the operation needs
        expected: SampleKind,
        /// Element kind that was supplied
        found: SampleKind,
    },

    /// Kernel family was given an unsupported number of parameters
    InvalidArgCount {
        /// Kernel family name
        family: &'static str,
        /// Accepted parameter counts, for the message
        expected: &'static str,
        /// Number of parameters supplied
        found: usize,
    },

    /// Two grids expected to share a shape do not
    DimensionMismatch {
        /// Shape that was required (width, height)
        expected: (usize, usize),
        /// Shape that was supplied (width, height)
        found: (usize, usize),
    },

    /// Boundary mirroring requested further than one image extent from the edge
    OutOfBounds {
        /// Requested coordinate
        index: isize,
        /// Extent of the mirrored axis
        len: usize,
    },

    /// Requested feature or kernel family is not supported
    NotImplemented {
        /// What was requested
        feature: String,
    },

    /// Conjugate gradient ran out of iterations before reaching the tolerance
    NonConvergence {
        /// Iterations performed
        iterations: usize,
        /// Residual norm after the last iteration
        residual: f64,
        /// Tolerance that was requested
        tolerance: f64,
    },

    /// Grid or matrix storage could not be allocated
    FailedAllocation {
        /// Number of elements requested
        elements: usize,
    },

    /// Mask marks no pixel as known
    EmptyMask {
        /// Mask dimensions (width, height)
        dimensions: (usize, usize),
    },

    /// Image file does not exist
    FileNotFound {
        /// Path that was opened
        path: PathBuf,
    },

    /// Image file is malformed or of an unsupported variant
    InvalidFormat {
        /// Path of the offending file
        path: PathBuf,
        /// Description of the problem
        reason: String,
    },

    /// Image or grid dimensions are unusable
    InvalidDimensions {
        /// Width that was read or requested
        width: usize,
        /// Height that was read or requested
        height: usize,
    },

    /// Image could not be written
    WriteFailed {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to decode an image through the `image` crate
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode an image through the `image` crate
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Numerical computation produced an invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for InpaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidType { expected, found } => {
                write!(f, "Invalid grid type: expected {expected}, found {found}")
            }
            Self::InvalidArgCount {
                family,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Kernel '{family}' takes {expected} parameter(s), got {found}"
                )
            }
            Self::DimensionMismatch { expected, found } => {
                write!(
                    f,
                    "Dimension mismatch: expected {}x{}, found {}x{}",
                    expected.0, expected.1, found.0, found.1
                )
            }
            Self::OutOfBounds { index, len } => {
                write!(
                    f,
                    "Index {index} cannot be mirrored into an axis of length {len}"
                )
            }
            Self::NotImplemented { feature } => write!(f, "Not implemented: {feature}"),
            Self::NonConvergence {
                iterations,
                residual,
                tolerance,
            } => {
                write!(
                    f,
                    "Solver did not converge after {iterations} iterations (residual {residual:e}, tolerance {tolerance:e})"
                )
            }
            Self::FailedAllocation { elements } => {
                write!(f, "Failed to allocate storage for {elements} elements")
            }
            Self::EmptyMask { dimensions } => {
                write!(
                    f,
                    "Mask of size {}x{} has no known pixels",
                    dimensions.0, dimensions.1
                )
            }
            Self::FileNotFound { path } => write!(f, "File not found: '{}'", path.display()),
            Self::InvalidFormat { path, reason } => {
                write!(f, "Invalid image format in '{}': {reason}", path.display())
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions {width}x{height}")
            }
            Self::WriteFailed { path, source } => {
                write!(f, "Failed to write '{}': {source}", path.display())
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for InpaintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } | Self::WriteFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for inpainting results
pub type Result<T> = std::result::Result<T, InpaintError>;

impl From<image::ImageError> for InpaintError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for InpaintError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> InpaintError {
    InpaintError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> InpaintError {
    InpaintError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Fail with `DimensionMismatch` unless both shapes agree
///
/// # Errors
///
/// Returns `DimensionMismatch` when `found` differs from `expected`
pub fn ensure_same_shape(expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(InpaintError::DimensionMismatch { expected, found })
    }
}
