/// Command-line parsing and subcommand execution
pub mod cli;
/// Default parameters and limits
pub mod configuration;
/// Error type shared by the crate
pub mod error;
/// Extension-based raster loading and saving
pub mod image;
/// Grayscale Netpbm codec
pub mod pnm;
/// Solver progress bars
pub mod progress;
