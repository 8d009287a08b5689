//! Spatial data structures shared by every stage
//!
//! This module contains:
//! - Dense sample grids and their runtime-tagged form
//! - Reflective boundary handling
//! - Binary known/unknown masks

/// Reflective index mirroring at grid edges
pub mod boundary;
/// Dense sample grids and element kinds
pub mod grid;
/// Known/unknown pixel masks
pub mod mask;

pub use grid::{Grid, Raster, Sample, SampleKind};
pub use mask::Mask;
