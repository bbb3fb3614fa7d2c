//! Equirectangular canvas geometry
//!
//! Pure computation of the full canvas and crop rectangle for a source image. No I/O.

mod calculator;
pub mod types;

pub use calculator::compute_geometry;
pub use types::{ImageDimensions, PanoramaDescriptor};
