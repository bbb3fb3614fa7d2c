//! Geometry value types

use serde::Serialize;

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Crop placement of a photograph inside a 2:1 equirectangular canvas.
///
/// Field names follow the GPano vocabulary used by panorama viewers
/// (`FullPanoWidthPixels`, `CroppedAreaTopPixels`, ...). Serializes with camelCase names.
///
/// Invariants for every descriptor produced by [`compute_geometry`](super::compute_geometry):
/// - `full_width == cropped_width` and `cropped_left == 0`
/// - `full_height` is half of `full_width`, rounded half up
/// - `cropped_top + cropped_height <= full_height`
/// - the crop is vertically centered, odd remainder row at the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanoramaDescriptor {
    pub full_width: u32,
    pub full_height: u32,
    pub cropped_width: u32,
    pub cropped_height: u32,
    pub cropped_left: u32,
    pub cropped_top: u32,
}

impl PanoramaDescriptor {
    /// Dimensions of the padded output canvas.
    pub fn full_dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.full_width, self.full_height)
    }

    /// Number of synthesized rows above the photograph.
    pub fn padding_top(&self) -> u32 {
        self.cropped_top
    }

    /// Number of synthesized rows below the photograph.
    pub fn padding_bottom(&self) -> u32 {
        self.full_height - self.cropped_top - self.cropped_height
    }

    /// True when the photograph fills the canvas height and no padding rows are written.
    pub fn is_full_height(&self) -> bool {
        self.cropped_height == self.full_height
    }

    /// True when `source` was taller than the canvas and rows had to be dropped.
    pub fn is_clipped(&self, source: ImageDimensions) -> bool {
        source.height > self.cropped_height
    }
}
