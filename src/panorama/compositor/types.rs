//! Padding configuration types

use crate::panorama::codec::FillColor;
use crate::panorama::common::error::{PadError, Result};
use crate::panorama::geometry::ImageDimensions;

/// PNG deflate effort for the padded output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompression {
    /// Fastest, largest file
    Fast,
    /// Balanced (default)
    Default,
    /// Smallest file, slowest
    Best,
}

/// Configuration for panorama padding
#[derive(Debug, Clone)]
pub struct PadConfig {
    /// Color of the synthesized padding rows
    pub fill: FillColor,
    /// Largest accepted source width or height; `None` disables the check
    pub max_dimension: Option<u32>,
    /// Pixel budget for images that have to be held as a whole frame: every JPEG input and
    /// output, and interlaced PNG input. Such a frame costs `pixels * channels` bytes, so
    /// the default of 64 megapixels bounds one RGB frame at 192 MB. `None` disables the check.
    pub max_frame_pixels: Option<u64>,
    /// Compression used when the output is PNG
    pub png_compression: PngCompression,
    /// Quality used when the output is JPEG, 1..=100
    pub jpeg_quality: u8,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            fill: FillColor::BLACK,
            max_dimension: Some(30_000),
            max_frame_pixels: Some(64_000_000),
            png_compression: PngCompression::Default,
            jpeg_quality: 90,
        }
    }
}

impl PadConfig {
    pub fn builder() -> PadConfigBuilder {
        PadConfigBuilder::default()
    }

    /// Rejects a whole-frame buffer for `dimensions` that would exceed `max_frame_pixels`.
    pub fn check_frame_budget(&self, dimensions: ImageDimensions) -> Result<()> {
        let pixels = dimensions.pixel_count();
        match self.max_frame_pixels {
            Some(max) if pixels > max => Err(PadError::FrameTooLarge { pixels, max }),
            _ => Ok(()),
        }
    }
}

/// Builder for PadConfig
#[derive(Default)]
pub struct PadConfigBuilder {
    fill: Option<FillColor>,
    max_dimension: Option<Option<u32>>,
    max_frame_pixels: Option<Option<u64>>,
    png_compression: Option<PngCompression>,
    jpeg_quality: Option<u8>,
}

impl PadConfigBuilder {
    pub fn fill(mut self, fill: FillColor) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn max_dimension(mut self, max: Option<u32>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn max_frame_pixels(mut self, max: Option<u64>) -> Self {
        self.max_frame_pixels = Some(max);
        self
    }

    pub fn png_compression(mut self, compression: PngCompression) -> Self {
        self.png_compression = Some(compression);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    pub fn build(self) -> PadConfig {
        let default = PadConfig::default();
        PadConfig {
            fill: self.fill.unwrap_or(default.fill),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            max_frame_pixels: self.max_frame_pixels.unwrap_or(default.max_frame_pixels),
            png_compression: self.png_compression.unwrap_or(default.png_compression),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality).clamp(1, 100),
        }
    }
}
