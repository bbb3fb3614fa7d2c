//! Codec value types

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::panorama::codec::source::RowSource;
use crate::panorama::geometry::ImageDimensions;

/// Container formats the engine can stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => f.write_str("PNG"),
            ImageFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// 8-bit interleaved pixel layout of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::GrayAlpha => 2,
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }

    pub fn row_len(&self, width: u32) -> usize {
        width as usize * self.channels()
    }

    /// Builds one padding row of `width` pixels in this layout.
    pub fn fill_row(&self, width: u32, fill: FillColor) -> Vec<u8> {
        let pixel = fill.pixel(*self);
        let mut row = Vec::with_capacity(self.row_len(width));
        for _ in 0..width {
            row.extend_from_slice(&pixel);
        }
        row
    }
}

/// Padding color. Defaults to opaque black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl FillColor {
    pub const BLACK: FillColor = FillColor::rgba(0, 0, 0, 255);
    pub const WHITE: FillColor = FillColor::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: FillColor = FillColor::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Rec.601 luma, integer approximation.
    pub fn luma(&self) -> u8 {
        let y = (77u32 * self.r as u32 + 150u32 * self.g as u32 + 29u32 * self.b as u32 + 128) >> 8;
        y as u8
    }

    pub fn pixel(&self, layout: PixelLayout) -> Vec<u8> {
        match layout {
            PixelLayout::Gray => vec![self.luma()],
            PixelLayout::GrayAlpha => vec![self.luma(), self.a],
            PixelLayout::Rgb => vec![self.r, self.g, self.b],
            PixelLayout::Rgba => vec![self.r, self.g, self.b, self.a],
        }
    }
}

impl Default for FillColor {
    fn default() -> Self {
        FillColor::BLACK
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid fill color `{0}`, expected #rrggbb or #rrggbbaa")]
pub struct ParseFillColorError(pub String);

impl FromStr for FillColor {
    type Err = ParseFillColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || ParseFillColorError(s.to_string());
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(FillColor::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

/// Header information plus the lazy row stream of an opened input.
pub struct DecodedImage<'a> {
    pub format: ImageFormat,
    pub dimensions: ImageDimensions,
    pub layout: PixelLayout,
    /// The decoder holds the whole frame in memory before the first row is served.
    pub frame_buffered: bool,
    pub rows: Box<dyn RowSource + 'a>,
}

impl fmt::Debug for DecodedImage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("format", &self.format)
            .field("dimensions", &self.dimensions)
            .field("layout", &self.layout)
            .field("frame_buffered", &self.frame_buffered)
            .finish_non_exhaustive()
    }
}

/// What an encoder is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeTarget {
    pub format: ImageFormat,
    pub dimensions: ImageDimensions,
    pub layout: PixelLayout,
}
