//! JPEG adapter on top of the image crate.
//!
//! The JPEG codecs available here work on whole frames, so this adapter keeps one frame
//! in memory and serves it through the row interface. The frame is only decoded when the
//! first row is requested, after the caller had a chance to check the dimensions. The
//! encoder collects the canvas the same way. Both frames are bounded by
//! `PadConfig::max_frame_pixels`.

use std::cell::Cell;
use std::io::{Read, Write};
use std::rc::Rc;

use image::ImageDecoder;
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use tracing::debug;

use crate::panorama::common::error::{PadError, Result};
use crate::panorama::codec::row_codec::RowCodec;
use crate::panorama::codec::sink::{RowSink, check_row_count};
use crate::panorama::codec::source::RowSource;
use crate::panorama::codec::tracked_read::TrackedRead;
use crate::panorama::codec::types::{DecodedImage, EncodeTarget, ImageFormat, PixelLayout};
use crate::panorama::compositor::PadConfig;
use crate::panorama::geometry::ImageDimensions;

pub struct JpegCodec;

impl RowCodec for JpegCodec {
    fn open_decoder<'a, R: Read + 'a>(&self, input: R) -> Result<DecodedImage<'a>> {
        let (input, exhausted) = TrackedRead::new(input);
        let decoder = JpegDecoder::new(input).map_err(decode_error)?;

        let (width, height) = decoder.dimensions();
        let layout = match decoder.color_type() {
            image::ColorType::L8 => PixelLayout::Gray,
            image::ColorType::Rgb8 => PixelLayout::Rgb,
            other => {
                return Err(PadError::UnsupportedFormat(format!("JPEG color type {:?}", other)));
            }
        };

        debug!("Opened JPEG {}x{} {:?}", width, height, layout);

        let dimensions = ImageDimensions::new(width, height);
        Ok(DecodedImage {
            format: ImageFormat::Jpeg,
            dimensions,
            layout,
            frame_buffered: true,
            rows: Box::new(JpegRowSource {
                decoder: Some(decoder),
                exhausted,
                row_len: layout.row_len(width),
                height,
                frame: Vec::new(),
                emitted: 0,
            }),
        })
    }

    fn encode(
        &self,
        output: &mut dyn Write,
        target: EncodeTarget,
        config: &PadConfig,
        write_rows: &mut dyn FnMut(&mut dyn RowSink) -> Result<()>,
    ) -> Result<()> {
        let EncodeTarget { dimensions, layout, .. } = target;
        let color = match layout {
            PixelLayout::Gray => image::ColorType::L8,
            PixelLayout::Rgb => image::ColorType::Rgb8,
            other => {
                return Err(PadError::EncodeError(format!("JPEG cannot store {:?} pixels", other)));
            }
        };
        config.check_frame_budget(dimensions)?;
        debug!(
            "Encoding JPEG {}x{} {:?} at quality {}",
            dimensions.width, dimensions.height, layout, config.jpeg_quality
        );

        let frame_len = usize::try_from(dimensions.pixel_count() * layout.channels() as u64)
            .map_err(|_| PadError::EncodeError("JPEG frame does not fit in memory".to_string()))?;
        let mut sink = JpegRowSink {
            height: dimensions.height,
            row_len: layout.row_len(dimensions.width),
            frame: Vec::with_capacity(frame_len),
            written: 0,
        };
        write_rows(&mut sink)?;
        check_row_count(&sink, dimensions.height)?;

        JpegEncoder::new_with_quality(output, config.jpeg_quality)
            .encode(&sink.frame, dimensions.width, dimensions.height, color)
            .map_err(encode_error)?;
        debug!("JPEG encoding complete");
        Ok(())
    }
}

pub struct JpegRowSource<R: Read> {
    decoder: Option<JpegDecoder<TrackedRead<R>>>,
    exhausted: Rc<Cell<bool>>,
    row_len: usize,
    height: u32,
    frame: Vec<u8>,
    emitted: u32,
}

impl<R: Read> RowSource for JpegRowSource<R> {
    fn next_row(&mut self) -> Result<Option<&[u8]>> {
        if let Some(decoder) = self.decoder.take() {
            let total = usize::try_from(decoder.total_bytes())
                .map_err(|_| PadError::DecodeError("JPEG frame does not fit in memory".to_string()))?;
            debug!("Decoding JPEG frame, {} bytes", total);
            self.frame = vec![0u8; total];
            decoder.read_image(&mut self.frame).map_err(|e| {
                if self.exhausted.get() {
                    PadError::TruncatedInput {
                        expected: self.height,
                        received: 0,
                    }
                } else {
                    decode_error(e)
                }
            })?;
        }

        if self.emitted >= self.height {
            return Ok(None);
        }
        let start = self.emitted as usize * self.row_len;
        self.emitted += 1;
        Ok(self.frame.get(start..start + self.row_len))
    }
}

/// Collects the canvas rows; the image crate encodes JPEG from a complete frame.
pub struct JpegRowSink {
    height: u32,
    row_len: usize,
    frame: Vec<u8>,
    written: u32,
}

impl RowSink for JpegRowSink {
    fn write_row(&mut self, row: &[u8]) -> Result<()> {
        if row.len() != self.row_len {
            return Err(PadError::RowLengthMismatch {
                expected: self.row_len,
                actual: row.len(),
            });
        }
        self.written = self.written.saturating_add(1);
        if self.written <= self.height {
            self.frame.extend_from_slice(row);
        }
        Ok(())
    }

    fn rows_written(&self) -> u32 {
        self.written
    }
}

fn decode_error(err: image::ImageError) -> PadError {
    match err {
        image::ImageError::IoError(e) => PadError::IoError(e),
        other => PadError::DecodeError(other.to_string()),
    }
}

fn encode_error(err: image::ImageError) -> PadError {
    match err {
        image::ImageError::IoError(e) => PadError::IoError(e),
        other => PadError::EncodeError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_gray(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![128u8; (width * height) as usize];
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, 95)
            .encode(&pixels, width, height, image::ColorType::L8)
            .unwrap();
        bytes
    }

    #[test]
    fn reads_header_and_rows() {
        let bytes = encode_gray(16, 8);
        let mut decoded = JpegCodec.open_decoder(bytes.as_slice()).unwrap();
        assert_eq!(decoded.dimensions, ImageDimensions::new(16, 8));
        assert_eq!(decoded.layout, PixelLayout::Gray);

        let mut rows = 0;
        while let Some(row) = decoded.rows.next_row().unwrap() {
            assert_eq!(row.len(), 16);
            assert!(row.iter().all(|&v| v.abs_diff(128) <= 2));
            rows += 1;
        }
        assert_eq!(rows, 8);
    }

    fn gray_target(width: u32, height: u32) -> EncodeTarget {
        EncodeTarget {
            format: ImageFormat::Jpeg,
            dimensions: ImageDimensions::new(width, height),
            layout: PixelLayout::Gray,
        }
    }

    #[test]
    fn encoder_rejects_alpha_layouts() {
        let mut out = Vec::new();
        let target = EncodeTarget {
            layout: PixelLayout::Rgba,
            ..gray_target(2, 2)
        };
        let err = JpegCodec
            .encode(&mut out, target, &PadConfig::default(), &mut |_: &mut dyn RowSink| -> Result<()> {
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, PadError::EncodeError(_)));
    }

    #[test]
    fn encoder_counts_rows() {
        let mut out = Vec::new();
        let err = JpegCodec
            .encode(&mut out, gray_target(2, 2), &PadConfig::default(), &mut |sink: &mut dyn RowSink| -> Result<()> {
                sink.write_row(&[0, 0])
            })
            .unwrap_err();
        assert!(matches!(err, PadError::RowCountMismatch { expected: 2, written: 1 }));
        assert!(out.is_empty());
    }

    #[test]
    fn encoder_enforces_frame_budget_before_pulling_rows() {
        let mut out = Vec::new();
        let mut called = false;
        let config = PadConfig::builder().max_frame_pixels(Some(100)).build();
        let err = JpegCodec
            .encode(&mut out, gray_target(20, 10), &config, &mut |_: &mut dyn RowSink| -> Result<()> {
                called = true;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, PadError::FrameTooLarge { pixels: 200, max: 100 }));
        assert!(!called);
    }

    #[test]
    fn encodes_gray_frame() {
        let mut out = Vec::new();
        JpegCodec
            .encode(&mut out, gray_target(8, 8), &PadConfig::default(), &mut |sink: &mut dyn RowSink| -> Result<()> {
                for _ in 0..8 {
                    sink.write_row(&[60; 8])?;
                }
                Ok(())
            })
            .unwrap();

        let decoded = JpegCodec.open_decoder(out.as_slice()).unwrap();
        assert_eq!(decoded.dimensions, ImageDimensions::new(8, 8));
        assert!(decoded.frame_buffered);
    }
}
