//! PNG row streaming on top of the png crate.
//!
//! Inputs are normalised to 8-bit samples (palette and low bit depths expanded, 16-bit
//! stripped). Non-interlaced images stream one row at a time; Adam7 images have to be
//! de-interlaced into a full frame before the first row is available.

use std::cell::Cell;
use std::io::{Read, Write};
use std::rc::Rc;

use tracing::debug;

use crate::panorama::common::error::{PadError, Result};
use crate::panorama::codec::row_codec::RowCodec;
use crate::panorama::codec::sink::{RowSink, check_row_count};
use crate::panorama::codec::source::RowSource;
use crate::panorama::codec::tracked_read::TrackedRead;
use crate::panorama::codec::types::{DecodedImage, EncodeTarget, ImageFormat, PixelLayout};
use crate::panorama::compositor::{PadConfig, PngCompression};
use crate::panorama::geometry::ImageDimensions;

pub struct PngCodec;

impl RowCodec for PngCodec {
    fn open_decoder<'a, R: Read + 'a>(&self, input: R) -> Result<DecodedImage<'a>> {
        let (input, exhausted) = TrackedRead::new(input);

        // dimension limits are enforced by the compositor once the header is known
        let mut decoder = png::Decoder::new_with_limits(input, png::Limits { bytes: usize::MAX });
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let reader = decoder.read_info().map_err(header_error)?;

        let info = reader.info();
        let dimensions = ImageDimensions::new(info.width, info.height);
        let interlaced = info.interlaced;

        let layout = match reader.output_color_type() {
            (png::ColorType::Grayscale, png::BitDepth::Eight) => PixelLayout::Gray,
            (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => PixelLayout::GrayAlpha,
            (png::ColorType::Rgb, png::BitDepth::Eight) => PixelLayout::Rgb,
            (png::ColorType::Rgba, png::BitDepth::Eight) => PixelLayout::Rgba,
            (color, depth) => {
                return Err(PadError::UnsupportedFormat(format!(
                    "PNG output {:?}/{:?}",
                    color, depth
                )));
            }
        };

        debug!(
            "Opened PNG {}x{} {:?}, interlaced={}",
            dimensions.width, dimensions.height, layout, interlaced
        );

        let line_size = reader.output_line_size(dimensions.width);
        Ok(DecodedImage {
            format: ImageFormat::Png,
            dimensions,
            layout,
            frame_buffered: interlaced,
            rows: Box::new(PngRowSource {
                reader,
                exhausted,
                height: dimensions.height,
                line_size,
                interlaced,
                frame: None,
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
        debug!("Encoding PNG {}x{} {:?}", dimensions.width, dimensions.height, layout);

        let color = match layout {
            PixelLayout::Gray => png::ColorType::Grayscale,
            PixelLayout::GrayAlpha => png::ColorType::GrayscaleAlpha,
            PixelLayout::Rgb => png::ColorType::Rgb,
            PixelLayout::Rgba => png::ColorType::Rgba,
        };
        let compression = match config.png_compression {
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Default => png::Compression::Default,
            PngCompression::Best => png::Compression::Best,
        };

        let mut encoder = png::Encoder::new(output, dimensions.width, dimensions.height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(compression);

        let mut writer = encoder.write_header().map_err(encode_error)?;
        {
            let mut sink = PngRowSink {
                stream: writer.stream_writer().map_err(encode_error)?,
                height: dimensions.height,
                row_len: layout.row_len(dimensions.width),
                written: 0,
            };
            write_rows(&mut sink)?;
            check_row_count(&sink, dimensions.height)?;
            sink.stream.finish().map_err(encode_error)?;
        }
        writer.finish().map_err(encode_error)?;

        debug!("PNG encoding complete");
        Ok(())
    }
}

pub struct PngRowSource<R: Read> {
    reader: png::Reader<TrackedRead<R>>,
    exhausted: Rc<Cell<bool>>,
    height: u32,
    line_size: usize,
    interlaced: bool,
    frame: Option<Vec<u8>>,
    emitted: u32,
}

impl<R: Read> RowSource for PngRowSource<R> {
    fn next_row(&mut self) -> Result<Option<&[u8]>> {
        if self.emitted >= self.height {
            return Ok(None);
        }

        if self.interlaced {
            if self.frame.is_none() {
                debug!("De-interlacing PNG into a {} byte frame", self.reader.output_buffer_size());
                let mut frame = vec![0u8; self.reader.output_buffer_size()];
                self.reader
                    .next_frame(&mut frame)
                    .map_err(|e| row_error(e, &self.exhausted, self.height, self.emitted))?;
                self.frame = Some(frame);
            }
            let start = self.emitted as usize * self.line_size;
            self.emitted += 1;
            return Ok(self
                .frame
                .as_deref()
                .map(|frame| &frame[start..start + self.line_size]));
        }

        match self.reader.next_row() {
            Ok(Some(row)) => {
                self.emitted += 1;
                Ok(Some(row.data()))
            }
            // the header promised more rows
            Ok(None) => Err(PadError::TruncatedInput {
                expected: self.height,
                received: self.emitted,
            }),
            Err(e) => Err(row_error(e, &self.exhausted, self.height, self.emitted)),
        }
    }
}

pub struct PngRowSink<'s, W: Write> {
    stream: png::StreamWriter<'s, W>,
    height: u32,
    row_len: usize,
    written: u32,
}

impl<W: Write> RowSink for PngRowSink<'_, W> {
    fn write_row(&mut self, row: &[u8]) -> Result<()> {
        if row.len() != self.row_len {
            return Err(PadError::RowLengthMismatch {
                expected: self.row_len,
                actual: row.len(),
            });
        }
        self.written = self.written.saturating_add(1);
        if self.written <= self.height {
            self.stream.write_all(row)?;
        }
        Ok(())
    }

    fn rows_written(&self) -> u32 {
        self.written
    }
}

fn header_error(err: png::DecodingError) -> PadError {
    match err {
        png::DecodingError::IoError(e) => PadError::IoError(e),
        other => PadError::DecodeError(other.to_string()),
    }
}

/// Maps a failure while reading image data. Rows are missing when the stream ran dry,
/// when the decoder hit end of data, or when the image data chunks ended before the last row.
fn row_error(err: png::DecodingError, exhausted: &Cell<bool>, expected: u32, received: u32) -> PadError {
    if exhausted.get() || is_missing_image_data(&err) {
        return PadError::TruncatedInput { expected, received };
    }
    header_error(err)
}

/// png exposes no error kind for short IDAT data, only its message.
const NO_MORE_IMAGE_DATA: &str = "does not have enough data for image";

fn is_missing_image_data(err: &png::DecodingError) -> bool {
    match err {
        png::DecodingError::IoError(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
        png::DecodingError::Format(e) => e.to_string().contains(NO_MORE_IMAGE_DATA),
        _ => false,
    }
}

fn encode_error(err: png::EncodingError) -> PadError {
    match err {
        png::EncodingError::IoError(e) => PadError::IoError(e),
        other => PadError::EncodeError(other.to_string()),
    }
}
