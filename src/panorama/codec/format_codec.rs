use std::io::{Read, Write};

use crate::panorama::common::error::Result;
use crate::panorama::codec::jpeg_codec::JpegCodec;
use crate::panorama::codec::png_codec::PngCodec;
use crate::panorama::codec::row_codec::RowCodec;
use crate::panorama::codec::sink::RowSink;
use crate::panorama::codec::sniff::sniff_format;
use crate::panorama::codec::types::{DecodedImage, EncodeTarget, ImageFormat};
use crate::panorama::compositor::PadConfig;

/// Detects the input format from its signature and dispatches to the matching codec.
pub struct FormatCodec;

impl RowCodec for FormatCodec {
    fn open_decoder<'a, R: Read + 'a>(&self, input: R) -> Result<DecodedImage<'a>> {
        let (format, input) = sniff_format(input)?;
        match format {
            ImageFormat::Png => PngCodec.open_decoder(input),
            ImageFormat::Jpeg => JpegCodec.open_decoder(input),
        }
    }

    fn encode(
        &self,
        output: &mut dyn Write,
        target: EncodeTarget,
        config: &PadConfig,
        write_rows: &mut dyn FnMut(&mut dyn RowSink) -> Result<()>,
    ) -> Result<()> {
        match target.format {
            ImageFormat::Png => PngCodec.encode(output, target, config, write_rows),
            ImageFormat::Jpeg => JpegCodec.encode(output, target, config, write_rows),
        }
    }
}
