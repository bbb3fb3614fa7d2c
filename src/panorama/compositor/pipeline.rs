use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::panorama::{
    codec::{DecodedImage, EncodeTarget, FillColor, FormatCodec, PixelLayout, RowCodec, RowSink, RowSource},
    common::error::{PadError, Result},
    compositor::types::PadConfig,
    geometry::{ImageDimensions, PanoramaDescriptor, compute_geometry},
};

pub struct PanoramaPadder<C: RowCodec = FormatCodec> {
    codec: C,
    config: PadConfig,
}

impl PanoramaPadder<FormatCodec> {
    pub fn new(config: PadConfig) -> Self {
        Self {
            codec: FormatCodec,
            config,
        }
    }
}

impl<C: RowCodec> PanoramaPadder<C> {
    pub fn with_custom(codec: C, config: PadConfig) -> Self {
        Self { codec, config }
    }

    fn validate_dimensions(&self, dimensions: ImageDimensions, frame_buffered: bool) -> Result<()> {
        let ImageDimensions { width, height } = dimensions;
        if width == 0 || height == 0 {
            return Err(PadError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(width, height, max, "Image dimensions exceed maximum");
                return Err(PadError::DimensionsTooLarge { width, height, max });
            }
        }

        if frame_buffered {
            self.config.check_frame_budget(dimensions).inspect_err(|_| {
                warn!(width, height, "Decoded frame would exceed the buffering limit");
            })?;
        }

        Ok(())
    }

    /// Pads the image read from `input` to a 2:1 canvas and writes it to `output`.
    ///
    /// Both streams are used strictly sequentially. On error, whatever reached `output`
    /// is not a valid image and must be discarded by the caller.
    #[instrument(skip(self, input, output))]
    pub fn pad(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<PanoramaDescriptor> {
        info!("Starting panorama padding");

        let DecodedImage {
            format,
            dimensions,
            layout,
            frame_buffered,
            mut rows,
        } = {
            let _span = tracing::info_span!("open_decoder").entered();
            self.codec.open_decoder(input)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = dimensions.width,
                height = dimensions.height
            ).entered();
            self.validate_dimensions(dimensions, frame_buffered)?;
        }

        let descriptor = compute_geometry(dimensions)?;
        if descriptor.is_clipped(dimensions) {
            warn!(
                source_height = dimensions.height,
                canvas_height = descriptor.full_height,
                "Source is taller than 2:1, clipping rows below the canvas"
            );
        }

        {
            let _span = tracing::info_span!("encode", %format).entered();
            let target = EncodeTarget {
                format,
                dimensions: descriptor.full_dimensions(),
                layout,
            };
            let fill = self.config.fill;
            self.codec.encode(output, target, &self.config, &mut |sink: &mut dyn RowSink| -> Result<()> {
                let _span = tracing::info_span!("composite",
                    top = descriptor.padding_top(),
                    rows = descriptor.cropped_height,
                    bottom = descriptor.padding_bottom()
                ).entered();
                composite_rows(&descriptor, layout, fill, rows.as_mut(), sink)
            })?;
        }

        info!(
            full_width = descriptor.full_width,
            full_height = descriptor.full_height,
            cropped_top = descriptor.cropped_top,
            "Padding complete"
        );
        Ok(descriptor)
    }

    /// Pads `input_path` into `output_path`. The output file is removed again on failure.
    ///
    /// Refuses to run when both paths name the same existing file, since creating the
    /// output would truncate the input.
    #[instrument(skip(self, input_path, output_path))]
    pub fn pad_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<PanoramaDescriptor> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Padding file"
        );

        if same_file(input_path, output_path) {
            return Err(PadError::IoError(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}: output would overwrite the input", output_path.display()),
            )));
        }

        let mut input = BufReader::new(File::open(input_path).map_err(|e| with_path(e, input_path))?);
        let mut output = BufWriter::new(File::create(output_path).map_err(|e| with_path(e, output_path))?);

        let result = self
            .pad(&mut input, &mut output)
            .and_then(|descriptor| {
                output.flush()?;
                Ok(descriptor)
            });

        if result.is_err() {
            drop(output);
            if let Err(e) = std::fs::remove_file(output_path) {
                warn!(output = %output_path.display(), "Could not remove partial output: {}", e);
            }
        }
        result
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PadConfig) {
        self.config = config;
    }
}

/// Writes the canvas rows: top padding, the cropped source rows, bottom padding.
///
/// One padding row is built and reused. Rows past `cropped_height` are never pulled
/// from `rows`. A source that runs dry early fails with `TruncatedInput` before any
/// further padding is written.
pub fn composite_rows(
    descriptor: &PanoramaDescriptor,
    layout: PixelLayout,
    fill: FillColor,
    rows: &mut dyn RowSource,
    sink: &mut dyn RowSink,
) -> Result<()> {
    let padding = layout.fill_row(descriptor.full_width, fill);

    for _ in 0..descriptor.padding_top() {
        sink.write_row(&padding)?;
    }

    for received in 0..descriptor.cropped_height {
        let row = rows.next_row()?.ok_or(PadError::TruncatedInput {
            expected: descriptor.cropped_height,
            received,
        })?;
        sink.write_row(row)?;
    }

    for _ in 0..descriptor.padding_bottom() {
        sink.write_row(&padding)?;
    }

    Ok(())
}

/// True when both paths resolve to the same existing file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn with_path(err: io::Error, path: &Path) -> PadError {
    PadError::IoError(io::Error::new(err.kind(), format!("{}: {}", path.display(), err)))
}
