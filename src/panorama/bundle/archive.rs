use std::io::{Read, Seek, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, instrument};
use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::panorama::bundle::error::BundleError;
use crate::panorama::bundle::template::{ViewerPage, ViewerTemplate};
use crate::panorama::codec::RowCodec;
use crate::panorama::compositor::PanoramaPadder;
use crate::panorama::geometry::PanoramaDescriptor;

const VIEWER_PAGE_NAME: &str = "streetview.html";
const FALLBACK_IMAGE_NAME: &str = "panorama";

/// `photosphere-streetview-<unix seconds>`
pub fn timestamped_prefix() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("photosphere-streetview-{}", secs)
}

/// Final path component of an uploaded file name, usable as an archive entry name.
pub fn entry_file_name(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => FALLBACK_IMAGE_NAME,
        base => base,
    }
}

/// Writes `<prefix>/<image>` and `<prefix>/streetview.html` into a zip archive.
pub struct StreetViewBundle<'t> {
    template: &'t ViewerTemplate,
    prefix: String,
    generator: String,
}

impl<'t> StreetViewBundle<'t> {
    pub fn new(template: &'t ViewerTemplate) -> Self {
        Self {
            template,
            prefix: timestamped_prefix(),
            generator: concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Pads `input` straight into the archive entry, then adds the viewer page.
    ///
    /// On error the archive is incomplete and must be discarded.
    #[instrument(skip(self, padder, input, output), fields(prefix = %self.prefix))]
    pub fn write<C: RowCodec, W: Write + Seek>(
        &self,
        padder: &PanoramaPadder<C>,
        image_name: &str,
        input: &mut dyn Read,
        output: W,
    ) -> Result<PanoramaDescriptor, BundleError> {
        let image_name = entry_file_name(image_name);
        let mut zip = zip::ZipWriter::new(output);

        // already compressed by the image codec
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
        let image_entry = format!("{}/{}", self.prefix, image_name);
        debug!(entry = %image_entry, "Writing padded image");
        zip.start_file(image_entry, stored)?;
        let descriptor = padder.pad(input, &mut zip)?;

        let page = self.template.render(&ViewerPage {
            image_name,
            descriptor: &descriptor,
            generator: &self.generator,
        });
        let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(format!("{}/{}", self.prefix, VIEWER_PAGE_NAME), deflated)?;
        zip.write_all(page.as_bytes())?;

        zip.finish()?;
        info!(image = image_name, "Bundle written");
        Ok(descriptor)
    }
}
