use std::io::{Read, Write};

use crate::panorama::common::error::Result;
use crate::panorama::codec::sink::RowSink;
use crate::panorama::codec::types::{DecodedImage, EncodeTarget};
use crate::panorama::compositor::PadConfig;

pub trait RowCodec {
    /// Parses the container header and hands back the dimensions with a lazy row source.
    fn open_decoder<'a, R: Read + 'a>(&self, input: R) -> Result<DecodedImage<'a>>;

    /// Writes the container header to `output`, lets `write_rows` push the rows into a sink
    /// and finalizes the container once it returns.
    ///
    /// The sink only lives for the duration of the call. Fails with `RowCountMismatch`
    /// unless exactly `target.dimensions.height` rows were written.
    fn encode(
        &self,
        output: &mut dyn Write,
        target: EncodeTarget,
        config: &PadConfig,
        write_rows: &mut dyn FnMut(&mut dyn RowSink) -> Result<()>,
    ) -> Result<()>;
}
