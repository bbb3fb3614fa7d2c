use crate::panorama::common::error::{PadError, Result};

/// Sequential row consumer for an encoder.
///
/// Rows arrive top to bottom. Rows past the declared height are counted but not stored;
/// the owning codec reports the mismatch when it finalizes the container.
pub trait RowSink {
    fn write_row(&mut self, row: &[u8]) -> Result<()>;

    fn rows_written(&self) -> u32;
}

pub(crate) fn check_row_count(sink: &dyn RowSink, expected: u32) -> Result<()> {
    let written = sink.rows_written();
    if written != expected {
        return Err(PadError::RowCountMismatch { expected, written });
    }
    Ok(())
}
