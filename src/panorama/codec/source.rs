use crate::panorama::common::error::Result;

/// Forward-only sequence of decoded pixel rows, top to bottom.
///
/// Not restartable. Each returned slice is valid until the next call.
pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<&[u8]>>;
}
