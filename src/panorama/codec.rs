//! Row-stream codec adapters
//!
//! Format-aware decode and encode with sequential row access. Inputs are read once,
//! front to back; outputs are written once, front to back. Neither side needs `Seek`.

mod types;
mod source;
mod sink;
mod row_codec;
mod sniff;
mod tracked_read;
mod png_codec;
mod jpeg_codec;
mod format_codec;

pub use types::{DecodedImage, EncodeTarget, FillColor, ImageFormat, ParseFillColorError, PixelLayout};
pub use source::RowSource;
pub use sink::RowSink;
pub use row_codec::RowCodec;
pub use sniff::sniff_format;
pub use png_codec::{PngCodec, PngRowSink, PngRowSource};
pub use jpeg_codec::{JpegCodec, JpegRowSink, JpegRowSource};
pub use format_codec::FormatCodec;
