use std::io::{Cursor, ErrorKind, Read};

use tracing::debug;

use crate::panorama::common::error::{PadError, Result};
use crate::panorama::codec::types::ImageFormat;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Bytes peeked from the stream head. Enough for every signature `image` knows about.
const PEEK_LEN: usize = 16;

/// Identifies the container format from the first bytes of `input`.
///
/// The peeked bytes are chained back in front of the stream, so the returned reader
/// yields the complete input and `input` never needs to seek.
pub fn sniff_format<R: Read>(mut input: R) -> Result<(ImageFormat, std::io::Chain<Cursor<Vec<u8>>, R>)> {
    let mut head = vec![0u8; PEEK_LEN];
    let mut filled = 0;
    while filled < PEEK_LEN {
        match input.read(&mut head[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(PadError::IoError(e)),
        }
    }
    head.truncate(filled);

    let format = if head.starts_with(PNG_SIGNATURE) {
        ImageFormat::Png
    } else if head.starts_with(JPEG_SIGNATURE) {
        ImageFormat::Jpeg
    } else if head.is_empty() {
        return Err(PadError::UnsupportedFormat("empty input".to_string()));
    } else {
        return Err(match image::guess_format(&head) {
            Ok(other) => PadError::UnsupportedFormat(format!("{:?}", other)),
            Err(_) => PadError::UnsupportedFormat("unrecognized image data".to_string()),
        });
    };

    debug!("Detected {} input", format);
    Ok((format, Cursor::new(head).chain(input)))
}
