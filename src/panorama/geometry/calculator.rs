use crate::panorama::common::error::{PadError, Result};
use crate::panorama::geometry::types::{ImageDimensions, PanoramaDescriptor};

/// Half of `width`, rounded half up.
fn half_round_up(width: u32) -> u32 {
    width / 2 + width % 2
}

/// Derives the 2:1 canvas and the vertically centered crop rectangle for `source`.
///
/// The source width is taken as the full 360° sweep, so the canvas is never padded
/// horizontally. Sources at least as tall as the canvas get no padding; rows beyond the
/// canvas height are clipped (see [`PanoramaDescriptor::is_clipped`]).
pub fn compute_geometry(source: ImageDimensions) -> Result<PanoramaDescriptor> {
    if source.width == 0 || source.height == 0 {
        return Err(PadError::InvalidDimensions(source.width, source.height));
    }

    let full_width = source.width;
    let full_height = half_round_up(full_width);

    let (cropped_height, cropped_top) = if source.height >= full_height {
        (full_height, 0)
    } else {
        (source.height, (full_height - source.height) / 2)
    };

    Ok(PanoramaDescriptor {
        full_width,
        full_height,
        cropped_width: full_width,
        cropped_height,
        cropped_left: 0,
        cropped_top,
    })
}
