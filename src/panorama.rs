//! Panorama padding engine
//!
//! Turns an arbitrary rectangular photograph into a 2:1 equirectangular canvas by
//! streaming its rows between synthesized padding rows, and reports the crop geometry
//! a panorama viewer needs to place the photograph on the sphere.

pub mod common;
pub mod geometry;
pub mod codec;
pub mod compositor;
pub mod bundle;

pub use common::{
    PadError,
    Result,
};

pub use geometry::{
    ImageDimensions,
    PanoramaDescriptor,
    compute_geometry,
};

pub use codec::{
    DecodedImage,
    EncodeTarget,
    FillColor,
    FormatCodec,
    ImageFormat,
    JpegCodec,
    PixelLayout,
    PngCodec,
    RowCodec,
    RowSink,
    RowSource,
};

pub use compositor::{
    PadConfig,
    PadConfigBuilder,
    PanoramaPadder,
    PngCompression,
    same_file,
};

pub use bundle::{
    BundleError,
    StreetViewBundle,
    ViewerTemplate,
};
