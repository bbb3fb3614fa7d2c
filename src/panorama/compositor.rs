//! Streaming compositor
//!
//! Orchestrates decoding, geometry and encoding into a single pass over the input.

mod pipeline;
pub mod types;


pub use pipeline::{PanoramaPadder, composite_rows, same_file};
pub use types::{PadConfig, PadConfigBuilder, PngCompression};
