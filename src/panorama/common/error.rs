use thiserror::Error;

#[derive(Error, Debug)]
pub enum PadError {
    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(u32, u32),

    #[error("Image dimensions {width}x{height} exceed maximum {max}")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },

    #[error("Image of {pixels} pixels exceeds the {max} pixel whole-frame limit")]
    FrameTooLarge { pixels: u64, max: u64 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Input ended after {received} of {expected} rows")]
    TruncatedInput { expected: u32, received: u32 },

    #[error("Encoder expected {expected} rows, got {written}")]
    RowCountMismatch { expected: u32, written: u32 },

    #[error("Row is {actual} bytes, expected {expected}")]
    RowLengthMismatch { expected: usize, actual: usize },

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PadError>;
