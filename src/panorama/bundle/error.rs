use std::path::PathBuf;

use thiserror::Error;

use crate::panorama::common::error::PadError;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Couldn't convert image to street view format: {0}")]
    Pad(#[from] PadError),

    #[error("Couldn't write archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to read template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
