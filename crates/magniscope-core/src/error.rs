use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MagniscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid video dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("Video has no frames")]
    EmptyVideo,

    #[error("Invalid area: {0}")]
    InvalidArea(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Magnification failed: {0}")]
    Magnification(String),

    #[error("Sweep aborted at {params}: {source}")]
    SweepPoint {
        params: String,
        #[source]
        source: Box<MagniscopeError>,
    },

    #[error("Invalid sweep spec: {0}")]
    InvalidSweep(String),

    #[error("Cache directory does not exist: {0}")]
    MissingCacheDirectory(PathBuf),

    #[error("Invalid frame array file: {0}")]
    InvalidFrameArray(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, MagniscopeError>;
