//! Display and asset errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to present frame: {0}")]
    Present(String),

    #[error("display I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("failed to read asset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode bitmap: {0}")]
    Decode(#[from] image::ImageError),

    #[error("bitmap is {width}x{height}, larger than {max}x{max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
