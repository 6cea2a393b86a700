//! Error types for conversion and file-system access.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting textures.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on a specific file.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// FTEX container error.
    #[error("{0}")]
    Ftex(#[from] ftexconv_ftex::Error),

    /// DDS file error.
    #[error("{0}")]
    Dds(#[from] ftexconv_dds::Error),

    /// Tiling error.
    #[error("{0}")]
    Tiling(#[from] ftexconv_tiling::Error),

    /// No mapping exists between the FTEX code and a DDS pixel format.
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// A dimension does not fit the FTEX header's 16-bit fields.
    #[error("{field} {value} does not fit in an FTEX header")]
    DimensionTooLarge { field: &'static str, value: u32 },

    /// The image data ends before the declared mip chain does.
    #[error("mip {mip} needs {needed} bytes of image data but only {available} available")]
    TruncatedImageData {
        mip: u32,
        needed: usize,
        available: usize,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
