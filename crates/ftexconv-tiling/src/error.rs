//! Error types for the tiling engine.

use thiserror::Error;

/// Errors that can occur while untiling texture data.
#[derive(Debug, Error)]
pub enum Error {
    /// A mip level's tiled span runs past the end of the buffer.
    #[error("mip {mip} needs {needed} bytes of tiled data but only {available} available")]
    TruncatedMipData {
        mip: u32,
        needed: usize,
        available: usize,
    },

    /// A block address falls outside the surface buffer.
    #[error("tiled block at byte {offset} lies outside a {len}-byte surface")]
    TileOutOfBounds { offset: usize, len: usize },
}

/// Result type for tiling operations.
pub type Result<T> = std::result::Result<T, Error>;
