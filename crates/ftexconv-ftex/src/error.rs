//! Error types for the FTEX crate.

use thiserror::Error;

/// Errors that can occur when working with FTEX/FTEXS files.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error (bounds, magic and sentinel checks).
    #[error("{0}")]
    Common(#[from] ftexconv_common::Error),

    /// Compression error.
    #[error("compression error: {0}")]
    Compression(String),

    /// Decompression error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// A chunk's decompressed size does not fit the 16-bit size field.
    #[error("chunk of {0} bytes exceeds the 65535 byte limit")]
    ChunkTooLarge(usize),

    /// A descriptor declares a negative chunk count.
    #[error("mip {mip} has invalid chunk count {count}")]
    InvalidChunkCount { mip: u8, count: i16 },

    /// A descriptor declares a negative stream offset.
    #[error("mip {mip} has invalid payload offset {offset}")]
    InvalidOffset { mip: u8, offset: i32 },

    /// A payload file with this number was already added.
    #[error("duplicate payload file number {0}")]
    DuplicatePayloadFile(u8),
}

/// Result type for FTEX operations.
pub type Result<T> = std::result::Result<T, Error>;
