//! Error types for ftexconv-common.

use thiserror::Error;

/// Common error type for ftexconv operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Invalid magic value encountered.
    #[error("invalid magic: expected {expected:#010x}, got {actual:#010x}")]
    InvalidMagic { expected: u32, actual: u32 },

    /// Value did not match expected.
    #[error("expected {field} to be {expected}, got {actual}")]
    UnexpectedValue {
        field: &'static str,
        expected: i64,
        actual: i64,
    },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
