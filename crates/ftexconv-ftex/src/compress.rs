//! zlib compression helpers for FTEXS chunks.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::{Error, Result};

/// Compress data into a zlib stream.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(e.to_string()))
}

/// Decompress a zlib stream with known output size.
///
/// Output stops one byte past `expected_size`.
pub fn inflate(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_size);
    ZlibDecoder::new(data)
        .take(expected_size as u64 + 1)
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;
    Ok(output)
}
