//! FTEXS chunks: independently compressed slices of a mip level.

use ftexconv_common::{BinaryReader, BinaryWriter};
use tracing::warn;

use crate::compress::{deflate, inflate};
use crate::{Error, Result};

/// Size of one chunk index entry: stored size, size, offset.
pub const CHUNK_INDEX_SIZE: usize = 8;

/// Offset value written for a lone chunk whose data follows its index entry.
pub const DEFAULT_RELATIVE_OFFSET: u32 = 8;

/// Bit marking a lone chunk's stored bytes as raw.
pub const UNCOMPRESSED_FLAG: u32 = 0x8000_0000;

/// Bits holding a relative offset. Bits between this and the flag may be garbage.
const RELATIVE_OFFSET_MASK: u32 = 0xFFFF;

/// How a chunk's offset field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetMode {
    /// Offset is the absolute stream position of the stored bytes.
    Absolute,
    /// Offset is relative to the end of the chunk's own index entry, with an
    /// uncompressed flag in bit 31.
    Relative,
}

impl OffsetMode {
    /// Mips made of a single chunk use relative offsets; all others absolute.
    pub const fn for_chunk_count(chunk_count: usize) -> Self {
        if chunk_count == 1 {
            Self::Relative
        } else {
            Self::Absolute
        }
    }
}

/// One chunk of mip data.
///
/// Both forms are kept: `data` is the decompressed bytes and `stored` the
/// bytes as they appear in the payload file. When compression does not pay
/// off the two are identical, and equal lengths always mean raw storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    offset: u32,
    data: Vec<u8>,
    stored: Vec<u8>,
}

impl Chunk {
    /// Create a chunk from raw bytes, compressing them.
    pub fn from_raw(data: Vec<u8>) -> Result<Self> {
        if data.len() > u16::MAX as usize {
            return Err(Error::ChunkTooLarge(data.len()));
        }

        let compressed = deflate(&data)?;
        let stored = if compressed.len() < data.len() {
            compressed
        } else {
            data.clone()
        };

        Ok(Self {
            offset: 0,
            data,
            stored,
        })
    }

    /// Create a chunk from its stored bytes and declared decompressed size.
    ///
    /// Stored bytes whose length differs from `size` are inflated. A chunk
    /// that fails to inflate to exactly `size` bytes decodes as zeros so the
    /// rest of the texture stays usable.
    pub fn from_stored(stored: Vec<u8>, size: u16) -> Self {
        let size = size as usize;
        let data = if stored.len() == size {
            stored.clone()
        } else {
            match inflate(&stored, size) {
                Ok(data) if data.len() == size => data,
                Ok(data) => {
                    warn!(
                        expected = size,
                        actual = data.len(),
                        "chunk inflated to the wrong size, substituting zeros"
                    );
                    vec![0u8; size]
                }
                Err(e) => {
                    warn!(size, error = %e, "chunk failed to inflate, substituting zeros");
                    vec![0u8; size]
                }
            }
        };

        Self {
            offset: 0,
            data,
            stored,
        }
    }

    /// Read a chunk index entry and the stored bytes it points at.
    ///
    /// The reader is left just past the index entry.
    pub fn read(reader: &mut BinaryReader<'_>, mode: OffsetMode) -> Result<Self> {
        let stored_size = reader.read_u16()?;
        let size = reader.read_u16()?;
        let offset = reader.read_u32()?;

        let index_end = reader.position();
        let data_position = match mode {
            OffsetMode::Absolute => offset as usize,
            OffsetMode::Relative => {
                index_end - CHUNK_INDEX_SIZE + (offset & RELATIVE_OFFSET_MASK) as usize
            }
        };

        reader.seek(data_position);
        let stored = reader.read_bytes(stored_size as usize)?.to_vec();
        reader.seek(index_end);

        let mut chunk = Self::from_stored(stored, size);
        chunk.offset = offset;
        Ok(chunk)
    }

    /// Write this chunk's index entry in the writer's byte order.
    pub fn write_index(&self, writer: &mut BinaryWriter) {
        writer.write_u16(self.stored_size());
        writer.write_u16(self.size());
        writer.write_u32(self.offset);
    }

    /// Decompressed bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes as stored in the payload file.
    pub fn stored(&self) -> &[u8] {
        &self.stored
    }

    /// Decompressed size.
    pub fn size(&self) -> u16 {
        self.data.len() as u16
    }

    /// Stored size.
    pub fn stored_size(&self) -> u16 {
        self.stored.len() as u16
    }

    /// Whether the stored bytes are compressed.
    pub fn is_compressed(&self) -> bool {
        self.stored.len() != self.data.len()
    }

    /// Raw offset field as last read or written.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Set the raw offset field.
    pub fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftexconv_common::Endian;

    fn index_entry(writer: &mut BinaryWriter, stored_size: u16, size: u16, offset: u32) {
        writer.write_u16(stored_size);
        writer.write_u16(size);
        writer.write_u32(offset);
    }

    #[test]
    fn test_from_raw_compresses() {
        let chunk = Chunk::from_raw(vec![0xAB; 4096]).unwrap();
        assert!(chunk.is_compressed());
        assert!(chunk.stored_size() < chunk.size());
        assert_eq!(inflate(chunk.stored(), 4096).unwrap(), chunk.data());
    }

    #[test]
    fn test_from_raw_keeps_incompressible_data() {
        let chunk = Chunk::from_raw(vec![1, 2, 3]).unwrap();
        assert!(!chunk.is_compressed());
        assert_eq!(chunk.stored(), &[1, 2, 3]);
    }

    #[test]
    fn test_from_raw_too_large() {
        assert!(matches!(
            Chunk::from_raw(vec![0; 70_000]),
            Err(Error::ChunkTooLarge(70_000))
        ));
    }

    #[test]
    fn test_stored_roundtrip() {
        let original: Vec<u8> = (0..2000u32).map(|i| (i % 13) as u8).collect();
        let encoded = Chunk::from_raw(original.clone()).unwrap();
        let decoded = Chunk::from_stored(encoded.stored().to_vec(), encoded.size());
        assert_eq!(decoded.data(), &original[..]);
    }

    #[test]
    fn test_inflate_failure_yields_zeros() {
        let chunk = Chunk::from_stored(vec![0xDE, 0xAD, 0xBE, 0xEF], 32);
        assert_eq!(chunk.data(), &[0u8; 32][..]);
        assert_eq!(chunk.stored(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_oversized_stream_yields_zeros() {
        let compressed = deflate(&vec![7u8; 100_000]).unwrap();
        let chunk = Chunk::from_stored(compressed, 64);
        assert_eq!(chunk.data(), &[0u8; 64][..]);
    }

    #[test]
    fn test_relative_uncompressed_flag() {
        let mut writer = BinaryWriter::new();
        index_entry(&mut writer, 4, 4, 0x8000_0008);
        writer.write_bytes(&[9, 8, 7, 6]);
        let bytes = writer.into_inner();

        let mut reader = BinaryReader::new(&bytes);
        let chunk = Chunk::read(&mut reader, OffsetMode::Relative).unwrap();
        assert_eq!(chunk.data(), &[9, 8, 7, 6]);
        assert!(!chunk.is_compressed());
        assert_eq!(chunk.offset(), 0x8000_0008);
        assert_eq!(reader.position(), CHUNK_INDEX_SIZE);
    }

    #[test]
    fn test_relative_garbage_upper_bits_ignored() {
        let payload = vec![0x11; 500];
        let compressed = deflate(&payload).unwrap();

        let mut writer = BinaryWriter::with_endian(Endian::Big);
        index_entry(
            &mut writer,
            compressed.len() as u16,
            payload.len() as u16,
            0x1234_000C,
        );
        writer.write_zeros(4);
        writer.write_bytes(&compressed);
        let bytes = writer.into_inner();

        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        let chunk = Chunk::read(&mut reader, OffsetMode::Relative).unwrap();
        assert!(chunk.is_compressed());
        assert_eq!(chunk.data(), &payload[..]);
    }

    #[test]
    fn test_absolute_offsets() {
        // two index entries, then chunk 1's data before chunk 0's
        let mut writer = BinaryWriter::new();
        index_entry(&mut writer, 3, 3, 19);
        index_entry(&mut writer, 3, 3, 16);
        writer.write_bytes(&[4, 5, 6]);
        writer.write_bytes(&[1, 2, 3]);
        let bytes = writer.into_inner();

        let mut reader = BinaryReader::new(&bytes);
        let first = Chunk::read(&mut reader, OffsetMode::Absolute).unwrap();
        let second = Chunk::read(&mut reader, OffsetMode::Absolute).unwrap();
        assert_eq!(first.data(), &[1, 2, 3]);
        assert_eq!(second.data(), &[4, 5, 6]);
    }

    #[test]
    fn test_declared_size_past_end() {
        let mut writer = BinaryWriter::new();
        index_entry(&mut writer, 100, 100, 8);
        let bytes = writer.into_inner();

        let mut reader = BinaryReader::new(&bytes);
        assert!(matches!(
            Chunk::read(&mut reader, OffsetMode::Relative),
            Err(Error::Common(ftexconv_common::Error::UnexpectedEof { .. }))
        ));
    }

    #[test]
    fn test_offset_mode_selection() {
        assert_eq!(OffsetMode::for_chunk_count(1), OffsetMode::Relative);
        assert_eq!(OffsetMode::for_chunk_count(0), OffsetMode::Absolute);
        assert_eq!(OffsetMode::for_chunk_count(2), OffsetMode::Absolute);
    }
}
