//! Per-mip chunk lists inside a payload file.

use ftexconv_common::{BinaryReader, BinaryWriter};

use crate::chunk::{
    Chunk, OffsetMode, CHUNK_INDEX_SIZE, DEFAULT_RELATIVE_OFFSET, UNCOMPRESSED_FLAG,
};
use crate::Result;

/// One mip level's chunks as laid out in a payload file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MipLevelPayload {
    chunks: Vec<Chunk>,
    offset: u32,
}

impl MipLevelPayload {
    /// Create a mip payload from chunks in stream order.
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks, offset: 0 }
    }

    /// Read `chunk_count` chunks whose index block starts at the reader's position.
    pub fn read(reader: &mut BinaryReader<'_>, chunk_count: usize) -> Result<Self> {
        let offset = reader.position() as u32;
        let mode = OffsetMode::for_chunk_count(chunk_count);
        let chunks = (0..chunk_count)
            .map(|_| Chunk::read(reader, mode))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { chunks, offset })
    }

    /// Write the index block and chunk data at the writer's position.
    ///
    /// The index block is reserved first and back-patched once every chunk's
    /// offset is known. Records the index block position as this mip's offset.
    pub fn write(&mut self, writer: &mut BinaryWriter) {
        let mode = OffsetMode::for_chunk_count(self.chunks.len());
        self.offset = writer.position() as u32;
        writer.write_zeros(self.index_block_size());

        for chunk in &mut self.chunks {
            let offset = match mode {
                OffsetMode::Absolute => writer.position() as u32,
                OffsetMode::Relative if chunk.is_compressed() => DEFAULT_RELATIVE_OFFSET,
                OffsetMode::Relative => DEFAULT_RELATIVE_OFFSET | UNCOMPRESSED_FLAG,
            };
            chunk.set_offset(offset);
            writer.write_bytes(chunk.stored());
        }

        let end = writer.position();
        writer.seek(self.offset as usize);
        for chunk in &self.chunks {
            chunk.write_index(writer);
        }
        writer.seek(end);
    }

    /// Chunks in stream order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Stream offset of the index block.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Decompressed mip bytes: every chunk's data in order.
    pub fn data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.decompressed_size());
        for chunk in &self.chunks {
            data.extend_from_slice(chunk.data());
        }
        data
    }

    /// Sum of the chunks' stored sizes.
    pub fn compressed_size(&self) -> usize {
        self.chunks.iter().map(|c| c.stored_size() as usize).sum()
    }

    /// Sum of the chunks' decompressed sizes.
    pub fn decompressed_size(&self) -> usize {
        self.chunks.iter().map(|c| c.size() as usize).sum()
    }

    /// Size of the chunk index block.
    pub fn index_block_size(&self) -> usize {
        CHUNK_INDEX_SIZE * self.chunks.len()
    }
}
