//! Mip level descriptor table entries.

use ftexconv_common::{BinaryReader, BinaryWriter};

use crate::Result;

/// Where one mip level lives and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MipLevelDescriptor {
    /// Stream offset of the mip's chunk index block in its payload file.
    pub offset: i32,
    /// Size of the mip's texel data once decompressed.
    pub decompressed_size: i32,
    /// Sum of the mip's stored chunk sizes.
    pub compressed_size: i32,
    /// Mip index, 0 being the largest level.
    pub index: u8,
    /// Payload file holding this mip (1-based).
    pub payload_file_number: u8,
    /// Number of chunks the mip is split into.
    pub chunk_count: i16,
}

impl MipLevelDescriptor {
    /// Encoded size in bytes.
    pub const SIZE: usize = 16;

    /// Read a descriptor in the reader's current byte order.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            offset: reader.read_i32()?,
            decompressed_size: reader.read_i32()?,
            compressed_size: reader.read_i32()?,
            index: reader.read_u8()?,
            payload_file_number: reader.read_u8()?,
            chunk_count: reader.read_i16()?,
        })
    }

    /// Write a descriptor in the writer's current byte order.
    pub fn write(&self, writer: &mut BinaryWriter) {
        writer.write_i32(self.offset);
        writer.write_i32(self.decompressed_size);
        writer.write_i32(self.compressed_size);
        writer.write_u8(self.index);
        writer.write_u8(self.payload_file_number);
        writer.write_i16(self.chunk_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftexconv_common::Endian;

    #[test]
    fn test_big_endian_layout() {
        let descriptor = MipLevelDescriptor {
            offset: 0x10,
            decompressed_size: 0x2000,
            compressed_size: 0x0300,
            index: 2,
            payload_file_number: 3,
            chunk_count: 1,
        };

        let mut writer = BinaryWriter::with_endian(Endian::Big);
        descriptor.write(&mut writer);
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), MipLevelDescriptor::SIZE);
        assert_eq!(
            bytes,
            [0, 0, 0, 0x10, 0, 0, 0x20, 0, 0, 0, 3, 0, 2, 3, 0, 1]
        );

        let mut reader = BinaryReader::with_endian(&bytes, Endian::Big);
        assert_eq!(MipLevelDescriptor::read(&mut reader).unwrap(), descriptor);
    }
}
