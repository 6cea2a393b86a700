//! FTEX header files.

use std::cmp::Reverse;

use ftexconv_common::{BinaryReader, BinaryWriter, Endian};
use tracing::{debug, warn};

use crate::descriptor::MipLevelDescriptor;
use crate::payload::PayloadFile;
use crate::{Error, Result};

/// "FTEX" read as a little-endian u32.
pub const FTEX_MAGIC: u32 = 0x5845_5446;

/// [`FTEX_MAGIC`] as seen by a little-endian read of a big-endian file.
const FTEX_MAGIC_SWAPPED: u32 = 0x4654_4558;

/// Second magic word following "FTEX".
pub const FTEX_VERSION: u32 = 0x4001_EB85;

/// Encoded header size, up to the descriptor table.
pub const HEADER_SIZE: usize = 64;

/// An FTEX texture container: header, mip descriptor table and payload files.
///
/// The header's own fields are public. Descriptors and payload files are
/// mutated in lockstep: after changing chunk layout, serialize the payload
/// files and call [`FtexFile::update_descriptors`] before writing the header.
#[derive(Debug, Clone, Default)]
pub struct FtexFile {
    /// Console pixel format code.
    pub pixel_format: i16,
    /// Width in pixels.
    pub width: i16,
    /// Height in pixels.
    pub height: i16,
    /// Depth.
    pub depth: i16,
    /// Number of mip levels.
    pub mip_count: u8,
    /// 0 for `_nrt` textures, 2 otherwise.
    pub nrt_flag: u8,
    /// Observed as 0 or 17.
    pub unknown_flags: i16,
    /// Texture usage code.
    pub texture_type: i32,
    /// Number of payload files.
    pub payload_file_count: u8,
    /// Always `payload_file_count - 1`.
    pub additional_payload_file_count: u8,
    /// Content hash.
    pub hash: [u8; 16],
    /// Byte order the header was parsed with.
    pub endian: Endian,
    descriptors: Vec<MipLevelDescriptor>,
    payload_files: Vec<PayloadFile>,
}

impl FtexFile {
    /// Create an empty little-endian container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an FTEX header and its descriptor table.
    ///
    /// Payload files are not touched; add them with
    /// [`FtexFile::read_payload_file`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(bytes);

        let endian = Endian::from_flip(reader.peek_u32()? == FTEX_MAGIC_SWAPPED);
        debug!(%endian, "detected FTEX byte order");
        reader.set_endian(endian);

        reader.expect_magic(FTEX_MAGIC)?;
        reader.expect_magic(FTEX_VERSION)?;

        let mut file = Self {
            endian,
            ..Self::default()
        };
        file.pixel_format = reader.read_i16()?;
        file.width = reader.read_i16()?;
        file.height = reader.read_i16()?;
        file.depth = reader.read_i16()?;
        file.mip_count = reader.read_u8()?;
        file.nrt_flag = reader.read_u8()?;
        file.unknown_flags = reader.read_i16()?;

        // this block is little-endian in every file
        reader.set_endian(Endian::Little);
        reader.expect_i32("header one", 1)?;
        reader.expect_i32("header zero", 0)?;
        file.texture_type = reader.read_i32()?;
        file.payload_file_count = reader.read_u8()?;
        file.additional_payload_file_count = reader.read_u8()?;
        reader.expect_i16("header padding", 0)?;
        reader.expect_i32("header reserved 1", 0)?;
        reader.expect_i32("header reserved 2", 0)?;
        reader.expect_i32("header reserved 3", 0)?;
        file.hash = reader.read_array()?;

        reader.set_endian(endian);
        file.descriptors = (0..file.mip_count)
            .map(|_| MipLevelDescriptor::read(&mut reader))
            .collect::<Result<Vec<_>>>()?;

        let referenced = file.payload_file_numbers().len();
        if referenced != file.payload_file_count as usize {
            warn!(
                declared = file.payload_file_count,
                referenced, "payload file count disagrees with descriptor table"
            );
        }

        Ok(file)
    }

    /// Serialize the header and descriptor table in the given byte order.
    pub fn to_bytes(&self, endian: Endian) -> Vec<u8> {
        let mut writer = BinaryWriter::with_endian(endian);
        writer.write_u32(FTEX_MAGIC);
        writer.write_u32(FTEX_VERSION);
        writer.write_i16(self.pixel_format);
        writer.write_i16(self.width);
        writer.write_i16(self.height);
        writer.write_i16(self.depth);
        writer.write_u8(self.mip_count);
        writer.write_u8(self.nrt_flag);
        writer.write_i16(self.unknown_flags);

        writer.set_endian(Endian::Little);
        writer.write_i32(1);
        writer.write_i32(0);
        writer.write_i32(self.texture_type);
        writer.write_u8(self.payload_file_count);
        writer.write_u8(self.additional_payload_file_count);
        writer.write_i16(0);
        writer.write_zeros(12);
        writer.write_bytes(&self.hash);

        writer.set_endian(endian);
        for descriptor in &self.descriptors {
            descriptor.write(&mut writer);
        }
        writer.into_inner()
    }

    /// Decode the payload file with the given number and add it.
    pub fn read_payload_file(&mut self, file_number: u8, bytes: &[u8]) -> Result<()> {
        let file = PayloadFile::parse(file_number, bytes, &self.descriptors, self.endian)?;
        debug!(
            file_number,
            mips = file.mips().len(),
            "decoded payload file"
        );
        self.add_payload_file(file)
    }

    /// Serialize every payload file, then refresh the descriptors.
    ///
    /// Returns `(file_number, bytes)` pairs in insertion order.
    pub fn write_payload_files(&mut self, endian: Endian) -> Vec<(u8, Vec<u8>)> {
        let output = self
            .payload_files
            .iter_mut()
            .map(|file| (file.file_number(), file.to_bytes(endian)))
            .collect();
        self.update_descriptors();
        output
    }

    /// Copy chunk layout back into the descriptor table.
    ///
    /// Mips are walked across payload files in insertion order and matched to
    /// descriptors positionally.
    pub fn update_descriptors(&mut self) {
        let mips = self.payload_files.iter().flat_map(|file| file.mips());
        for (descriptor, mip) in self.descriptors.iter_mut().zip(mips) {
            descriptor.compressed_size = mip.compressed_size() as i32;
            descriptor.chunk_count = mip.chunks().len() as i16;
            descriptor.offset = mip.offset() as i32;
        }
    }

    /// Append a descriptor.
    pub fn add_descriptor(&mut self, descriptor: MipLevelDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Add a payload file. File numbers must be unique.
    pub fn add_payload_file(&mut self, file: PayloadFile) -> Result<()> {
        if self.payload_file(file.file_number()).is_some() {
            return Err(Error::DuplicatePayloadFile(file.file_number()));
        }
        self.payload_files.push(file);
        Ok(())
    }

    /// The descriptor table.
    pub fn descriptors(&self) -> &[MipLevelDescriptor] {
        &self.descriptors
    }

    /// Payload files in insertion order.
    pub fn payload_files(&self) -> &[PayloadFile] {
        &self.payload_files
    }

    /// Look up a payload file by number.
    pub fn payload_file(&self, file_number: u8) -> Option<&PayloadFile> {
        self.payload_files
            .iter()
            .find(|file| file.file_number() == file_number)
    }

    /// Distinct payload file numbers in order of first reference.
    pub fn payload_file_numbers(&self) -> Vec<u8> {
        let mut numbers = Vec::new();
        for descriptor in &self.descriptors {
            if !numbers.contains(&descriptor.payload_file_number) {
                numbers.push(descriptor.payload_file_number);
            }
        }
        numbers
    }

    /// The full texel stream, largest mip first.
    ///
    /// Payload files are concatenated from the highest file number down;
    /// file 1 holds the smallest levels.
    pub fn data(&self) -> Vec<u8> {
        let mut files: Vec<&PayloadFile> = self.payload_files.iter().collect();
        files.sort_by_key(|file| Reverse(file.file_number()));

        let mut data = Vec::new();
        for file in files {
            data.extend(file.data());
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::mip::MipLevelPayload;

    fn sample_header() -> FtexFile {
        let mut file = FtexFile {
            pixel_format: 4,
            width: 256,
            height: 128,
            depth: 1,
            mip_count: 2,
            nrt_flag: 2,
            unknown_flags: 17,
            texture_type: 0x0102_0304,
            payload_file_count: 2,
            additional_payload_file_count: 1,
            hash: *b"0123456789abcdef",
            ..FtexFile::default()
        };
        file.add_descriptor(MipLevelDescriptor {
            offset: 0,
            decompressed_size: 32768,
            compressed_size: 1200,
            index: 0,
            payload_file_number: 2,
            chunk_count: 2,
        });
        file.add_descriptor(MipLevelDescriptor {
            offset: 0,
            decompressed_size: 8192,
            compressed_size: 300,
            index: 1,
            payload_file_number: 1,
            chunk_count: 1,
        });
        file
    }

    #[test]
    fn test_header_roundtrip_both_orders() {
        for endian in [Endian::Little, Endian::Big] {
            let bytes = sample_header().to_bytes(endian);
            assert_eq!(bytes.len(), HEADER_SIZE + 2 * MipLevelDescriptor::SIZE);

            let parsed = FtexFile::parse(&bytes).unwrap();
            assert_eq!(parsed.endian, endian);
            assert_eq!(parsed.width, 256);
            assert_eq!(parsed.texture_type, 0x0102_0304);
            assert_eq!(parsed.descriptors(), sample_header().descriptors());
            assert_eq!(parsed.to_bytes(endian), bytes);
        }
    }

    #[test]
    fn test_mixed_endian_fields() {
        let bytes = sample_header().to_bytes(Endian::Big);

        assert_eq!(&bytes[..4], b"XETF");
        // width is big-endian
        assert_eq!(&bytes[10..12], &[0x01, 0x00]);
        // the sentinel block and texture type stay little-endian
        assert_eq!(&bytes[20..24], &[1, 0, 0, 0]);
        assert_eq!(&bytes[28..32], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[48..64], b"0123456789abcdef");
        // descriptors are big-endian again
        assert_eq!(&bytes[64 + 4..64 + 8], &[0, 0, 0x80, 0]);
    }

    #[test]
    fn test_reencode_little_to_big() {
        let little = sample_header().to_bytes(Endian::Little);
        assert_eq!(&little[..4], b"FTEX");

        let parsed = FtexFile::parse(&little).unwrap();
        let big = parsed.to_bytes(Endian::Big);
        let reparsed = FtexFile::parse(&big).unwrap();
        assert_eq!(reparsed.to_bytes(Endian::Little), little);
    }

    #[test]
    fn test_sentinel_mismatch_fails() {
        let mut bytes = sample_header().to_bytes(Endian::Little);
        bytes[20] = 2;
        assert!(matches!(
            FtexFile::parse(&bytes),
            Err(Error::Common(ftexconv_common::Error::UnexpectedValue {
                field: "header one",
                ..
            }))
        ));

        let mut bytes = sample_header().to_bytes(Endian::Little);
        bytes[40] = 1;
        assert!(FtexFile::parse(&bytes).is_err());
    }

    #[test]
    fn test_bad_magic_fails() {
        let mut bytes = sample_header().to_bytes(Endian::Little);
        bytes[4] = 0;
        assert!(matches!(
            FtexFile::parse(&bytes),
            Err(Error::Common(ftexconv_common::Error::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_truncated_descriptor_table() {
        let bytes = sample_header().to_bytes(Endian::Little);
        assert!(FtexFile::parse(&bytes[..HEADER_SIZE + 20]).is_err());
    }

    #[test]
    fn test_payload_files_and_descriptor_update() {
        let mut file = sample_header();
        let mut large = PayloadFile::new(2);
        large.add_mip(MipLevelPayload::new(vec![
            Chunk::from_raw(vec![1u8; 32767]).unwrap(),
            Chunk::from_raw(vec![1u8; 1]).unwrap(),
        ]));
        let mut small = PayloadFile::new(1);
        small.add_mip(MipLevelPayload::new(vec![
            Chunk::from_raw(vec![2u8; 8192]).unwrap()
        ]));
        file.add_payload_file(large).unwrap();
        file.add_payload_file(small).unwrap();
        assert!(matches!(
            file.add_payload_file(PayloadFile::new(1)),
            Err(Error::DuplicatePayloadFile(1))
        ));

        let written = file.write_payload_files(Endian::Little);
        assert_eq!(written.iter().map(|(n, _)| *n).collect::<Vec<_>>(), [2, 1]);

        let mip0 = &file.payload_files()[0].mips()[0];
        assert_eq!(file.descriptors()[0].chunk_count, 2);
        assert_eq!(
            file.descriptors()[0].compressed_size,
            mip0.compressed_size() as i32
        );
        assert_eq!(file.descriptors()[1].chunk_count, 1);

        // read everything back through the header
        let header = file.to_bytes(Endian::Little);
        let mut parsed = FtexFile::parse(&header).unwrap();
        for (number, bytes) in &written {
            parsed.read_payload_file(*number, bytes).unwrap();
        }
        assert_eq!(parsed.data(), file.data());
        assert_eq!(parsed.data().len(), 32768 + 8192);
        assert_eq!(parsed.data()[32768], 2);
    }
}
