//! FTEXS payload files.

use ftexconv_common::{BinaryReader, BinaryWriter, Endian};

use crate::descriptor::MipLevelDescriptor;
use crate::mip::MipLevelPayload;
use crate::{Error, Result};

/// A numbered `.ftexs` file holding the chunk data of one or more mip levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFile {
    file_number: u8,
    mips: Vec<MipLevelPayload>,
}

impl PayloadFile {
    /// Create an empty payload file.
    pub fn new(file_number: u8) -> Self {
        Self {
            file_number,
            mips: Vec::new(),
        }
    }

    /// Decode every mip the descriptor table assigns to `file_number`.
    ///
    /// Mips are read in descriptor order, each from its recorded offset.
    pub fn parse<'d>(
        file_number: u8,
        bytes: &[u8],
        descriptors: impl IntoIterator<Item = &'d MipLevelDescriptor>,
        endian: Endian,
    ) -> Result<Self> {
        let mut reader = BinaryReader::with_endian(bytes, endian);
        let mut file = Self::new(file_number);

        for descriptor in descriptors
            .into_iter()
            .filter(|d| d.payload_file_number == file_number)
        {
            let offset = usize::try_from(descriptor.offset).map_err(|_| Error::InvalidOffset {
                mip: descriptor.index,
                offset: descriptor.offset,
            })?;
            let chunk_count =
                usize::try_from(descriptor.chunk_count).map_err(|_| Error::InvalidChunkCount {
                    mip: descriptor.index,
                    count: descriptor.chunk_count,
                })?;

            reader.seek(offset);
            file.add_mip(MipLevelPayload::read(&mut reader, chunk_count)?);
        }

        Ok(file)
    }

    /// Serialize all mips, finalizing their offsets.
    pub fn to_bytes(&mut self, endian: Endian) -> Vec<u8> {
        let mut writer = BinaryWriter::with_endian(endian);
        for mip in &mut self.mips {
            mip.write(&mut writer);
        }
        writer.into_inner()
    }

    /// Append a mip level.
    pub fn add_mip(&mut self, mip: MipLevelPayload) {
        self.mips.push(mip);
    }

    /// The 1-based file number.
    pub fn file_number(&self) -> u8 {
        self.file_number
    }

    /// Mip levels in the order they were added.
    pub fn mips(&self) -> &[MipLevelPayload] {
        &self.mips
    }

    /// Decompressed bytes of every mip, in order.
    pub fn data(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for mip in &self.mips {
            data.extend(mip.data());
        }
        data
    }
}
