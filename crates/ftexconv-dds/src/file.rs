//! Whole-file DDS reading and writing.

use ftexconv_common::{BinaryReader, IntoBytes};

use crate::header::{DdsFormat, DdsHeader};
use crate::{Error, Result, DDS_MAGIC};

/// A DDS file: header plus every mip level's pixel data, largest first.
#[derive(Debug, Clone)]
pub struct DdsFile {
    /// Parsed header.
    pub header: DdsHeader,
    /// Concatenated image data following the header.
    pub data: Vec<u8>,
}

impl DdsFile {
    /// Create a file from a header and its image data.
    pub fn new(header: DdsHeader, data: Vec<u8>) -> Self {
        Self { header, data }
    }

    /// Parse a DDS file from bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::InvalidHeader("file too small".into()));
        }

        let mut reader = BinaryReader::new(bytes);
        let magic: [u8; 4] = reader.read_array()?;
        if &magic != DDS_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let header: DdsHeader = reader.read_struct()?;

        let size = header.size;
        if size != DdsHeader::SIZE {
            return Err(Error::InvalidHeader(format!(
                "header size {} (expected {})",
                size,
                DdsHeader::SIZE
            )));
        }
        if header.is_dx10() {
            return Err(Error::InvalidHeader(
                "DX10 extended headers are not supported".into(),
            ));
        }

        let data = reader.read_bytes(reader.remaining())?.to_vec();
        Ok(Self { header, data })
    }

    /// Serialize to DDS bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output =
            Vec::with_capacity(DDS_MAGIC.len() + DdsHeader::SIZE as usize + self.data.len());
        output.extend_from_slice(DDS_MAGIC);
        output.extend_from_slice(self.header.as_bytes());
        output.extend_from_slice(&self.data);
        output
    }

    /// The header's pixel format, if it is one of the known formats.
    pub fn format(&self) -> Option<DdsFormat> {
        self.header.pixel_format.format()
    }

    /// Number of mip levels stored in the data section.
    pub fn mip_count(&self) -> u32 {
        self.header.stored_mip_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags;

    #[test]
    fn test_write_then_parse() {
        let mut header = DdsHeader::new(8, 4, 0, 2, DdsFormat::Dxt5);
        header.flags |= flags::MIPMAP_COUNT;
        let dds = DdsFile::new(header, (0u8..48).collect());

        let bytes = dds.to_bytes();
        assert_eq!(&bytes[..4], b"DDS ");
        assert_eq!(bytes.len(), 4 + 124 + 48);

        let parsed = DdsFile::parse(&bytes).unwrap();
        assert_eq!(parsed.format(), Some(DdsFormat::Dxt5));
        assert_eq!(parsed.mip_count(), 2);
        assert_eq!({ parsed.header.width }, 8);
        assert_eq!(parsed.data, dds.data);
    }

    #[test]
    fn test_bad_magic() {
        let err = DdsFile::parse(b"XXXX").unwrap_err();
        assert!(matches!(err, Error::InvalidMagic(m) if &m == b"XXXX"));
    }

    #[test]
    fn test_truncated_header() {
        let err = DdsFile::parse(b"DDS \x7c\x00\x00\x00").unwrap_err();
        assert!(matches!(err, Error::Common(_)));
    }
}
