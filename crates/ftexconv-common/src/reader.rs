//! Binary reader for endian-aware parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! fixed-width integers from a byte slice in a byte order that can be
//! switched between reads.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use zerocopy::FromBytes;

use crate::{Endian, Error, Result};

/// A binary reader over a byte slice with a switchable byte order.
///
/// Every read is bounds checked; running off the end of the buffer yields
/// [`Error::UnexpectedEof`] instead of panicking.
///
/// # Example
///
/// ```
/// use ftexconv_common::{BinaryReader, Endian};
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// reader.set_endian(Endian::Big);
/// assert_eq!(reader.read_u32().unwrap(), 0x01020304);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> BinaryReader<'a> {
    /// Create a new little-endian reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self::with_endian(data, Endian::Little)
    }

    /// Create a new reader using the given byte order.
    #[inline]
    pub const fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
        }
    }

    /// The byte order used by subsequent reads.
    #[inline]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Switch the byte order used by subsequent reads.
    #[inline]
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    ///
    /// Seeking past the end is allowed; the next read reports the shortfall.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        // a zero-length read past the end still lands here
        self.data
            .get(self.position..self.position + count)
            .ok_or(Error::UnexpectedEof {
                needed: count,
                available: 0,
            })
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a u16 in the current byte order.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u16(bytes),
            Endian::Big => BigEndian::read_u16(bytes),
        })
    }

    /// Read an i16 in the current byte order.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.read_bytes(2)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_i16(bytes),
            Endian::Big => BigEndian::read_i16(bytes),
        })
    }

    /// Read a u32 in the current byte order.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u32(bytes),
            Endian::Big => BigEndian::read_u32(bytes),
        })
    }

    /// Read an i32 in the current byte order.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_i32(bytes),
            Endian::Big => BigEndian::read_i32(bytes),
        })
    }

    /// Peek at a u32 without advancing.
    #[inline]
    pub fn peek_u32(&self) -> Result<u32> {
        let bytes = self.peek_bytes(4)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u32(bytes),
            Endian::Big => BigEndian::read_u32(bytes),
        })
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct is read with its in-memory layout; byte order is not applied.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read a u32 and fail unless it equals `expected`.
    pub fn expect_magic(&mut self, expected: u32) -> Result<()> {
        let actual = self.read_u32()?;
        if actual != expected {
            return Err(Error::InvalidMagic { expected, actual });
        }
        Ok(())
    }

    /// Read an i32 and fail unless it equals `expected`.
    pub fn expect_i32(&mut self, field: &'static str, expected: i32) -> Result<()> {
        let actual = self.read_i32()?;
        if actual != expected {
            return Err(Error::UnexpectedValue {
                field,
                expected: expected.into(),
                actual: actual.into(),
            });
        }
        Ok(())
    }

    /// Read an i16 and fail unless it equals `expected`.
    pub fn expect_i16(&mut self, field: &'static str, expected: i16) -> Result<()> {
        let actual = self.read_i16()?;
        if actual != expected {
            return Err(Error::UnexpectedValue {
                field,
                expected: expected.into(),
                actual: actual.into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, 0xFF, 0xFF, // u32: 0xFFFFFFFF
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u32().unwrap(), 0xFFFFFFFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_switch_endian_mid_stream() {
        let data = [0x12, 0x34, 0x12, 0x34, 0xFF, 0xFE];
        let mut reader = BinaryReader::with_endian(&data, Endian::Big);

        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        reader.set_endian(Endian::Little);
        assert_eq!(reader.read_u16().unwrap(), 0x3412);
        assert_eq!(reader.read_i16().unwrap(), -257);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.peek_u32().unwrap(), 0x04030201);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 2
            })
        ));
    }

    #[test]
    fn test_seek_past_end_then_read() {
        let data = [0u8; 4];
        let mut reader = BinaryReader::new(&data);
        reader.seek(10);

        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn test_expect_values() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x05, 0x00];
        let mut reader = BinaryReader::new(&data);

        assert!(reader.expect_i32("one", 1).is_ok());
        let err = reader.expect_i16("zero", 0).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedValue {
                field: "zero",
                expected: 0,
                actual: 5
            }
        ));
    }
}
