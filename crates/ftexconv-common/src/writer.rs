//! Binary writer with a switchable byte order.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::Endian;

/// A growable byte buffer writer with a cursor and a switchable byte order.
///
/// Writes overwrite existing bytes at the cursor and extend the buffer when
/// they run past its end. Seeking past the end zero-fills the gap on the next
/// write, which lets callers reserve an index block and back-patch it later.
///
/// # Example
///
/// ```
/// use ftexconv_common::{BinaryWriter, Endian};
///
/// let mut writer = BinaryWriter::new();
/// writer.write_u16(0x1234);
/// writer.set_endian(Endian::Big);
/// writer.write_u16(0x1234);
/// assert_eq!(writer.into_inner(), vec![0x34, 0x12, 0x12, 0x34]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    data: Vec<u8>,
    position: usize,
    endian: Endian,
}

impl BinaryWriter {
    /// Create an empty little-endian writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer using the given byte order.
    pub fn with_endian(endian: Endian) -> Self {
        Self {
            endian,
            ..Self::default()
        }
    }

    /// The byte order used by subsequent writes.
    #[inline]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Switch the byte order used by subsequent writes.
    #[inline]
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Current cursor position.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Length of the written buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Move the cursor to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Borrow the written bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the writer and return the written bytes.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Write raw bytes at the cursor.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    /// Write `count` zero bytes.
    pub fn write_zeros(&mut self, count: usize) {
        let end = self.position + count;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.position..end].fill(0);
        self.position = end;
    }

    /// Write a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    /// Write a u16 in the current byte order.
    pub fn write_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        match self.endian {
            Endian::Little => LittleEndian::write_u16(&mut buf, value),
            Endian::Big => BigEndian::write_u16(&mut buf, value),
        }
        self.write_bytes(&buf);
    }

    /// Write an i16 in the current byte order.
    pub fn write_i16(&mut self, value: i16) {
        let mut buf = [0u8; 2];
        match self.endian {
            Endian::Little => LittleEndian::write_i16(&mut buf, value),
            Endian::Big => BigEndian::write_i16(&mut buf, value),
        }
        self.write_bytes(&buf);
    }

    /// Write a u32 in the current byte order.
    pub fn write_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        match self.endian {
            Endian::Little => LittleEndian::write_u32(&mut buf, value),
            Endian::Big => BigEndian::write_u32(&mut buf, value),
        }
        self.write_bytes(&buf);
    }

    /// Write an i32 in the current byte order.
    pub fn write_i32(&mut self, value: i32) {
        let mut buf = [0u8; 4];
        match self.endian {
            Endian::Little => LittleEndian::write_i32(&mut buf, value),
            Endian::Big => BigEndian::write_i32(&mut buf, value),
        }
        self.write_bytes(&buf);
    }
}
