//! DDS texture file handling for ftexconv.
//!
//! Only the subset needed to exchange data with console texture containers is
//! modelled: the classic 124-byte header, the five pixel formats the converter
//! maps (A8R8G8B8, L8, DXT1, DXT3, DXT5) and the per-level image size formula.
//! Pixel data is kept as one opaque buffer holding every mip level, largest
//! first.
//!
//! # Example
//!
//! ```no_run
//! use ftexconv_dds::DdsFile;
//!
//! let bytes = std::fs::read("texture.dds")?;
//! let dds = DdsFile::parse(&bytes)?;
//! println!("{}x{}, {} mips", { dds.header.width }, { dds.header.height }, dds.mip_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod header;

pub use error::{Error, Result};
pub use file::DdsFile;
pub use header::{
    caps, flags, image_size, mipmap_size, pf_flags, DdsFormat, DdsHeader, DdsPixelFormat, FourCC,
};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
