//! DDS header structures.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Header flag bits (`dwFlags`).
pub mod flags {
    /// Required in every DDS file.
    pub const CAPS: u32 = 0x1;
    /// Required in every DDS file.
    pub const HEIGHT: u32 = 0x2;
    /// Required in every DDS file.
    pub const WIDTH: u32 = 0x4;
    /// Pitch is provided for an uncompressed texture.
    pub const PITCH: u32 = 0x8;
    /// Required in every DDS file.
    pub const PIXEL_FORMAT: u32 = 0x1000;
    /// The mipmap count field is meaningful.
    pub const MIPMAP_COUNT: u32 = 0x20000;
    /// Linear size is provided for a compressed texture.
    pub const LINEAR_SIZE: u32 = 0x80000;
    /// Depth is provided for a volume texture.
    pub const DEPTH: u32 = 0x800000;

    /// Flags every plain 2D texture carries.
    pub const TEXTURE: u32 = CAPS | HEIGHT | WIDTH | PIXEL_FORMAT;
}

/// Surface capability bits (`dwCaps`).
pub mod caps {
    /// More than one surface is stored.
    pub const COMPLEX: u32 = 0x8;
    /// Required.
    pub const TEXTURE: u32 = 0x1000;
    /// The surface has a mipmap chain.
    pub const MIPMAP: u32 = 0x400000;
}

/// Pixel format flag bits (`ddspf.dwFlags`).
pub mod pf_flags {
    /// Texture contains alpha data.
    pub const ALPHA_PIXELS: u32 = 0x1;
    /// Texture is compressed; `four_cc` is valid.
    pub const FOUR_CC: u32 = 0x4;
    /// Texture contains uncompressed RGB data.
    pub const RGB: u32 = 0x40;
    /// Single channel luminance data.
    pub const LUMINANCE: u32 = 0x20000;
}

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// Create a texture header with the given dimensions and pixel format.
    ///
    /// Flags are set to [`flags::TEXTURE`] and caps to [`caps::TEXTURE`];
    /// callers add mipmap or depth bits as needed.
    pub fn new(width: u32, height: u32, depth: u32, mipmap_count: u32, format: DdsFormat) -> Self {
        Self {
            size: Self::SIZE,
            flags: flags::TEXTURE,
            height,
            width,
            pitch_or_linear_size: 0,
            depth,
            mipmap_count,
            reserved1: [0; 11],
            pixel_format: format.pixel_format(),
            caps: caps::TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    /// Check if this is a DX10 extended header.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format.four_cc == FourCC::DX10
    }

    /// Check whether the header declares a mipmap chain.
    pub fn has_mipmaps(&self) -> bool {
        let header_flags = self.flags;
        header_flags & flags::MIPMAP_COUNT != 0
    }

    /// Check whether the header carries the depth (volume) flag.
    pub fn is_volume(&self) -> bool {
        let header_flags = self.flags;
        header_flags & flags::DEPTH != 0
    }

    /// Number of mip levels stored in the file.
    ///
    /// A header without the mipmap flag stores exactly one level.
    pub fn stored_mip_count(&self) -> u32 {
        if self.has_mipmaps() {
            self.mipmap_count.max(1)
        } else {
            1
        }
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    /// Classify this pixel format as one of the known formats.
    pub fn format(&self) -> Option<DdsFormat> {
        DdsFormat::ALL
            .into_iter()
            .find(|format| self.matches(&format.pixel_format()))
    }

    fn matches(&self, other: &DdsPixelFormat) -> bool {
        // Copy out of the packed structs before comparing.
        let (flags, four_cc, bits) = (self.flags, self.four_cc, self.rgb_bit_count);
        let masks = (
            self.r_bit_mask,
            self.g_bit_mask,
            self.b_bit_mask,
            self.a_bit_mask,
        );
        let (o_flags, o_four_cc, o_bits) = (other.flags, other.four_cc, other.rgb_bit_count);
        let o_masks = (
            other.r_bit_mask,
            other.g_bit_mask,
            other.b_bit_mask,
            other.a_bit_mask,
        );

        if flags & pf_flags::FOUR_CC != 0 {
            o_flags & pf_flags::FOUR_CC != 0 && four_cc == o_four_cc
        } else {
            flags == o_flags && bits == o_bits && masks == o_masks
        }
    }
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// No compression.
    pub const NONE: Self = Self([0; 4]);
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT3 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");
    /// DX10 extended header.
    pub const DX10: Self = Self(*b"DX10");
}

/// Linear pixel formats understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DdsFormat {
    /// 32-bit uncompressed ARGB.
    A8R8G8B8,
    /// 8-bit luminance.
    Luminance,
    /// BC1 / DXT1 block compression.
    Dxt1,
    /// BC2 / DXT3 block compression.
    Dxt3,
    /// BC3 / DXT5 block compression.
    Dxt5,
}

impl DdsFormat {
    /// Every known format.
    pub const ALL: [DdsFormat; 5] = [
        DdsFormat::A8R8G8B8,
        DdsFormat::Luminance,
        DdsFormat::Dxt1,
        DdsFormat::Dxt3,
        DdsFormat::Dxt5,
    ];

    /// The canonical pixel format structure for this format.
    pub fn pixel_format(self) -> DdsPixelFormat {
        let base = DdsPixelFormat {
            size: DdsPixelFormat::SIZE,
            flags: 0,
            four_cc: FourCC::NONE,
            rgb_bit_count: 0,
            r_bit_mask: 0,
            g_bit_mask: 0,
            b_bit_mask: 0,
            a_bit_mask: 0,
        };
        match self {
            DdsFormat::A8R8G8B8 => DdsPixelFormat {
                flags: pf_flags::RGB | pf_flags::ALPHA_PIXELS,
                rgb_bit_count: 32,
                r_bit_mask: 0x00FF_0000,
                g_bit_mask: 0x0000_FF00,
                b_bit_mask: 0x0000_00FF,
                a_bit_mask: 0xFF00_0000,
                ..base
            },
            DdsFormat::Luminance => DdsPixelFormat {
                flags: pf_flags::LUMINANCE,
                rgb_bit_count: 8,
                r_bit_mask: 0xFF,
                ..base
            },
            DdsFormat::Dxt1 => DdsPixelFormat {
                flags: pf_flags::FOUR_CC,
                four_cc: FourCC::DXT1,
                ..base
            },
            DdsFormat::Dxt3 => DdsPixelFormat {
                flags: pf_flags::FOUR_CC,
                four_cc: FourCC::DXT3,
                ..base
            },
            DdsFormat::Dxt5 => DdsPixelFormat {
                flags: pf_flags::FOUR_CC,
                four_cc: FourCC::DXT5,
                ..base
            },
        }
    }

    /// Bytes per 4x4 block for block-compressed formats.
    pub fn block_size(self) -> Option<usize> {
        match self {
            DdsFormat::Dxt1 => Some(8),
            DdsFormat::Dxt3 | DdsFormat::Dxt5 => Some(16),
            DdsFormat::A8R8G8B8 | DdsFormat::Luminance => None,
        }
    }

    /// Bytes per pixel for uncompressed formats.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            DdsFormat::A8R8G8B8 => Some(4),
            DdsFormat::Luminance => Some(1),
            DdsFormat::Dxt1 | DdsFormat::Dxt3 | DdsFormat::Dxt5 => None,
        }
    }
}

/// Calculate the size in bytes of one image of the given format.
///
/// Returns `None` if the size does not fit in a `usize`.
pub fn image_size(format: DdsFormat, width: u32, height: u32) -> Option<usize> {
    match format.block_size() {
        Some(block_size) => mipmap_size(width, height, block_size),
        None => (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(format.bytes_per_pixel().unwrap_or(1)),
    }
}

/// Calculate the size in bytes of a block-compressed mipmap level.
///
/// Returns `None` if the size does not fit in a `usize`.
pub fn mipmap_size(width: u32, height: u32, block_size: usize) -> Option<usize> {
    let blocks_x = (width as usize).div_ceil(4).max(1);
    let blocks_y = (height as usize).div_ceil(4).max(1);
    blocks_x.checked_mul(blocks_y)?.checked_mul(block_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), DdsHeader::SIZE as usize);
        assert_eq!(
            std::mem::size_of::<DdsPixelFormat>(),
            DdsPixelFormat::SIZE as usize
        );
    }

    #[test]
    fn test_mipmap_size_calculation() {
        // 4x4 block minimum
        assert_eq!(mipmap_size(1, 1, 16), Some(16));
        assert_eq!(mipmap_size(4, 4, 16), Some(16));
        assert_eq!(mipmap_size(8, 8, 16), Some(64));
        assert_eq!(mipmap_size(1024, 1024, 16), Some(1024 * 1024));
    }

    #[test]
    fn test_image_size_per_format() {
        assert_eq!(image_size(DdsFormat::Dxt1, 16, 16), Some(128));
        assert_eq!(image_size(DdsFormat::Dxt5, 16, 16), Some(256));
        assert_eq!(image_size(DdsFormat::A8R8G8B8, 16, 16), Some(1024));
        assert_eq!(image_size(DdsFormat::Luminance, 16, 16), Some(256));
    }

    #[test]
    fn test_image_size_overflow() {
        assert_eq!(mipmap_size(u32::MAX, u32::MAX, usize::MAX), None);
        assert_eq!(image_size(DdsFormat::A8R8G8B8, 1, 1), Some(4));
        assert_eq!(image_size(DdsFormat::A8R8G8B8, u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_pixel_format_classification() {
        for format in DdsFormat::ALL {
            assert_eq!(format.pixel_format().format(), Some(format));
        }

        let mut unknown = DdsFormat::A8R8G8B8.pixel_format();
        unknown.rgb_bit_count = 24;
        assert_eq!(unknown.format(), None);
    }

    #[test]
    fn test_header_flags() {
        let mut header = DdsHeader::new(16, 16, 0, 3, DdsFormat::Dxt1);
        assert!(!header.has_mipmaps());
        assert_eq!(header.stored_mip_count(), 1);

        header.flags |= flags::MIPMAP_COUNT;
        assert!(header.has_mipmaps());
        assert_eq!(header.stored_mip_count(), 3);
        assert!(!header.is_volume());
    }
}
