//! Pixel format geometry for tiled surfaces.

/// Block layout and tiling alignment of one pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatInfo {
    /// Format name used for lookup.
    pub name: &'static str,
    /// Block width in pixels.
    pub block_width: u32,
    /// Block height in pixels.
    pub block_height: u32,
    /// Bytes per block.
    pub bytes_per_block: u32,
    /// Surface width alignment in pixels (0 = none).
    pub align_x: u32,
    /// Surface height alignment in pixels (0 = none).
    pub align_y: u32,
}

impl PixelFormatInfo {
    const fn new(
        name: &'static str,
        block_width: u32,
        block_height: u32,
        bytes_per_block: u32,
        align_x: u32,
        align_y: u32,
    ) -> Self {
        Self {
            name,
            block_width,
            block_height,
            bytes_per_block,
            align_x,
            align_y,
        }
    }

    /// Whether one block covers a single pixel.
    pub const fn is_uncompressed(&self) -> bool {
        self.block_width == 1 && self.block_height == 1
    }
}

/// Every format with known tiling geometry.
pub const PIXEL_FORMATS: &[PixelFormatInfo] = &[
    PixelFormatInfo::new("P8", 1, 1, 1, 0, 0),
    PixelFormatInfo::new("G8", 1, 1, 1, 64, 64),
    PixelFormatInfo::new("RGB8", 1, 1, 3, 0, 0),
    PixelFormatInfo::new("RGBA8", 1, 1, 4, 32, 32),
    PixelFormatInfo::new("BGRA8", 1, 1, 4, 32, 32),
    PixelFormatInfo::new("DXT1", 4, 4, 8, 128, 128),
    PixelFormatInfo::new("DXT3", 4, 4, 16, 128, 128),
    PixelFormatInfo::new("DXT5", 4, 4, 16, 128, 128),
    PixelFormatInfo::new("V8U8", 1, 1, 2, 64, 32),
    PixelFormatInfo::new("BC5", 4, 4, 16, 0, 0),
    PixelFormatInfo::new("BC7", 4, 4, 16, 0, 0),
    PixelFormatInfo::new("A1", 8, 1, 1, 0, 0),
    PixelFormatInfo::new("RGBA4", 1, 1, 2, 0, 0),
];

/// Look up a format by its exact name.
pub fn lookup(name: &str) -> Option<&'static PixelFormatInfo> {
    PIXEL_FORMATS.iter().find(|info| info.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let dxt1 = lookup("DXT1").unwrap();
        assert_eq!(
            (dxt1.block_width, dxt1.block_height, dxt1.bytes_per_block),
            (4, 4, 8)
        );
        assert_eq!((dxt1.align_x, dxt1.align_y), (128, 128));

        let v8u8 = lookup("V8U8").unwrap();
        assert_eq!((v8u8.align_x, v8u8.align_y), (64, 32));
        assert!(v8u8.is_uncompressed());
    }

    #[test]
    fn test_lookup_unknown_and_case() {
        assert!(lookup("BC4").is_none());
        assert!(lookup("dxt1").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in PIXEL_FORMATS.iter().enumerate() {
            for b in &PIXEL_FORMATS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
