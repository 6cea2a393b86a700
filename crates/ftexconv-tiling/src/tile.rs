//! Tiled <-> linear address translation.

use tracing::debug;

use crate::format::{self, PixelFormatInfo};
use crate::{Error, Result};

/// Round `value` up to a multiple of `alignment` (a power of two).
///
/// An alignment of zero leaves the value unchanged.
#[inline]
pub const fn align(value: u32, alignment: u32) -> u32 {
    if alignment == 0 {
        return value;
    }
    (value + alignment - 1) & !(alignment - 1)
}

/// Block index inside a tiled surface for the linear block `(x, y)`.
///
/// `width` is the surface width in blocks and `log2_bpb` is
/// `log2(bytes_per_block)`. This is the Xbox 360 `XGAddress2DTiledOffset`
/// scheme: 32x32-block macro tiles in row-major order, with the low
/// coordinate bits interleaved inside each tile.
pub const fn tiled_block_offset(x: u32, y: u32, width: u32, log2_bpb: u32) -> u32 {
    let aligned_width = align(width, 32);
    // high bits of the coordinates pick the macro tile
    let macro_tile = ((x >> 5) + (y >> 5) * (aligned_width >> 5)) << (log2_bpb + 7);
    // low bits of the coordinates (6-bit value)
    let micro_tile = ((x & 7) + ((y & 0xE) << 2)) << log2_bpb;
    let offset = macro_tile + ((micro_tile & !0xF) << 1) + (micro_tile & 0xF) + ((y & 1) << 4);

    (((offset & !0x1FF) << 3)
        + ((y & 16) << 7)
        + ((offset & 0x1C0) << 2)
        + (((((y & 8) >> 2) + (x >> 3)) & 3) << 6)
        + (offset & 0x3F))
        >> log2_bpb
}

/// Block grid shared by the untile/tile loops.
struct Grid {
    tiled_blocks_wide: usize,
    original_blocks_wide: usize,
    blocks_high: usize,
    log2_bpb: u32,
}

impl Grid {
    fn new(
        tiled_width: u32,
        original_width: u32,
        height: u32,
        block_width: u32,
        block_height: u32,
        bytes_per_block: u32,
    ) -> Option<Self> {
        if block_width == 0 || block_height == 0 || bytes_per_block == 0 {
            return None;
        }
        let grid = Self {
            tiled_blocks_wide: (tiled_width / block_width) as usize,
            original_blocks_wide: (original_width / block_width) as usize,
            blocks_high: (height / block_height) as usize,
            log2_bpb: bytes_per_block.ilog2(),
        };
        (grid.tiled_blocks_wide != 0 && grid.blocks_high != 0).then_some(grid)
    }

    /// Yields `(linear_block, tiled_block)` index pairs.
    fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.blocks_high).flat_map(move |y| {
            (0..self.original_blocks_wide).map(move |x| {
                let addr = tiled_block_offset(
                    x as u32,
                    y as u32,
                    self.tiled_blocks_wide as u32,
                    self.log2_bpb,
                ) as usize;
                let sy = addr / self.tiled_blocks_wide;
                let sx = addr % self.tiled_blocks_wide;
                (
                    y * self.original_blocks_wide + x,
                    sy * self.tiled_blocks_wide + sx,
                )
            })
        })
    }
}

fn copy_run(src: &[u8], src_at: usize, dst: &mut [u8], dst_at: usize, len: usize) -> Result<()> {
    if src_at + len > src.len() {
        return Err(Error::TileOutOfBounds {
            offset: src_at,
            len: src.len(),
        });
    }
    if dst_at + len > dst.len() {
        return Err(Error::TileOutOfBounds {
            offset: dst_at,
            len: dst.len(),
        });
    }
    dst[dst_at..dst_at + len].copy_from_slice(&src[src_at..src_at + len]);
    Ok(())
}

/// Untile a block-compressed surface.
///
/// `tiled_width` is the padded width the surface was tiled with and
/// `original_width` the width of the linear output rows; both are in pixels.
/// Every block of the original grid is copied from its tiled position to its
/// linear position. The output has the same length as `data`; bytes outside
/// the original grid stay zero.
pub fn untile_compressed(
    data: &[u8],
    tiled_width: u32,
    original_width: u32,
    height: u32,
    block_width: u32,
    block_height: u32,
    bytes_per_block: u32,
) -> Result<Vec<u8>> {
    let Some(grid) = Grid::new(
        tiled_width,
        original_width,
        height,
        block_width,
        block_height,
        bytes_per_block,
    ) else {
        return Ok(data.to_vec());
    };

    let bpb = bytes_per_block as usize;
    let mut output = vec![0u8; data.len()];
    for (linear, tiled) in grid.pairs() {
        copy_run(data, tiled * bpb, &mut output, linear * bpb, bpb)?;
    }
    Ok(output)
}

/// Tile a linear block-compressed surface; the inverse of [`untile_compressed`].
pub fn tile_compressed(
    data: &[u8],
    tiled_width: u32,
    original_width: u32,
    height: u32,
    block_width: u32,
    block_height: u32,
    bytes_per_block: u32,
) -> Result<Vec<u8>> {
    let Some(grid) = Grid::new(
        tiled_width,
        original_width,
        height,
        block_width,
        block_height,
        bytes_per_block,
    ) else {
        return Ok(data.to_vec());
    };

    let bpb = bytes_per_block as usize;
    let mut output = vec![0u8; data.len()];
    for (linear, tiled) in grid.pairs() {
        copy_run(data, linear * bpb, &mut output, tiled * bpb, bpb)?;
    }
    Ok(output)
}

/// Untile an uncompressed surface scanline by scanline.
///
/// Each tiled unit is a `block_width x block_height` pixel run; its
/// `block_height` rows of `bytes_per_block / block_height` bytes are copied
/// one at a time. For 1x1 blocks this is equivalent to
/// [`untile_compressed`].
pub fn untile_uncompressed(
    data: &[u8],
    tiled_width: u32,
    original_width: u32,
    height: u32,
    block_width: u32,
    block_height: u32,
    bytes_per_block: u32,
) -> Result<Vec<u8>> {
    let Some(grid) = Grid::new(
        tiled_width,
        original_width,
        height,
        block_width,
        block_height,
        bytes_per_block,
    ) else {
        return Ok(data.to_vec());
    };

    let rows = block_height as usize;
    let row_bytes = (bytes_per_block / block_height).max(1) as usize;
    let mut output = vec![0u8; data.len()];
    for (linear, tiled) in grid.pairs() {
        let (dy, dx) = (
            linear / grid.original_blocks_wide,
            linear % grid.original_blocks_wide,
        );
        let (sy, sx) = (tiled / grid.tiled_blocks_wide, tiled % grid.tiled_blocks_wide);
        for row in 0..rows {
            let dst = ((dy * rows + row) * grid.original_blocks_wide + dx) * row_bytes;
            let src = ((sy * rows + row) * grid.tiled_blocks_wide + sx) * row_bytes;
            copy_run(data, src, &mut output, dst, row_bytes)?;
        }
    }
    Ok(output)
}

fn untile_span(
    info: &PixelFormatInfo,
    span: &[u8],
    tiled_width: u32,
    width: u32,
    tiled_height: u32,
) -> Result<Vec<u8>> {
    let untile = if info.is_uncompressed() {
        untile_uncompressed
    } else {
        untile_compressed
    };
    untile(
        span,
        tiled_width,
        width,
        tiled_height,
        info.block_width,
        info.block_height,
        info.bytes_per_block,
    )
}

/// Untile every level of a mip chain stored back to back.
///
/// Formats missing from [`format::PIXEL_FORMATS`] are returned unchanged.
/// Each level is padded to the format's alignment before its span is
/// computed; dimensions are halved between levels without a lower bound.
pub fn deswizzle_mip_chain(
    data: &[u8],
    width: u32,
    height: u32,
    mip_count: u32,
    format_name: &str,
) -> Result<Vec<u8>> {
    let Some(info) = format::lookup(format_name) else {
        debug!(format = format_name, "no tiling info, passing data through");
        return Ok(data.to_vec());
    };

    let mut output = data.to_vec();
    let (mut width, mut height) = (width, height);
    let mut position = 0usize;

    for mip in 0..mip_count {
        let tiled_width = align(width, info.align_x);
        let tiled_height = align(height, info.align_y);
        let size = (tiled_width / info.block_width) as usize
            * (tiled_height / info.block_height) as usize
            * info.bytes_per_block as usize;

        let end = position + size;
        if end > output.len() {
            return Err(Error::TruncatedMipData {
                mip,
                needed: end,
                available: output.len(),
            });
        }

        debug!(mip, width, height, tiled_width, tiled_height, size, "untiling mip");
        let untiled = untile_span(
            info,
            &output[position..end],
            tiled_width,
            width,
            tiled_height,
        )?;
        output[position..end].copy_from_slice(&untiled);

        position = end;
        width /= 2;
        height /= 2;
    }

    Ok(output)
}

/// Swap the two bytes of every 16-bit word in place.
///
/// A trailing odd byte is left untouched.
pub fn swap_byte_order_16(data: &mut [u8]) {
    for pair in data.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + i / 251) as u8).collect()
    }

    #[test]
    fn test_align() {
        assert_eq!(align(16, 128), 128);
        assert_eq!(align(128, 128), 128);
        assert_eq!(align(129, 128), 256);
        assert_eq!(align(0, 32), 0);
        assert_eq!(align(17, 0), 17);
    }

    #[test]
    fn test_tiled_block_offset_known_values() {
        assert_eq!(tiled_block_offset(0, 0, 32, 3), 0);
        assert_eq!(tiled_block_offset(1, 0, 32, 3), 1);
        assert_eq!(tiled_block_offset(0, 1, 32, 3), 2);
        assert_eq!(tiled_block_offset(8, 0, 32, 3), 8);
        assert_eq!(tiled_block_offset(0, 2, 32, 3), 64);
        assert_eq!(tiled_block_offset(32, 0, 64, 3), 1024);
        assert_eq!(tiled_block_offset(5, 9, 32, 4), 555);
        assert_eq!(tiled_block_offset(31, 31, 32, 2), 991);
    }

    #[test]
    fn test_tiled_block_offset_is_a_bijection() {
        for log2_bpb in 2..=4 {
            for (w, h) in [(32u32, 32u32), (64, 32), (32, 64), (64, 64)] {
                let offsets: HashSet<u32> = (0..h)
                    .flat_map(|y| (0..w).map(move |x| tiled_block_offset(x, y, w, log2_bpb)))
                    .collect();
                assert_eq!(offsets.len(), (w * h) as usize);
                assert!(offsets.iter().all(|&o| o < w * h));
            }
        }
    }

    #[test]
    fn test_untile_inverts_tile() {
        // 128x128 DXT1: 32x32 blocks of 8 bytes
        let linear = pattern(32 * 32 * 8);
        let tiled = tile_compressed(&linear, 128, 128, 128, 4, 4, 8).unwrap();
        assert_ne!(tiled, linear);

        let untiled = untile_compressed(&tiled, 128, 128, 128, 4, 4, 8).unwrap();
        assert_eq!(untiled, linear);
    }

    #[test]
    fn test_tile_inverts_untile() {
        // synthetic tiled 256x128 DXT5 surface
        let tiled = pattern(64 * 32 * 16);
        let linear = untile_compressed(&tiled, 256, 256, 128, 4, 4, 16).unwrap();
        let retiled = tile_compressed(&linear, 256, 256, 128, 4, 4, 16).unwrap();
        assert_eq!(retiled, tiled);
    }

    #[test]
    fn test_untile_narrower_original() {
        // 64 px wide image padded to 128: only the first 16 block columns survive
        let linear = pattern(32 * 32 * 8);
        let tiled = tile_compressed(&linear, 128, 128, 128, 4, 4, 8).unwrap();
        let untiled = untile_compressed(&tiled, 128, 64, 128, 4, 4, 8).unwrap();

        assert_eq!(untiled.len(), tiled.len());
        for y in 0..32 {
            let dst = &untiled[y * 16 * 8..(y * 16 + 16) * 8];
            let src = &linear[y * 32 * 8..(y * 32 + 16) * 8];
            assert_eq!(dst, src);
        }
        assert!(untiled[32 * 16 * 8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_uncompressed_matches_compressed_for_single_pixel_blocks() {
        // 32x32 RGBA8
        let tiled = pattern(32 * 32 * 4);
        let a = untile_uncompressed(&tiled, 32, 32, 32, 1, 1, 4).unwrap();
        let b = untile_compressed(&tiled, 32, 32, 32, 1, 1, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_untile_out_of_bounds() {
        // single-byte blocks on a 32x32 grid address past the surface
        let err = untile_compressed(&[0u8; 1024], 32, 32, 32, 1, 1, 1).unwrap_err();
        assert!(matches!(err, Error::TileOutOfBounds { len: 1024, .. }));
    }

    #[test]
    fn test_untile_empty_grid_passes_through() {
        let data = [1u8, 2, 3];
        assert_eq!(untile_compressed(&data, 0, 0, 0, 4, 4, 8).unwrap(), data);
    }

    #[test]
    fn test_deswizzle_unknown_format_passes_through() {
        let data = pattern(100);
        assert_eq!(deswizzle_mip_chain(&data, 16, 16, 3, "BC4").unwrap(), data);
    }

    #[test]
    fn test_deswizzle_single_rgba8_mip() {
        let linear = pattern(32 * 32 * 4);
        let tiled = tile_compressed(&linear, 32, 32, 32, 1, 1, 4).unwrap();
        assert_eq!(deswizzle_mip_chain(&tiled, 32, 32, 1, "RGBA8").unwrap(), linear);
    }

    #[test]
    fn test_deswizzle_dxt1_chain() {
        // 128x128 then 64x64; both pad to a 128x128 (8192 byte) span
        let mip0 = pattern(8192);
        let mip1: Vec<u8> = pattern(8192).into_iter().map(|b| b ^ 0x5A).collect();
        let mut tiled = tile_compressed(&mip0, 128, 128, 128, 4, 4, 8).unwrap();
        tiled.extend(tile_compressed(&mip1, 128, 128, 128, 4, 4, 8).unwrap());

        let out = deswizzle_mip_chain(&tiled, 128, 128, 2, "DXT1").unwrap();
        assert_eq!(&out[..8192], &mip0[..]);
        // second level keeps 16 block columns per row
        assert_eq!(&out[8192..8192 + 16 * 8], &mip1[..16 * 8]);
    }

    #[test]
    fn test_deswizzle_truncated() {
        let err = deswizzle_mip_chain(&[0u8; 100], 16, 16, 1, "DXT1").unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedMipData {
                mip: 0,
                needed: 8192,
                available: 100
            }
        ));
    }

    #[test]
    fn test_swap_byte_order_16() {
        let mut data = [1u8, 2, 3, 4, 5];
        swap_byte_order_16(&mut data);
        assert_eq!(data, [2, 1, 4, 3, 5]);
    }
}
