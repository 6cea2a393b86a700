//! Xbox 360 texture tiling for ftexconv.
//!
//! Console textures are stored in the GPU's tiled memory layout: blocks are
//! grouped into 32x32-block macro tiles and shuffled inside each tile for
//! cache locality. This crate converts such surfaces back to the tightly
//! packed linear layout DDS files use.
//!
//! - [`format`] - block geometry and alignment per pixel format
//! - [`tiled_block_offset`] - the hardware address formula
//! - [`deswizzle_mip_chain`] - untile every level of a mip chain
//! - [`swap_byte_order_16`] - big-endian texel word correction
//!
//! # Example
//!
//! ```
//! use ftexconv_tiling::{deswizzle_mip_chain, swap_byte_order_16};
//!
//! // Unknown formats pass through untouched.
//! let data = vec![1u8, 2, 3, 4];
//! let mut linear = deswizzle_mip_chain(&data, 4, 4, 1, "NOPE")?;
//! swap_byte_order_16(&mut linear);
//! assert_eq!(linear, [2, 1, 4, 3]);
//! # Ok::<(), ftexconv_tiling::Error>(())
//! ```

mod error;
pub mod format;
mod tile;

pub use error::{Error, Result};
pub use format::PixelFormatInfo;
pub use tile::{
    align, deswizzle_mip_chain, swap_byte_order_16, tile_compressed, tiled_block_offset,
    untile_compressed, untile_uncompressed,
};
