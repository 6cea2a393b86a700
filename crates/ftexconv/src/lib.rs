//! ftexconv - console FTEX texture conversion library.
//!
//! This crate provides a unified interface to the ftexconv crates and the
//! conversions between FTEX containers and DDS files.
//!
//! # Crates
//!
//! - [`ftexconv_common`] - Endian-aware binary reader and writer
//! - [`ftexconv_dds`] - DDS header and file model
//! - [`ftexconv_tiling`] - Xbox 360 tiling and pixel format tables
//! - [`ftexconv_ftex`] - FTEX/FTEXS container, chunk codec and payload placement
//!
//! # Example
//!
//! ```no_run
//! use ftexconv::prelude::*;
//!
//! // Read a header together with its .ftexs payload files
//! let ftex = read_ftex("stone.ftex")?;
//!
//! // Convert to DDS, untiling console texel data
//! let dds = ftex_to_dds(&ftex, &ConvertOptions { deswizzle: true })?;
//! write_dds(&dds, "stone.dds")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod convert;
mod error;
mod io;

// Re-export all sub-crates
pub use ftexconv_common as common;
pub use ftexconv_dds as dds;
pub use ftexconv_ftex as ftex;
pub use ftexconv_tiling as tiling;

pub use convert::{dds_format, dds_to_ftex, ftex_pixel_format, ftex_to_dds, ConvertOptions};
pub use error::{Error, Result};
pub use io::{payload_path, read_dds, read_ftex, write_dds, write_ftex};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        dds_to_ftex, ftex_to_dds, read_dds, read_ftex, write_dds, write_ftex, ConvertOptions,
    };
    pub use ftexconv_common::Endian;
    pub use ftexconv_dds::{DdsFile, DdsFormat};
    pub use ftexconv_ftex::{FtexFile, MipLevelDescriptor, PayloadFile};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
