//! FTEX/FTEXS console texture container handling for ftexconv.
//!
//! An FTEX texture is split across several files:
//!
//! - `name.ftex` - a header plus one [`MipLevelDescriptor`] per mip level
//! - `name.N.ftexs` - numbered [`PayloadFile`]s holding the mip data as
//!   independently zlib-compressed [`Chunk`]s
//!
//! Small mips live in file 1 and larger ones in higher-numbered files; the
//! [`distribute`] module reproduces that placement when building new files.
//!
//! # Example
//!
//! ```no_run
//! use ftexconv_ftex::FtexFile;
//!
//! let mut ftex = FtexFile::parse(&std::fs::read("texture.ftex")?)?;
//! for number in ftex.payload_file_numbers() {
//!     let bytes = std::fs::read(format!("texture.{number}.ftexs"))?;
//!     ftex.read_payload_file(number, &bytes)?;
//! }
//! println!("{}x{}: {} bytes", ftex.width, ftex.height, ftex.data().len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chunk;
mod compress;
mod descriptor;
pub mod distribute;
mod error;
mod file;
mod mip;
mod payload;

pub use chunk::{Chunk, OffsetMode, CHUNK_INDEX_SIZE, DEFAULT_RELATIVE_OFFSET, UNCOMPRESSED_FLAG};
pub use compress::{deflate, inflate};
pub use descriptor::MipLevelDescriptor;
pub use error::{Error, Result};
pub use file::{FtexFile, FTEX_MAGIC, FTEX_VERSION, HEADER_SIZE};
pub use mip::MipLevelPayload;
pub use payload::PayloadFile;
