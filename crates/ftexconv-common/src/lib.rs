//! Common utilities for ftexconv.
//!
//! This crate provides the binary plumbing shared by every ftexconv crate:
//!
//! - [`BinaryReader`] - Bounds-checked reading from byte slices
//! - [`BinaryWriter`] - Growable, seekable byte buffer writer
//! - [`Endian`] - The byte order both of them currently use
//!
//! Console texture files mix byte orders field by field, so the reader and
//! writer carry their byte order as mutable state instead of a type parameter.
//! Callers flip it at the field boundaries the format dictates.

mod endian;
mod error;
mod reader;
mod writer;

pub use endian::Endian;
pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
