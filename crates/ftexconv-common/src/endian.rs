//! Runtime-selectable byte order.

use std::fmt;

/// Byte order used for multi-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Least significant byte first (PC files).
    #[default]
    Little,
    /// Most significant byte first (Xbox 360 / PS3 files).
    Big,
}

impl Endian {
    /// Pick big-endian when `flip` is set, little-endian otherwise.
    #[inline]
    pub const fn from_flip(flip: bool) -> Self {
        if flip {
            Self::Big
        } else {
            Self::Little
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => f.write_str("little-endian"),
            Self::Big => f.write_str("big-endian"),
        }
    }
}
