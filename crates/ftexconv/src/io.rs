//! Reading and writing FTEX textures and their payload files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use ftexconv_common::Endian;
use ftexconv_dds::DdsFile;
use ftexconv_ftex::FtexFile;
use tracing::debug;

use crate::{Error, Result};

/// Path of payload file `file_number` belonging to the header at `ftex_path`.
///
/// `dir/name.ftex` maps to `dir/name.N.ftexs`.
pub fn payload_path(ftex_path: &Path, file_number: u8) -> PathBuf {
    ftex_path.with_extension(format!("{file_number}.ftexs"))
}

/// Read an FTEX header and every payload file it references.
pub fn read_ftex(path: impl AsRef<Path>) -> Result<FtexFile> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let mut ftex = FtexFile::parse(&bytes)?;

    for number in ftex.payload_file_numbers() {
        let payload = payload_path(path, number);
        debug!(path = %payload.display(), "reading payload file");
        let bytes = fs::read(&payload).map_err(|e| Error::io(&payload, e))?;
        ftex.read_payload_file(number, &bytes)?;
    }

    Ok(ftex)
}

/// Write an FTEX header and its payload files in the given byte order.
///
/// Payload files are written first; their layout fixes the descriptor
/// offsets the header records.
pub fn write_ftex(ftex: &mut FtexFile, path: impl AsRef<Path>, endian: Endian) -> Result<()> {
    let path = path.as_ref();

    for (number, bytes) in ftex.write_payload_files(endian) {
        let payload = payload_path(path, number);
        debug!(path = %payload.display(), size = bytes.len(), "writing payload file");
        fs::write(&payload, bytes).map_err(|e| Error::io(&payload, e))?;
    }

    fs::write(path, ftex.to_bytes(endian)).map_err(|e| Error::io(path, e))
}

/// Read a DDS file.
pub fn read_dds(path: impl AsRef<Path>) -> Result<DdsFile> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(DdsFile::parse(&bytes)?)
}

/// Write a DDS file.
pub fn write_dds(dds: &DdsFile, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, dds.to_bytes()).map_err(|e| Error::io(path, e))
}
