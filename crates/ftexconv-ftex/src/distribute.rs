//! Placement of mip levels into payload files.
//!
//! The cumulative-size thresholds were matched against shipped files and are
//! not a documented rule. They are kept exactly so rebuilt containers split
//! the same way.

use tracing::debug;

use crate::chunk::Chunk;
use crate::descriptor::MipLevelDescriptor;
use crate::mip::MipLevelPayload;
use crate::payload::PayloadFile;
use crate::Result;

/// Largest decompressed chunk produced when splitting mip data.
pub const MAX_CHUNK_SIZE: usize = i16::MAX as usize;

/// Upper cumulative-size bounds for payload files 1 to 4.
const PAYLOAD_FILE_THRESHOLDS: [usize; 4] = [21872, 87408, 349552, 1398128];

/// Payload file number for a mip whose ascending-size running total is `cumulative`.
pub fn payload_file_number(cumulative: usize) -> u8 {
    PAYLOAD_FILE_THRESHOLDS
        .iter()
        .position(|&limit| cumulative <= limit)
        .map_or(5, |i| i as u8 + 1)
}

/// Assign a payload file number to every descriptor.
///
/// A lone mip goes to file 1. Otherwise mips are visited smallest first and
/// numbered by the running total of decompressed sizes.
pub fn assign_payload_files(descriptors: &mut [MipLevelDescriptor]) {
    if let [only] = descriptors {
        only.payload_file_number = 1;
        return;
    }

    let mut order: Vec<usize> = (0..descriptors.len()).collect();
    order.sort_by_key(|&i| descriptors[i].decompressed_size);

    let mut cumulative = 0usize;
    for i in order {
        let descriptor = &mut descriptors[i];
        cumulative += descriptor.decompressed_size.max(0) as usize;
        descriptor.payload_file_number = payload_file_number(cumulative);
    }
}

/// Split mip bytes into compressed chunks of at most [`MAX_CHUNK_SIZE`] bytes.
pub fn split_into_chunks(data: &[u8]) -> Result<Vec<Chunk>> {
    data.chunks(MAX_CHUNK_SIZE)
        .map(|slice| Chunk::from_raw(slice.to_vec()))
        .collect()
}

/// Build payload files from assigned descriptors and per-mip data.
///
/// Files are created in order of first reference in the descriptor table and
/// each receives its mips in descriptor order. `mip_data[i]` belongs to
/// `descriptors[i]`.
pub fn build_payload_files(
    descriptors: &[MipLevelDescriptor],
    mip_data: &[Vec<u8>],
) -> Result<Vec<PayloadFile>> {
    let mut files: Vec<PayloadFile> = Vec::new();

    for (descriptor, data) in descriptors.iter().zip(mip_data) {
        let number = descriptor.payload_file_number;
        let mip = MipLevelPayload::new(split_into_chunks(data)?);
        debug!(
            mip = descriptor.index,
            file = number,
            chunks = mip.chunks().len(),
            "placing mip"
        );

        match files.iter_mut().find(|f| f.file_number() == number) {
            Some(file) => file.add_mip(mip),
            None => {
                let mut file = PayloadFile::new(number);
                file.add_mip(mip);
                files.push(file);
            }
        }
    }

    Ok(files)
}
