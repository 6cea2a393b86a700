//! Conversion between FTEX containers and DDS files.

use ftexconv_dds::{caps, flags, image_size, DdsFile, DdsFormat, DdsHeader};
use ftexconv_ftex::distribute::{assign_payload_files, build_payload_files};
use ftexconv_ftex::{FtexFile, MipLevelDescriptor};
use ftexconv_tiling::{deswizzle_mip_chain, swap_byte_order_16};
use tracing::debug;

use crate::{Error, Result};

/// Smallest mip dimension when slicing a DDS mip chain.
const MIN_MIP_DIMENSION: u32 = 4;

/// Options for FTEX to DDS conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Untile console-swizzled texel data and fix its byte order.
    pub deswizzle: bool,
}

/// Map an FTEX pixel format code to a DDS format and its tiling table name.
///
/// Luminance has no tiling name and is never untiled.
pub fn dds_format(pixel_format: i16) -> Result<(DdsFormat, Option<&'static str>)> {
    match pixel_format {
        0 => Ok((DdsFormat::A8R8G8B8, Some("RGBA8"))),
        1 => Ok((DdsFormat::Luminance, None)),
        2 => Ok((DdsFormat::Dxt1, Some("DXT1"))),
        // no sample files use code 3; DXT3 is a guess
        3 => Ok((DdsFormat::Dxt3, Some("DXT3"))),
        4 => Ok((DdsFormat::Dxt5, Some("DXT5"))),
        other => Err(Error::UnsupportedPixelFormat(format!("FTEX code {other}"))),
    }
}

/// Map a DDS format back to its FTEX pixel format code.
pub fn ftex_pixel_format(format: DdsFormat) -> i16 {
    match format {
        DdsFormat::A8R8G8B8 => 0,
        DdsFormat::Luminance => 1,
        DdsFormat::Dxt1 => 2,
        DdsFormat::Dxt3 => 3,
        DdsFormat::Dxt5 => 4,
    }
}

/// Convert an FTEX container with loaded payload files to a DDS file.
///
/// The A8R8G8B8 output always carries the depth flag, matching what the
/// game's own tools emit for 2D textures.
pub fn ftex_to_dds(ftex: &FtexFile, options: &ConvertOptions) -> Result<DdsFile> {
    let (format, tiling) = dds_format(ftex.pixel_format)?;
    let width = ftex.width.max(0) as u32;
    let height = ftex.height.max(0) as u32;
    let depth = ftex.depth.max(0) as u32;
    let mip_count = u32::from(ftex.mip_count);

    let mut header = DdsHeader::new(width, height, depth, mip_count, format);
    header.flags |= flags::MIPMAP_COUNT;
    header.caps |= caps::MIPMAP;
    if format == DdsFormat::A8R8G8B8 {
        header.flags |= flags::DEPTH;
    }

    let mut data = ftex.data();
    if let (Some(name), true) = (tiling, options.deswizzle) {
        debug!(format = name, width, height, mip_count, "deswizzling");
        data = deswizzle_mip_chain(&data, width, height, mip_count, name)?;
        swap_byte_order_16(&mut data);
    }

    Ok(DdsFile::new(header, data))
}

/// Build an FTEX container, payload files included, from a DDS file.
///
/// Texel data is copied as is; no tiling or byte swapping is applied.
/// Descriptor offsets are filled in once the payload files are written.
pub fn dds_to_ftex(dds: &DdsFile, texture_type: i32) -> Result<FtexFile> {
    let Some(format) = dds.format() else {
        let four_cc = dds.header.pixel_format.four_cc;
        return Err(Error::UnsupportedPixelFormat(format!(
            "DDS fourCC {:?}",
            String::from_utf8_lossy(&four_cc.0)
        )));
    };

    let width = dds.header.width;
    let height = dds.header.height;
    let depth = dds.header.depth;
    let mip_count = dds.mip_count();

    let mut ftex = FtexFile::new();
    ftex.pixel_format = ftex_pixel_format(format);
    ftex.width = header_dimension("width", width)?;
    ftex.height = header_dimension("height", height)?;
    ftex.depth = header_dimension("depth", depth)?;
    ftex.mip_count = u8::try_from(mip_count).map_err(|_| Error::DimensionTooLarge {
        field: "mip count",
        value: mip_count,
    })?;
    ftex.nrt_flag = 2;
    ftex.texture_type = texture_type;

    let mip_data = split_mips(&dds.data, format, width, height, mip_count)?;
    let mut descriptors: Vec<MipLevelDescriptor> = mip_data
        .iter()
        .enumerate()
        .map(|(index, data)| MipLevelDescriptor {
            index: index as u8,
            decompressed_size: data.len() as i32,
            ..Default::default()
        })
        .collect();
    assign_payload_files(&mut descriptors);
    let payload_files = build_payload_files(&descriptors, &mip_data)?;
    let file_count = payload_files.len() as u8;
    ftex.payload_file_count = file_count;
    ftex.additional_payload_file_count = file_count.saturating_sub(1);

    for descriptor in descriptors {
        ftex.add_descriptor(descriptor);
    }
    for file in payload_files {
        ftex.add_payload_file(file)?;
    }
    ftex.update_descriptors();

    debug!(
        width,
        height,
        mip_count,
        payload_files = file_count,
        "built FTEX container"
    );
    Ok(ftex)
}

fn header_dimension(field: &'static str, value: u32) -> Result<i16> {
    i16::try_from(value).map_err(|_| Error::DimensionTooLarge { field, value })
}

/// Slice a DDS data section into per-mip buffers, largest first.
fn split_mips(
    data: &[u8],
    format: DdsFormat,
    width: u32,
    height: u32,
    mip_count: u32,
) -> Result<Vec<Vec<u8>>> {
    let mut mips = Vec::with_capacity(mip_count as usize);
    let (mut width, mut height) = (width, height);
    let mut position = 0usize;

    for mip in 0..mip_count {
        let end = image_size(format, width, height)
            .and_then(|size| position.checked_add(size))
            .ok_or(Error::DimensionTooLarge {
                field: "image size",
                value: width.max(height),
            })?;
        let slice = data.get(position..end).ok_or(Error::TruncatedImageData {
            mip,
            needed: end,
            available: data.len(),
        })?;
        mips.push(slice.to_vec());

        position = end;
        width = (width / 2).max(MIN_MIP_DIMENSION);
        height = (height / 2).max(MIN_MIP_DIMENSION);
    }

    Ok(mips)
}
