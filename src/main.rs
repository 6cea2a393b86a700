//! ftexconv CLI - Command-line tool for console FTEX texture conversion.
//!
//! This is the main entry point for the ftexconv command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{error, info};
use walkdir::WalkDir;

use ftexconv::prelude::*;

/// ftexconv - console FTEX texture converter
#[derive(Parser)]
#[command(name = "ftexconv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an FTEX texture and its payload files to DDS
    ToDds {
        /// Input FTEX file
        #[arg(short, long, env = "INPUT_FTEX")]
        input: PathBuf,

        /// Output DDS file (defaults to the input with a .dds extension)
        #[arg(short, long, env = "OUTPUT_DDS")]
        output: Option<PathBuf>,

        /// Untile console-swizzled texel data
        #[arg(short, long)]
        deswizzle: bool,
    },

    /// Convert a DDS file to an FTEX texture and payload files
    ToFtex {
        /// Input DDS file
        #[arg(short, long, env = "INPUT_DDS")]
        input: PathBuf,

        /// Output FTEX file (defaults to the input with a .ftex extension)
        #[arg(short, long, env = "OUTPUT_FTEX")]
        output: Option<PathBuf>,

        /// Texture type code stored in the header
        #[arg(short, long, default_value_t = 1)]
        texture_type: i32,

        /// Write big-endian (console) files
        #[arg(short, long)]
        big_endian: bool,
    },

    /// Show header, descriptors and payload files of an FTEX texture
    Info {
        /// Input FTEX file
        #[arg(short, long, env = "INPUT_FTEX")]
        input: PathBuf,
    },

    /// Convert every FTEX texture under a directory to DDS
    Batch {
        /// Input directory
        #[arg(short, long)]
        input: PathBuf,

        /// Untile console-swizzled texel data
        #[arg(short, long)]
        deswizzle: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::ToDds {
            input,
            output,
            deswizzle,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("dds"));
            cmd_to_dds(&input, &output, &ConvertOptions { deswizzle })?;
        }
        Commands::ToFtex {
            input,
            output,
            texture_type,
            big_endian,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("ftex"));
            let endian = if big_endian { Endian::Big } else { Endian::Little };
            cmd_to_ftex(&input, &output, texture_type, endian)?;
        }
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Batch { input, deswizzle } => {
            cmd_batch(&input, &ConvertOptions { deswizzle })?;
        }
    }

    Ok(())
}

fn cmd_to_dds(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    info!("Converting: {} -> {}", input.display(), output.display());

    let ftex = read_ftex(input).context("Failed to read FTEX texture")?;
    let dds = ftex_to_dds(&ftex, options).context("Failed to convert to DDS")?;
    write_dds(&dds, output).context("Failed to write DDS file")?;

    info!("Conversion complete");

    Ok(())
}

fn cmd_to_ftex(input: &Path, output: &Path, texture_type: i32, endian: Endian) -> Result<()> {
    info!("Converting: {} -> {}", input.display(), output.display());

    let dds = read_dds(input).context("Failed to read DDS file")?;
    let mut ftex = dds_to_ftex(&dds, texture_type).context("Failed to convert to FTEX")?;
    write_ftex(&mut ftex, output, endian).context("Failed to write FTEX texture")?;

    info!(
        "Wrote {} mips across {} payload files ({})",
        ftex.mip_count, ftex.payload_file_count, endian
    );

    Ok(())
}

fn cmd_info(input: &Path) -> Result<()> {
    let ftex = read_ftex(input).context("Failed to read FTEX texture")?;

    println!("File:           {}", input.display());
    println!("Byte order:     {}", ftex.endian);
    println!("Pixel format:   {}", ftex.pixel_format);
    println!("Dimensions:     {}x{}x{}", ftex.width, ftex.height, ftex.depth);
    println!("Mip levels:     {}", ftex.mip_count);
    println!("NRT flag:       {}", ftex.nrt_flag);
    println!("Unknown flags:  {}", ftex.unknown_flags);
    println!("Texture type:   {:#010x}", ftex.texture_type);
    println!(
        "Payload files:  {} ({} additional)",
        ftex.payload_file_count, ftex.additional_payload_file_count
    );

    println!(
        "\n{:>4} {:>5} {:>10} {:>12} {:>10} {:>7}",
        "mip", "file", "offset", "size", "stored", "chunks"
    );
    for d in ftex.descriptors() {
        println!(
            "{:>4} {:>5} {:>10} {:>12} {:>10} {:>7}",
            d.index,
            d.payload_file_number,
            d.offset,
            d.decompressed_size,
            d.compressed_size,
            d.chunk_count
        );
    }

    println!();
    for file in ftex.payload_files() {
        println!(
            "{}: {} mips, {} bytes",
            ftexconv::payload_path(input, file.file_number()).display(),
            file.mips().len(),
            file.data().len()
        );
    }

    Ok(())
}

fn cmd_batch(input: &Path, options: &ConvertOptions) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("ftex"))
        .collect();

    info!("Converting {} textures under {}...", files.len(), input.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let errors = files
        .par_iter()
        .map(|path| {
            let result = convert_one(path, options);
            pb.inc(1);
            result
        })
        .filter_map(|result| result.err())
        .collect::<Vec<_>>();

    pb.finish_with_message("Done");
    for e in &errors {
        error!("{:#}", e);
    }
    info!(
        "Converted {} textures in {:?} ({} errors)",
        files.len() - errors.len(),
        start.elapsed(),
        errors.len()
    );

    Ok(())
}

fn convert_one(path: &Path, options: &ConvertOptions) -> Result<()> {
    let ftex = read_ftex(path).with_context(|| format!("{}", path.display()))?;
    let dds = ftex_to_dds(&ftex, options).with_context(|| format!("{}", path.display()))?;
    write_dds(&dds, path.with_extension("dds"))?;
    Ok(())
}
