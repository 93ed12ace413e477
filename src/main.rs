use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use mca_reader::chunk::{decompress, nbt};
use mca_reader::region::{chunk_to_local, index_to_local};
use mca_reader::scan::SlotOutcome;
use mca_reader::{CompressionTag, ExtractError, Region, RegionPos, slot_index};

#[derive(Parser)]
#[command(name = "mca-reader", about = "Inspect Minecraft Anvil region files (.mca)")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Report every slot of a region file
    Scan {
        /// Region file, e.g. r.0.0.mca
        #[arg(env = "MCA_FILE")]
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Also list absent slots
        #[arg(long)]
        all: bool,
    },
    /// Locate a single chunk
    Chunk {
        #[arg(env = "MCA_FILE")]
        file: PathBuf,

        /// Chunk X (world or local coordinate)
        #[arg(allow_negative_numbers = true)]
        x: i32,

        /// Chunk Z (world or local coordinate)
        #[arg(allow_negative_numbers = true)]
        z: i32,

        /// Decompress the payload and summarise its NBT
        #[arg(long)]
        decompress: bool,

        /// Check the NBT coordinates against the slot (implies --decompress)
        #[arg(long)]
        verify: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Scan { file, json, all } => run_scan(&file, json, all),
        Command::Chunk {
            file,
            x,
            z,
            decompress,
            verify,
        } => run_chunk(&file, x, z, decompress || verify, verify),
    }
}

fn load(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    log::debug!("Loaded {} ({} bytes)", path.display(), data.len());
    Ok(data)
}

fn region_pos(path: &Path) -> Option<RegionPos> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(RegionPos::from_filename)
}

fn run_scan(path: &Path, json: bool, all: bool) -> anyhow::Result<()> {
    let data = load(path)?;
    let report = mca_reader::scan(&data)
        .with_context(|| format!("Cannot read region {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let pos = region_pos(path);
    for slot in &report.slots {
        let (x, z) = match pos {
            Some(pos) => pos.local_to_world(slot.local_x, slot.local_z),
            None => (slot.local_x, slot.local_z),
        };
        match &slot.outcome {
            SlotOutcome::Absent if all => println!("[{:4}] ({}, {}) empty", slot.slot, x, z),
            SlotOutcome::Absent => {}
            SlotOutcome::Present {
                tag,
                byte_offset,
                sector_count,
                payload_len,
            } => println!(
                "[{:4}] ({}, {}) offset {} sectors {} {} bytes {} saved {}",
                slot.slot, x, z, byte_offset, sector_count, payload_len, tag, slot.timestamp
            ),
            SlotOutcome::Failed { error } => {
                println!("[{:4}] ({}, {}) ERROR {}", slot.slot, x, z, error)
            }
        }
    }

    println!(
        "{} present, {} absent, {} failed",
        report.present, report.absent, report.failed
    );
    Ok(())
}

fn run_chunk(path: &Path, x: i32, z: i32, inflate: bool, verify: bool) -> anyhow::Result<()> {
    let data = load(path)?;
    let region = Region::new(&data)
        .with_context(|| format!("Cannot read region {}", path.display()))?;

    let slot = slot_index(x, z);
    let record = region.location(slot);
    println!(
        "Slot {} {:?}: offset {} sectors {} saved {}",
        slot,
        index_to_local(slot),
        record.byte_offset,
        record.sector_count,
        region.timestamp(slot)
    );

    let (tag, payload) = match region.slot(slot) {
        Ok(Some(found)) => found,
        Ok(None) => {
            println!("Chunk is empty");
            return Ok(());
        }
        Err(ExtractError::UnsupportedCompressionTag(tag))
            if tag & CompressionTag::EXTERNAL_FLAG != 0 =>
        {
            anyhow::bail!("Chunk is stored in an external .mcc file (tag {})", tag);
        }
        Err(e) => return Err(e).context(format!("Slot {} is damaged", slot)),
    };
    println!("Compression {}, {} bytes", tag, payload.len());

    if !inflate {
        return Ok(());
    }

    let nbt_bytes = decompress::decompress(tag, payload)?;
    println!("Decompressed to {} bytes", nbt_bytes.len());
    println!("Root tag {:?}", nbt::root_name(&nbt_bytes)?);
    let summary = nbt::summary(&nbt_bytes)?;
    println!(
        "DataVersion {:?} Status {:?} LastUpdate {:?} InhabitedTime {:?}",
        summary.data_version, summary.status, summary.last_update, summary.inhabited_time
    );

    if verify {
        // Expected world coordinates come from the file name when it has one.
        let (expected_x, expected_z) = match region_pos(path) {
            Some(pos) => {
                if RegionPos::containing(x, z) != pos {
                    log::warn!(
                        "Chunk ({}, {}) belongs to {}, reading same slot of {}",
                        x,
                        z,
                        RegionPos::containing(x, z).filename(),
                        pos.filename()
                    );
                }
                pos.local_to_world(chunk_to_local(x), chunk_to_local(z))
            }
            None => (x, z),
        };
        nbt::verify_position(&nbt_bytes, expected_x, expected_z)?;
        println!("Coordinates match ({}, {})", expected_x, expected_z);
    }

    Ok(())
}
