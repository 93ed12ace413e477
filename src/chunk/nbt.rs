//! Light inspection of decompressed chunk NBT.
//!
//! Only enough is read to identify a chunk: the root tag, its coordinates
//! and a few status fields. Full chunk parsing is left to callers.

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::region::bytes::be_u16;

/// NBT tag id of a compound.
const TAG_COMPOUND: u8 = 10;

/// Fields shared by modern and legacy chunk roots, all optional.
#[derive(Debug, Default, Deserialize)]
pub struct ChunkSummary {
    #[serde(rename = "DataVersion")]
    pub data_version: Option<i32>,

    #[serde(rename = "Status")]
    pub status: Option<String>,

    #[serde(rename = "LastUpdate")]
    pub last_update: Option<i64>,

    #[serde(rename = "InhabitedTime")]
    pub inhabited_time: Option<i64>,
}

/// Name of the root compound. Usually empty.
pub fn root_name(nbt: &[u8]) -> anyhow::Result<String> {
    if nbt.len() < 3 {
        bail!("NBT too short ({} bytes)", nbt.len());
    }
    if nbt[0] != TAG_COMPOUND {
        bail!("NBT root is tag type {}, expected compound", nbt[0]);
    }
    let len = be_u16(nbt, 1) as usize;
    let name = nbt
        .get(3..3 + len)
        .context("NBT root name runs past end of data")?;
    Ok(String::from_utf8(name.to_vec())?)
}

pub fn summary(nbt: &[u8]) -> anyhow::Result<ChunkSummary> {
    Ok(fastnbt::from_bytes(nbt)?)
}

/// Chunk coordinates stored in the NBT.
/// Modern chunks carry `xPos`/`zPos` at the root, older ones under `Level`.
pub fn chunk_position(nbt: &[u8]) -> anyhow::Result<(i32, i32)> {
    let value: fastnbt::Value = fastnbt::from_bytes(nbt)?;

    let fastnbt::Value::Compound(root) = value else {
        bail!("NBT Root is not a Compound");
    };

    if let Some(pos) = read_pos(&root, "")? {
        return Ok(pos);
    }
    if let Some(fastnbt::Value::Compound(level)) = root.get("Level") {
        if let Some(pos) = read_pos(level, "Level.")? {
            return Ok(pos);
        }
    }

    bail!(
        "Could not find xPos/zPos in NBT root or Level compound. Keys: {:?}",
        root.keys()
    );
}

fn read_pos(
    compound: &std::collections::HashMap<String, fastnbt::Value>,
    prefix: &str,
) -> anyhow::Result<Option<(i32, i32)>> {
    let (Some(x_tag), Some(z_tag)) = (compound.get("xPos"), compound.get("zPos")) else {
        return Ok(None);
    };
    let x = x_tag
        .as_i64()
        .with_context(|| format!("{prefix}xPos is not an int"))? as i32;
    let z = z_tag
        .as_i64()
        .with_context(|| format!("{prefix}zPos is not an int"))? as i32;
    Ok(Some((x, z)))
}

/// Check that the NBT describes the chunk stored at `(expected_x, expected_z)`.
pub fn verify_position(nbt: &[u8], expected_x: i32, expected_z: i32) -> anyhow::Result<()> {
    let (x, z) = chunk_position(nbt)?;
    if x != expected_x || z != expected_z {
        bail!(
            "NBT Coords mismatch! Expected ({}, {}), Found ({}, {})",
            expected_x,
            expected_z,
            x,
            z
        );
    }
    Ok(())
}
