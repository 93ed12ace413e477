//! Minecraft Anvil region file format (.mca).
//!
//! Region files contain 32x32 chunks in a specific binary format:
//! - Bytes 0-4095: Location table (1024 entries × 4 bytes)
//! - Bytes 4096-8191: Timestamp table (1024 entries × 4 bytes)
//! - Bytes 8192+: Chunk data (variable size sectors)

pub mod bytes;
mod header;

pub use header::{LocationRecord, SectorTable, location_record, timestamp_record};

/// Size of one sector in bytes (4 KB).
pub const SECTOR_SIZE: usize = 4096;

/// Total header size (location table + timestamp table).
pub const HEADER_SIZE: usize = SECTOR_SIZE * 2; // 8192 bytes

/// Number of chunks per region dimension.
pub const REGION_SIZE: i32 = 32;

/// Number of header slots, one per chunk in a region.
pub const SLOT_COUNT: usize = (REGION_SIZE * REGION_SIZE) as usize;

/// Floor division. `b` must be positive.
///
/// Native `/` truncates toward zero, which would put chunk -1 in region 0.
#[inline]
pub fn floor_div(a: i32, b: i32) -> i32 {
    a.div_euclid(b)
}

/// Modulus that never returns a negative remainder. `b` must be positive.
#[inline]
pub fn floor_mod(a: i32, b: i32) -> i32 {
    a.rem_euclid(b)
}

/// Convert chunk coordinates to local region coordinates (0-31).
#[inline]
pub fn chunk_to_local(chunk_coord: i32) -> i32 {
    floor_mod(chunk_coord, REGION_SIZE)
}

/// Convert chunk coordinates to region coordinates.
#[inline]
pub fn chunk_to_region(chunk_coord: i32) -> i32 {
    floor_div(chunk_coord, REGION_SIZE)
}

/// Header slot (0-1023) for a chunk. Any world coordinates are accepted;
/// only the position inside the region matters.
#[inline]
pub fn slot_index(chunk_x: i32, chunk_z: i32) -> usize {
    local_to_index(chunk_to_local(chunk_x), chunk_to_local(chunk_z))
}

/// Calculate linear index for a chunk within a region (0-1023).
#[inline]
pub fn local_to_index(local_x: i32, local_z: i32) -> usize {
    (local_z * REGION_SIZE + local_x) as usize
}

/// Calculate local coordinates from linear index.
#[inline]
pub fn index_to_local(index: usize) -> (i32, i32) {
    let local_x = (index % REGION_SIZE as usize) as i32;
    let local_z = (index / REGION_SIZE as usize) as i32;
    (local_x, local_z)
}

/// Calculate file offset for a chunk given its sector number.
#[inline]
pub fn sector_to_offset(sector: u32) -> u64 {
    sector as u64 * SECTOR_SIZE as u64
}

/// Region file coordinates (parsed from filename like "r.0.-1.mca").
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct RegionPos {
    pub x: i32,
    pub z: i32,
}

impl RegionPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The region holding the given chunk.
    pub fn containing(chunk_x: i32, chunk_z: i32) -> Self {
        Self {
            x: chunk_to_region(chunk_x),
            z: chunk_to_region(chunk_z),
        }
    }

    /// Parse region position from filename (e.g., "r.0.-1.mca").
    pub fn from_filename(name: &str) -> Option<Self> {
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() == 4 && parts[0] == "r" && parts[3] == "mca" {
            let x = parts[1].parse().ok()?;
            let z = parts[2].parse().ok()?;
            Some(Self { x, z })
        } else {
            None
        }
    }

    /// Conventional file name for this region.
    pub fn filename(&self) -> String {
        format!("r.{}.{}.mca", self.x, self.z)
    }

    /// Convert local chunk coordinates to world chunk coordinates.
    pub fn local_to_world(&self, local_x: i32, local_z: i32) -> (i32, i32) {
        (
            self.x * REGION_SIZE + local_x,
            self.z * REGION_SIZE + local_z,
        )
    }
}
