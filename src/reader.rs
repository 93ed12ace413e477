//! Read access to one region file held in memory.

use crate::chunk::{self, CompressedSlice, CompressionTag};
use crate::error::{ExtractError, HeaderError};
use crate::region::{LocationRecord, SectorTable, slot_index};

/// Result of looking up one slot.
pub type ChunkLookup<'a> = Result<Option<(CompressionTag, CompressedSlice<'a>)>, ExtractError>;

/// A region file buffer with a validated header.
///
/// The buffer is borrowed, never copied. Lookups do not mutate anything, so
/// a `Region` can be shared between threads freely.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    buffer: &'a [u8],
    table: SectorTable<'a>,
}

impl<'a> Region<'a> {
    pub fn new(buffer: &'a [u8]) -> Result<Self, HeaderError> {
        Ok(Self {
            buffer,
            table: SectorTable::new(buffer)?,
        })
    }

    pub fn table(&self) -> &SectorTable<'a> {
        &self.table
    }

    pub fn file_len(&self) -> usize {
        self.buffer.len()
    }

    /// Slots whose location record is not the empty encoding.
    pub fn occupied(&self) -> usize {
        self.table.occupied()
    }

    pub fn location(&self, slot: usize) -> LocationRecord {
        self.table.location(slot)
    }

    pub fn timestamp(&self, slot: usize) -> u32 {
        self.table.timestamp(slot)
    }

    /// Look up a slot (0-1023).
    pub fn slot(&self, slot: usize) -> ChunkLookup<'a> {
        chunk::extract(self.buffer, self.table.location(slot))
    }

    /// Look up a chunk by world chunk coordinates. Chunks belonging to other
    /// regions resolve to the slot with the same local position.
    pub fn chunk(&self, chunk_x: i32, chunk_z: i32) -> ChunkLookup<'a> {
        self.slot(slot_index(chunk_x, chunk_z))
    }
}
