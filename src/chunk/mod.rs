//! Chunk payload extraction.
//!
//! Each present chunk starts on a sector boundary with a 5-byte header:
//! `[Length: 4][Type: 1][Data...]`. Length counts the type byte and the
//! data, not itself. Whatever follows the data up to the end of the last
//! reserved sector is padding.

pub mod decompress;
pub mod nbt;

use std::fmt;
use std::ops::Deref;

use crate::error::ExtractError;
use crate::region::{HEADER_SIZE, LocationRecord, bytes::be_u32};

/// Length field plus compression tag.
pub const CHUNK_HEADER_SIZE: usize = 5;

/// Compression types used in the Anvil format (same IDs as vanilla Minecraft).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[repr(u8)]
pub enum CompressionTag {
    Gzip = 1,
    Zlib = 2,
    Uncompressed = 3,
}

impl CompressionTag {
    /// Tags with this bit set point at an external `.mcc` file.
    pub const EXTERNAL_FLAG: u8 = 0x80;

    pub fn from_byte(tag: u8) -> Result<Self, ExtractError> {
        match tag {
            1 => Ok(Self::Gzip),
            2 => Ok(Self::Zlib),
            3 => Ok(Self::Uncompressed),
            other => Err(ExtractError::UnsupportedCompressionTag(other)),
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CompressionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gzip => "gzip",
            Self::Zlib => "zlib",
            Self::Uncompressed => "uncompressed",
        };
        f.write_str(name)
    }
}

/// Chunk data exactly as stored, borrowed from the region buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedSlice<'a>(&'a [u8]);

impl<'a> CompressedSlice<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }
}

impl Deref for CompressedSlice<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.0
    }
}

/// Resolve a location record to the compressed bytes of its chunk.
///
/// `Ok(None)` means the slot is empty. Every offset is checked against the
/// buffer before a slice is taken.
pub fn extract<'a>(
    buffer: &'a [u8],
    record: LocationRecord,
) -> Result<Option<(CompressionTag, CompressedSlice<'a>)>, ExtractError> {
    if record.is_absent() {
        return Ok(None);
    }
    if record.byte_offset == 0 || record.sector_count == 0 {
        return Err(ExtractError::InconsistentLocationRecord {
            byte_offset: record.byte_offset,
            sector_count: record.sector_count,
        });
    }

    // Chunk data may never overlap the header.
    let end = record.end();
    if record.byte_offset < HEADER_SIZE as u64 || end > buffer.len() as u64 {
        return Err(ExtractError::SectorOutOfBounds {
            byte_offset: record.byte_offset,
            end,
            file_len: buffer.len(),
        });
    }
    // Both bounds are now <= buffer.len().
    let start = record.byte_offset as usize;

    if end - record.byte_offset < CHUNK_HEADER_SIZE as u64 {
        return Err(ExtractError::TruncatedChunkHeader {
            byte_offset: record.byte_offset,
        });
    }
    let byte_length = be_u32(buffer, start);
    if byte_length == 0 {
        // Not even room for the tag byte.
        return Err(ExtractError::TruncatedChunkHeader {
            byte_offset: record.byte_offset,
        });
    }
    let tag = buffer[start + 4];

    let reserved = record.reserved_bytes();
    if 4 + byte_length as u64 > reserved {
        return Err(ExtractError::DeclaredLengthExceedsReservation {
            byte_length,
            reserved,
        });
    }

    let tag = CompressionTag::from_byte(tag)?;
    let data_start = start + CHUNK_HEADER_SIZE;
    let data_end = start + 4 + byte_length as usize;
    log::debug!(
        "chunk at {} ({} sectors): {} bytes, {}",
        start,
        record.sector_count,
        data_end - data_start,
        tag
    );

    Ok(Some((tag, CompressedSlice(&buffer[data_start..data_end]))))
}
