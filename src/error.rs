/// Whole-file failures. Processing of the region stops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("truncated header ({len} bytes, minimum 8192)")]
    TruncatedHeader { len: usize },
}

/// Per-slot failures. The remaining slots of the region are still readable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("inconsistent location record (offset {byte_offset}, {sector_count} sectors)")]
    InconsistentLocationRecord { byte_offset: u64, sector_count: u8 },

    #[error("sectors {byte_offset}..{end} outside data area of {file_len}-byte file")]
    SectorOutOfBounds { byte_offset: u64, end: u64, file_len: usize },

    #[error("truncated chunk header at offset {byte_offset}")]
    TruncatedChunkHeader { byte_offset: u64 },

    #[error("declared length {byte_length} exceeds {reserved} reserved bytes")]
    DeclaredLengthExceedsReservation { byte_length: u32, reserved: u64 },

    #[error("unsupported compression tag {0}")]
    UnsupportedCompressionTag(u8),
}

impl ExtractError {
    /// True when the region structure itself is damaged at this slot.
    /// An unsupported tag leaves a well-formed slice that only decompression rejects.
    pub fn is_corruption(&self) -> bool {
        !matches!(self, ExtractError::UnsupportedCompressionTag(_))
    }
}
