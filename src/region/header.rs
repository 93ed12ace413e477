//! Region file header decoding.
//!
//! The header consists of two tables:
//! - Location table: where each chunk is stored
//! - Timestamp table: when each chunk was last saved

use super::bytes::{be_u24, be_u32};
use super::{HEADER_SIZE, SECTOR_SIZE, SLOT_COUNT, sector_to_offset};
use crate::error::HeaderError;

/// One location table entry.
///
/// Stored as `[offset:3][count:1]`; `byte_offset` is already scaled by the
/// sector size. `(0, 0)` is the only encoding of an absent chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationRecord {
    pub byte_offset: u64,
    pub sector_count: u8,
}

impl LocationRecord {
    pub fn new(byte_offset: u64, sector_count: u8) -> Self {
        Self {
            byte_offset,
            sector_count,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.byte_offset == 0 && self.sector_count == 0
    }

    /// Bytes reserved for the chunk, padding included.
    pub fn reserved_bytes(&self) -> u64 {
        self.sector_count as u64 * SECTOR_SIZE as u64
    }

    /// First byte past the reserved sectors.
    pub fn end(&self) -> u64 {
        self.byte_offset + self.reserved_bytes()
    }
}

fn check_header(buffer: &[u8]) -> Result<(), HeaderError> {
    if buffer.len() < HEADER_SIZE {
        return Err(HeaderError::TruncatedHeader { len: buffer.len() });
    }
    Ok(())
}

/// Read the location record for `slot` (0-1023).
pub fn location_record(buffer: &[u8], slot: usize) -> Result<LocationRecord, HeaderError> {
    check_header(buffer)?;
    Ok(read_location(buffer, slot))
}

/// Read the last-saved timestamp (seconds since epoch) for `slot` (0-1023).
pub fn timestamp_record(buffer: &[u8], slot: usize) -> Result<u32, HeaderError> {
    check_header(buffer)?;
    Ok(read_timestamp(buffer, slot))
}

fn read_location(buffer: &[u8], slot: usize) -> LocationRecord {
    assert!(slot < SLOT_COUNT, "slot {slot} out of range");
    let entry = slot * 4;
    LocationRecord {
        byte_offset: sector_to_offset(be_u24(buffer, entry)),
        sector_count: buffer[entry + 3],
    }
}

fn read_timestamp(buffer: &[u8], slot: usize) -> u32 {
    assert!(slot < SLOT_COUNT, "slot {slot} out of range");
    be_u32(buffer, SECTOR_SIZE + slot * 4)
}

/// Header view over a region buffer whose length was checked once.
#[derive(Debug, Clone, Copy)]
pub struct SectorTable<'a> {
    buffer: &'a [u8],
}

impl<'a> SectorTable<'a> {
    pub fn new(buffer: &'a [u8]) -> Result<Self, HeaderError> {
        check_header(buffer)?;
        Ok(Self { buffer })
    }

    pub fn location(&self, slot: usize) -> LocationRecord {
        read_location(self.buffer, slot)
    }

    pub fn timestamp(&self, slot: usize) -> u32 {
        read_timestamp(self.buffer, slot)
    }

    /// All 1024 location records, in slot order.
    pub fn records(&self) -> impl Iterator<Item = (usize, LocationRecord)> + '_ {
        (0..SLOT_COUNT).map(|slot| (slot, self.location(slot)))
    }

    /// Number of slots with anything other than the empty encoding.
    pub fn occupied(&self) -> usize {
        self.records().filter(|(_, r)| !r.is_absent()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_with(slot: usize, entry: [u8; 4], timestamp: u32) -> Vec<u8> {
        let mut header = vec![0u8; HEADER_SIZE];
        header[slot * 4..slot * 4 + 4].copy_from_slice(&entry);
        let ts = SECTOR_SIZE + slot * 4;
        header[ts..ts + 4].copy_from_slice(&timestamp.to_be_bytes());
        header
    }

    #[test]
    fn test_truncated_header() {
        let short = vec![0u8; HEADER_SIZE - 1];
        assert_eq!(
            location_record(&short, 0),
            Err(HeaderError::TruncatedHeader { len: HEADER_SIZE - 1 })
        );
        assert!(timestamp_record(&short, 0).is_err());
        assert!(SectorTable::new(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_first_chunk_location() {
        let header = header_with(0, [0, 0, 2, 1], 0);
        let record = location_record(&header, 0).unwrap();
        assert_eq!(record, LocationRecord::new(8192, 1));
        assert_eq!(record.end(), 12288);
        assert!(!record.is_absent());
    }

    #[test]
    fn test_three_byte_offset() {
        let header = header_with(1023, [0x01, 0x02, 0x03, 0xFF], 0);
        let record = location_record(&header, 1023).unwrap();
        assert_eq!(record.byte_offset, 0x010203 * 4096);
        assert_eq!(record.sector_count, 255);
        assert_eq!(record.reserved_bytes(), 255 * 4096);
    }

    #[test]
    fn test_empty_record() {
        let header = vec![0u8; HEADER_SIZE];
        assert!(location_record(&header, 42).unwrap().is_absent());
    }

    #[test]
    fn test_timestamp() {
        let header = header_with(33, [0, 0, 2, 1], 1_700_000_000);
        assert_eq!(timestamp_record(&header, 33).unwrap(), 1_700_000_000);
        assert_eq!(timestamp_record(&header, 32).unwrap(), 0);
    }

    #[test]
    fn test_table_view() {
        let header = header_with(7, [0, 0, 3, 2], 99);
        let table = SectorTable::new(&header).unwrap();
        assert_eq!(table.location(7), LocationRecord::new(3 * 4096, 2));
        assert_eq!(table.timestamp(7), 99);
        assert_eq!(table.records().count(), SLOT_COUNT);
        assert_eq!(table.occupied(), 1);
    }
}
