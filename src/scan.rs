//! Whole-region scan.
//!
//! Every slot is visited and gets its own outcome; a damaged chunk never
//! hides the others. Only a truncated header stops the scan.

use serde::{Serialize, Serializer};

use crate::chunk::CompressionTag;
use crate::error::{ExtractError, HeaderError};
use crate::reader::Region;
use crate::region::{SLOT_COUNT, index_to_local};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SlotOutcome {
    Absent,
    Present {
        tag: CompressionTag,
        byte_offset: u64,
        sector_count: u8,
        payload_len: usize,
    },
    Failed {
        #[serde(serialize_with = "as_display")]
        error: ExtractError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotReport {
    pub slot: usize,
    pub local_x: i32,
    pub local_z: i32,
    pub timestamp: u32,
    #[serde(flatten)]
    pub outcome: SlotOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub file_len: usize,
    pub present: usize,
    pub absent: usize,
    pub failed: usize,
    pub slots: Vec<SlotReport>,
}

impl ScanReport {
    pub fn failures(&self) -> impl Iterator<Item = (&SlotReport, &ExtractError)> {
        self.slots.iter().filter_map(|report| match &report.outcome {
            SlotOutcome::Failed { error } => Some((report, error)),
            _ => None,
        })
    }
}

fn as_display<S: Serializer>(error: &ExtractError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Visit all 1024 slots of a region buffer.
pub fn scan(buffer: &[u8]) -> Result<ScanReport, HeaderError> {
    let region = Region::new(buffer)?;
    let mut report = ScanReport {
        file_len: buffer.len(),
        slots: Vec::with_capacity(SLOT_COUNT),
        ..Default::default()
    };

    for slot in 0..SLOT_COUNT {
        let (local_x, local_z) = index_to_local(slot);
        let record = region.location(slot);

        let outcome = match region.slot(slot) {
            Ok(None) => {
                report.absent += 1;
                SlotOutcome::Absent
            }
            Ok(Some((tag, data))) => {
                report.present += 1;
                SlotOutcome::Present {
                    tag,
                    byte_offset: record.byte_offset,
                    sector_count: record.sector_count,
                    payload_len: data.len(),
                }
            }
            Err(error) => {
                log::warn!("Slot {} ({}, {}): {}", slot, local_x, local_z, error);
                report.failed += 1;
                SlotOutcome::Failed { error }
            }
        };

        report.slots.push(SlotReport {
            slot,
            local_x,
            local_z,
            timestamp: region.timestamp(slot),
            outcome,
        });
    }

    log::info!(
        "Scanned {} bytes: {} present, {} absent, {} failed",
        report.file_len,
        report.present,
        report.absent,
        report.failed
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{HEADER_SIZE, SECTOR_SIZE};

    fn set_entry(buf: &mut [u8], slot: usize, entry: [u8; 4]) {
        buf[slot * 4..slot * 4 + 4].copy_from_slice(&entry);
    }

    #[test]
    fn test_empty_region() {
        let buf = vec![0u8; HEADER_SIZE];
        let report = scan(&buf).unwrap();
        assert_eq!(report.slots.len(), 1024);
        assert_eq!(report.absent, 1024);
        assert_eq!(report.present, 0);
        assert_eq!(report.failed, 0);
        assert!(report.slots.iter().all(|s| s.outcome == SlotOutcome::Absent));
    }

    #[test]
    fn test_truncated_header_aborts() {
        let buf = vec![0u8; 4096];
        assert_eq!(
            scan(&buf).unwrap_err(),
            HeaderError::TruncatedHeader { len: 4096 }
        );
    }

    #[test]
    fn test_failures_do_not_hide_other_slots() {
        let mut buf = vec![0u8; HEADER_SIZE + 2 * SECTOR_SIZE];
        // slot 0: good chunk in sector 2
        set_entry(&mut buf, 0, [0, 0, 2, 1]);
        buf[HEADER_SIZE..HEADER_SIZE + 9].copy_from_slice(&[0, 0, 0, 5, 2, 1, 2, 3, 4]);
        // slot 1: inconsistent
        set_entry(&mut buf, 1, [0, 0, 0, 5]);
        // slot 2: points into the header
        set_entry(&mut buf, 2, [0, 0, 1, 1]);
        // slot 3: unknown compression in sector 3
        set_entry(&mut buf, 3, [0, 0, 3, 1]);
        let s3 = HEADER_SIZE + SECTOR_SIZE;
        buf[s3..s3 + 6].copy_from_slice(&[0, 0, 0, 2, 0x82, 0]);
        // slot 1023: past the end of the file
        set_entry(&mut buf, 1023, [0, 0, 9, 1]);

        let report = scan(&buf).unwrap();
        assert_eq!(report.present, 1);
        assert_eq!(report.failed, 4);
        assert_eq!(report.absent, 1019);

        assert_eq!(
            report.slots[0].outcome,
            SlotOutcome::Present {
                tag: CompressionTag::Zlib,
                byte_offset: 8192,
                sector_count: 1,
                payload_len: 4,
            }
        );
        let failed: Vec<usize> = report.failures().map(|(s, _)| s.slot).collect();
        assert_eq!(failed, vec![1, 2, 3, 1023]);
        assert_eq!(
            report.slots[3].outcome,
            SlotOutcome::Failed {
                error: ExtractError::UnsupportedCompressionTag(0x82)
            }
        );
        assert_eq!((report.slots[1023].local_x, report.slots[1023].local_z), (31, 31));
    }

    #[test]
    fn test_report_json() {
        let mut buf = vec![0u8; HEADER_SIZE];
        set_entry(&mut buf, 0, [0, 0, 0, 5]);
        let report = scan(&buf).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"], 1);
        assert_eq!(json["slots"][0]["status"], "failed");
        assert!(json["slots"][0]["error"]
            .as_str()
            .unwrap()
            .starts_with("inconsistent location record"));
        assert_eq!(json["slots"][1]["status"], "absent");
    }
}
