//! mca-reader: read-only access to Minecraft Anvil region files (.mca).
//!
//! The crate maps chunk coordinates to header slots, decodes the sector
//! table and isolates each chunk's compressed bytes with full bounds
//! validation. Decompression and NBT inspection sit on top, in
//! [`chunk::decompress`] and [`chunk::nbt`].

pub mod chunk;
pub mod error;
pub mod reader;
pub mod region;
pub mod scan;

pub use chunk::{CompressedSlice, CompressionTag, extract};
pub use error::{ExtractError, HeaderError};
pub use reader::Region;
pub use region::{LocationRecord, RegionPos, SectorTable, location_record, slot_index, timestamp_record};
pub use scan::{ScanReport, SlotOutcome, scan};
