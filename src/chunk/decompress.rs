//! Decompression of extracted chunk payloads.

use std::io::Read;

use super::{CompressedSlice, CompressionTag};

/// Decompress a chunk payload according to its tag.
/// Supports GZip (1), ZLib (2) and None (3).
pub fn decompress(tag: CompressionTag, data: CompressedSlice<'_>) -> anyhow::Result<Vec<u8>> {
    let compressed = data.as_bytes();
    let mut decompressed = Vec::new();

    match tag {
        CompressionTag::Zlib => {
            let mut decoder = flate2::read::ZlibDecoder::new(compressed);
            decoder.read_to_end(&mut decompressed)?;
        }
        CompressionTag::Gzip => {
            let mut decoder = flate2::read::GzDecoder::new(compressed);
            decoder.read_to_end(&mut decompressed)?;
        }
        CompressionTag::Uncompressed => decompressed.extend_from_slice(compressed),
    }

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use std::io::Write;

    const NBT_LIKE: &[u8] = b"\x0a\x00\x00\x03\x00\x04xPos\x00\x00\x00\x07\x00";

    #[test]
    fn test_zlib() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(NBT_LIKE).unwrap();
        let compressed = encoder.finish().unwrap();

        let out = decompress(CompressionTag::Zlib, CompressedSlice(&compressed)).unwrap();
        assert_eq!(out, NBT_LIKE);
    }

    #[test]
    fn test_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(NBT_LIKE).unwrap();
        let compressed = encoder.finish().unwrap();

        let out = decompress(CompressionTag::Gzip, CompressedSlice(&compressed)).unwrap();
        assert_eq!(out, NBT_LIKE);
    }

    #[test]
    fn test_uncompressed() {
        let out = decompress(CompressionTag::Uncompressed, CompressedSlice(NBT_LIKE)).unwrap();
        assert_eq!(out, NBT_LIKE);
    }

    #[test]
    fn test_corrupt_zlib() {
        let garbage = [0xDE, 0xAD, 0xBE, 0xEF];
        assert!(decompress(CompressionTag::Zlib, CompressedSlice(&garbage)).is_err());
    }
}
