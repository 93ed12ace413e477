//! Big-endian integer readers.
//!
//! Every multi-byte field in a region file is big-endian regardless of the
//! host. Values are assembled byte by byte, most significant first.
//! Callers are responsible for bounds: each reader indexes `buf[at..at + N]`.

#[inline]
pub fn be_u16(buf: &[u8], at: usize) -> u16 {
    (buf[at] as u16) << 8 | buf[at + 1] as u16
}

#[inline]
pub fn be_u24(buf: &[u8], at: usize) -> u32 {
    (buf[at] as u32) << 16 | (buf[at + 1] as u32) << 8 | buf[at + 2] as u32
}

#[inline]
pub fn be_u32(buf: &[u8], at: usize) -> u32 {
    (buf[at] as u32) << 24
        | (buf[at + 1] as u32) << 16
        | (buf[at + 2] as u32) << 8
        | buf[at + 3] as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_be_u16() {
        assert_eq!(be_u16(&[0x12, 0x34], 0), 0x1234);
        assert_eq!(be_u16(&[0xFF, 0x00, 0x01], 1), 0x0001);
    }

    #[test]
    fn test_be_u24() {
        assert_eq!(be_u24(&[0x00, 0x00, 0x02], 0), 2);
        assert_eq!(be_u24(&[0xAB, 0xCD, 0xEF], 0), 0xABCDEF);
        assert_eq!(be_u24(&[0x99, 0x01, 0x00, 0x00], 1), 0x010000);
    }

    #[test]
    fn test_be_u32() {
        assert_eq!(be_u32(&[0x00, 0x00, 0x00, 0x05], 0), 5);
        assert_eq!(be_u32(&[0xDE, 0xAD, 0xBE, 0xEF], 0), 0xDEADBEEF);
    }

    #[test]
    fn test_matches_std_big_endian() {
        let bytes = 0x0102_0304u32.to_be_bytes();
        assert_eq!(be_u32(&bytes, 0), u32::from_be_bytes(bytes));
    }
}
