//! CRC-8 as used by the sensor's binary frames.
//!
//! Polynomial `0x07`, initial value `0x00`, no reflection, no final xor
//! (catalogued as CRC-8/SMBUS).

use crc::{Crc, CRC_8_SMBUS};

pub const CRC_8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

pub fn crc8(data: &[u8]) -> u8 {
    CRC_8.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc8(b"123456789"), 0xF4);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(crc8(&[]), 0x00);
    }

    #[test]
    fn test_known_frames() {
        assert_eq!(crc8(&[0x54, 0x09, 0xC4]), 96);
        assert_eq!(crc8(&[0x54, 0x00, 0x00]), 143);
        assert_eq!(crc8(&[0x54, 0xFF, 0xFF]), 171);
    }

    #[test]
    fn test_incremental_digest_matches() {
        let mut digest = CRC_8.digest();
        digest.update(&[0x54]);
        digest.update(&[0x09, 0xC4]);
        assert_eq!(digest.finalize(), crc8(&[0x54, 0x09, 0xC4]));
    }
}
