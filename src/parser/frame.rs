use std::fmt;

use super::crc::crc8;
use crate::constants::common::{FRAME_HEADER, FRAME_LENGTH};

/// Unsigned distance field carried in bytes 1-2 of a frame, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawDistance(pub u16);

impl RawDistance {
    pub fn from_bytes(high_byte: u8, low_byte: u8) -> Self {
        Self(u16::from_be_bytes([high_byte, low_byte]))
    }

    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for RawDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// frame structure : header(1) + distance(2, big-endian) + crc8(1)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    pub header: u8,
    pub high_byte: u8,
    pub low_byte: u8,
    pub checksum: u8,
}

impl RawFrame {
    /// Builds a well-formed frame for `raw`, checksum included.
    pub fn encode(raw: RawDistance) -> Self {
        let [high_byte, low_byte] = raw.to_bytes();
        Self {
            header: FRAME_HEADER,
            high_byte,
            low_byte,
            checksum: crc8(&[FRAME_HEADER, high_byte, low_byte]),
        }
    }

    pub fn from_bytes(bytes: [u8; FRAME_LENGTH]) -> Self {
        Self {
            header: bytes[0],
            high_byte: bytes[1],
            low_byte: bytes[2],
            checksum: bytes[3],
        }
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LENGTH] {
        [self.header, self.high_byte, self.low_byte, self.checksum]
    }

    /// Checksum computed over the header and distance bytes.
    pub fn expected_checksum(&self) -> u8 {
        crc8(&[self.header, self.high_byte, self.low_byte])
    }

    pub fn is_valid(&self) -> bool {
        self.header == FRAME_HEADER && self.checksum == self.expected_checksum()
    }

    pub fn raw_distance(&self) -> RawDistance {
        RawDistance::from_bytes(self.high_byte, self.low_byte)
    }
}
