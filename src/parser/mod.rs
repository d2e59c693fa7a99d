//! # Binary frame parsing
//!
//! The sensor streams fixed 4-byte frames once it is in binary mode:
//! a `'T'` header, a big-endian 16-bit distance in millimeters and a CRC-8
//! over the first three bytes. There is no length field, so the decoder
//! synchronizes by scanning for the header byte.

pub mod crc;
pub mod decoder;
pub mod frame;

pub use decoder::{ByteSource, DecodeOutcome, FrameDecoder, ReadError};
pub use frame::{RawDistance, RawFrame};
