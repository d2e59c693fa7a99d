use std::collections::VecDeque;
use std::io::{self, Read};

use thiserror::Error;
use tracing::{debug, trace};

use super::frame::RawFrame;
use crate::constants::common::{FRAME_HEADER, FRAME_LENGTH};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read timed out")]
    TimedOut,
    #[error("byte stream disconnected: {0}")]
    Disconnected(#[source] io::Error),
}

/// Blocking, timeout-bounded byte stream the decoder pulls from.
///
/// The timeout itself is owned by the source (e.g. the serial port's read
/// timeout); a read that runs past it reports [`ReadError::TimedOut`].
pub trait ByteSource {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ReadError>;
}

impl<R: Read + ?Sized> ByteSource for R {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ReadError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(ReadError::Disconnected(io::ErrorKind::UnexpectedEof.into()));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                    ) =>
                {
                    return Err(ReadError::TimedOut);
                }
                Err(e) => return Err(ReadError::Disconnected(e)),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    Frame(RawFrame),
    /// The byte read was not a header marker, or nothing arrived before the timeout.
    AwaitingHeader,
    ChecksumMismatch { expected: u8, actual: u8 },
    /// The source disconnected, or stalled after a header was seen.
    StreamClosed,
}

impl DecodeOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeOutcome::StreamClosed)
    }
}

/// Pull decoder for the sensor's 4-byte binary frames.
///
/// Each call to [`decode_next`](Self::decode_next) consumes at most one frame.
/// Bytes following the header of a rejected frame are kept and rescanned, so a
/// header that was hidden inside a corrupted frame is still found.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    pending: VecDeque<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode_next<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> DecodeOutcome {
        let mut header = [0u8; 1];
        match self.fill(source, &mut header) {
            Ok(()) => {}
            Err(ReadError::TimedOut) => return DecodeOutcome::AwaitingHeader,
            Err(ReadError::Disconnected(err)) => {
                debug!(%err, "Stream closed while scanning for header");
                return DecodeOutcome::StreamClosed;
            }
        }

        if header[0] != FRAME_HEADER {
            trace!(byte = header[0], "Waiting for frame header");
            return DecodeOutcome::AwaitingHeader;
        }

        let mut body = [0u8; FRAME_LENGTH - 1];
        if let Err(err) = self.fill(source, &mut body) {
            debug!(%err, "Stream closed mid-frame");
            return DecodeOutcome::StreamClosed;
        }

        let frame = RawFrame::from_bytes([header[0], body[0], body[1], body[2]]);
        let expected = frame.expected_checksum();
        if frame.checksum != expected {
            for byte in body.iter().rev() {
                self.pending.push_front(*byte);
            }
            return DecodeOutcome::ChecksumMismatch {
                expected,
                actual: frame.checksum,
            };
        }

        DecodeOutcome::Frame(frame)
    }

    /// Drops any bytes held back for rescanning.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    fn fill<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
        buf: &mut [u8],
    ) -> Result<(), ReadError> {
        let from_pending = self.pending.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..from_pending)) {
            *slot = byte;
        }
        if from_pending < buf.len() {
            source.read_exact(&mut buf[from_pending..])?;
        }
        Ok(())
    }
}
