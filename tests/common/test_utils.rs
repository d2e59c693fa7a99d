use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use evo_stream::{Distance, RawDistance, RawFrame};

pub const CAPTURE_PATH: &str = "tests/data/capture.bin";

/// Reads a file and returns its contents as a vector of bytes.
pub fn read_file_as_bytes<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Wire bytes for a run of well-formed frames.
pub fn frame_bytes(raw: &[u16]) -> Vec<u8> {
    raw.iter()
        .flat_map(|value| RawFrame::encode(RawDistance(*value)).to_bytes())
        .collect()
}

/// `offset + amplitude * sin(2π·hz·t)` sampled at `rate` Hz.
pub fn sine_series(len: usize, offset: f64, amplitude: f64, hz: f64, rate: f64) -> Vec<Distance> {
    (0..len)
        .map(|i| {
            let t = i as f64 / rate;
            Distance::Measured(offset + amplitude * (2.0 * PI * hz * t).sin())
        })
        .collect()
}
