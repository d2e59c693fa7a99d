use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("spectrum computation failed: {0}")]
    Fft(#[from] realfft::FftError),
    #[error("no sensor found (looked for USB product id {pid:#06x})")]
    SensorNotFound { pid: u16 },
}
