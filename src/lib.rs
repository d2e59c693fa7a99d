//! Decoder and periodicity estimator for the TeraRanger Evo binary range stream.
//!
//! Bytes from an open serial link are framed and checked by
//! [`parser::FrameDecoder`], turned into [`Distance`] readings by
//! [`DistanceMapper`], and fed to a [`StreamingEstimator`] that reports the
//! dominant repetition rate of the signal. [`SensorSession`] ties the three
//! together in a blocking pull loop.

pub mod config;
pub mod constants;
pub mod distance;
pub mod error;
pub mod estimator;
pub mod parser;
pub mod session;

pub use config::Config;
pub use distance::{Distance, DistanceMapper};
pub use error::{Error, Result};
pub use estimator::{
    EstimatorConfig, FrequencyEstimate, SampleSeries, StreamingEstimator, TriggerMode,
};
pub use parser::{ByteSource, DecodeOutcome, FrameDecoder, RawDistance, RawFrame};
pub use session::{SensorSession, SessionEvent, SessionStats, SessionSummary, StopReason};
