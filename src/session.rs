use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort, SerialPortType};
use tracing::{debug, info, warn};

use crate::config::SerialConfig;
use crate::constants::common::{BINARY_MODE_COMMAND, SENSOR_USB_PID};
use crate::distance::{Distance, DistanceMapper};
use crate::error::{Error, Result};
use crate::estimator::{FrequencyEstimate, StreamingEstimator};
use crate::parser::{ByteSource, DecodeOutcome, FrameDecoder, RawFrame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Reading(Distance),
    Estimate(FrequencyEstimate),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: usize,
    pub measured: usize,
    pub above_range: usize,
    pub no_target: usize,
    pub below_range: usize,
    /// Non-header bytes and empty reads while scanning for a header.
    pub header_waits: usize,
    pub checksum_errors: usize,
    pub estimates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    StreamClosed,
    FrameLimit,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub reason: StopReason,
    pub stats: SessionStats,
}

type Callback = Box<dyn FnMut(SessionEvent) + Send>;

/// Single-threaded pull loop: decode, map, append, emit.
pub struct SensorSession<S> {
    source: S,
    decoder: FrameDecoder,
    estimator: StreamingEstimator,
    callback: Option<Callback>,
    stats: SessionStats,
    max_frames: Option<usize>,
    stop: Arc<AtomicBool>,
}

impl SensorSession<Box<dyn SerialPort>> {
    /// Opens the sensor port and switches the sensor to binary output.
    pub fn open(serial: &SerialConfig, estimator: StreamingEstimator) -> Result<Self> {
        let path = match &serial.port {
            Some(port) => port.clone(),
            None => find_sensor_port()?,
        };
        info!(port = %path, baud_rate = serial.baud_rate, "Opening sensor port");

        let mut port = serialport::new(&path, serial.baud_rate)
            .timeout(Duration::from_millis(serial.timeout_ms))
            .open()?;
        port.clear(ClearBuffer::Input)?;
        enter_binary_mode(&mut port)?;
        info!("Sensor in binary streaming mode");

        Ok(Self::new(port, estimator))
    }
}

impl<S: ByteSource> SensorSession<S> {
    pub fn new(source: S, estimator: StreamingEstimator) -> Self {
        Self {
            source,
            decoder: FrameDecoder::new(),
            estimator,
            callback: None,
            stats: SessionStats::default(),
            max_frames: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_frame_limit(mut self, max_frames: Option<usize>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(SessionEvent) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Setting the flag ends [`run`](Self::run) before its next read.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn estimator(&self) -> &StreamingEstimator {
        &self.estimator
    }

    /// Clears the sample series, the latest estimate and any held-back bytes.
    /// Counters keep running.
    pub fn restart(&mut self) {
        self.estimator.reset();
        self.decoder.reset();
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Decodes at most one frame and dispatches the result.
    pub fn step(&mut self) -> DecodeOutcome {
        let outcome = self.decoder.decode_next(&mut self.source);
        match outcome {
            DecodeOutcome::Frame(frame) => self.handle_frame(frame),
            DecodeOutcome::AwaitingHeader => self.stats.header_waits += 1,
            DecodeOutcome::ChecksumMismatch { expected, actual } => {
                self.stats.checksum_errors += 1;
                warn!(
                    expected,
                    actual,
                    "CRC mismatch. Check connection or make sure only one program accesses the sensor port"
                );
            }
            DecodeOutcome::StreamClosed => info!("Device disconnected, ending session"),
        }
        outcome
    }

    pub fn run(&mut self) -> SessionSummary {
        let reason = loop {
            if self.stop.load(Ordering::Relaxed) {
                break StopReason::Cancelled;
            }
            if self.max_frames.is_some_and(|limit| self.stats.frames >= limit) {
                break StopReason::FrameLimit;
            }
            if self.step().is_fatal() {
                break StopReason::StreamClosed;
            }
        };
        debug!(?reason, stats = ?self.stats, "Session finished");
        SessionSummary {
            reason,
            stats: self.stats.clone(),
        }
    }

    fn handle_frame(&mut self, frame: RawFrame) {
        let distance = DistanceMapper::map(frame.raw_distance());
        self.stats.frames += 1;
        match distance {
            Distance::Measured(_) => self.stats.measured += 1,
            Distance::AboveRange => self.stats.above_range += 1,
            Distance::NoTarget => self.stats.no_target += 1,
            Distance::BelowRange => self.stats.below_range += 1,
        }
        self.emit(SessionEvent::Reading(distance));

        if let Some(estimate) = self.estimator.append(distance) {
            self.stats.estimates += 1;
            self.emit(SessionEvent::Estimate(estimate));
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        if let Some(callback) = self.callback.as_mut() {
            callback(event);
        }
    }
}

/// Writes the command that puts the sensor into binary frame output.
pub fn enter_binary_mode<W: Write + ?Sized>(port: &mut W) -> io::Result<()> {
    port.write_all(&BINARY_MODE_COMMAND)?;
    port.flush()
}

/// Finds the first USB serial port whose product id matches the sensor.
pub fn find_sensor_port() -> Result<String> {
    info!("Scanning all live ports on this PC");
    let ports = serialport::available_ports()?;
    ports
        .into_iter()
        .find_map(|port| match port.port_type {
            SerialPortType::UsbPort(usb) if usb.pid == SENSOR_USB_PID => {
                info!(port = %port.port_name, "Sensor found");
                Some(port.port_name)
            }
            _ => None,
        })
        .ok_or(Error::SensorNotFound {
            pid: SENSOR_USB_PID,
        })
}
