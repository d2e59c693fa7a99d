//! # Streaming periodicity estimation
//!
//! Distance readings are collected into a [`SampleSeries`] and, whenever the
//! trigger fires, run through a real-input FFT. The strongest strictly
//! positive frequency bin is reported as the dominant repetition rate.

mod series;

use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use tracing::{debug, warn};

use crate::constants::common::{FRAME_LENGTH, WIRE_BITS_PER_BYTE};
use crate::distance::Distance;
use crate::error::{Error, Result};

pub use series::SampleSeries;

/// Fewest samples for which a spectrum is computed.
const MIN_SAMPLES: usize = 2;
/// A peak at or below this fraction of the series' L1 norm is numerical noise.
const APERIODIC_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Recompute after every sample that enters the window.
    Continuous,
    /// Recompute once `size` new samples have entered the window.
    Batch { size: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub sample_rate_hz: f64,
    /// Window capacity in samples; `None` keeps every sample.
    pub window: Option<usize>,
    pub trigger: TriggerMode,
}

impl EstimatorConfig {
    /// Sample rate of a link saturated with back-to-back frames.
    pub fn frame_rate_for_baud(baud_rate: u32) -> f64 {
        baud_rate as f64 / (FRAME_LENGTH as f64 * WIRE_BITS_PER_BYTE as f64)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate_hz
            )));
        }
        if self.window == Some(0) {
            return Err(Error::InvalidConfig("window must hold at least one sample".into()));
        }
        if self.trigger == (TriggerMode::Batch { size: 0 }) {
            return Err(Error::InvalidConfig("batch size must be at least one".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyEstimate {
    pub dominant_frequency_hz: f64,
    pub rate_per_minute: f64,
    pub computed_at_sample_count: usize,
}

pub struct StreamingEstimator {
    config: EstimatorConfig,
    series: SampleSeries,
    since_last: usize,
    latest: Option<FrequencyEstimate>,
    fft: Option<Arc<dyn RealToComplex<f64>>>,
    input: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl StreamingEstimator {
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            series: SampleSeries::new(config.window),
            config,
            since_last: 0,
            latest: None,
            fft: None,
            input: Vec::new(),
            spectrum: Vec::new(),
            scratch: Vec::new(),
        })
    }

    /// Adds a reading; returns an estimate when the trigger fires and the
    /// window shows a dominant periodicity.
    pub fn append(&mut self, sample: Distance) -> Option<FrequencyEstimate> {
        if !self.series.push(sample) {
            return None;
        }
        self.since_last += 1;

        let due = match self.config.trigger {
            TriggerMode::Continuous => true,
            TriggerMode::Batch { size } => self.since_last >= size,
        };
        if !due {
            return None;
        }
        self.since_last = 0;
        self.recompute()
    }

    /// Re-runs the analysis over the current window and replaces the latest estimate.
    pub fn recompute(&mut self) -> Option<FrequencyEstimate> {
        let estimate = match self.analyze() {
            Ok(estimate) => estimate,
            Err(err) => {
                warn!(%err, "Spectrum computation failed");
                None
            }
        };
        self.latest = estimate;
        estimate
    }

    pub fn latest(&self) -> Option<FrequencyEstimate> {
        self.latest
    }

    pub fn series(&self) -> &SampleSeries {
        &self.series
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Clears the window and the latest estimate.
    pub fn reset(&mut self) {
        self.series.clear();
        self.since_last = 0;
        self.latest = None;
    }

    fn analyze(&mut self) -> Result<Option<FrequencyEstimate>> {
        let len = self.series.len();
        if len < MIN_SAMPLES {
            return Ok(None);
        }

        let fft = self.plan(len);
        for (slot, value) in self.input.iter_mut().zip(self.series.iter()) {
            *slot = value;
        }
        fft.process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)?;

        // Bin 0 is the DC offset; bins from ceil(len / 2) on are Nyquist or beyond.
        let positive = 1..len.div_ceil(2);
        let peak = self.spectrum[positive]
            .iter()
            .enumerate()
            .map(|(i, bin)| (i + 1, bin.norm()))
            .max_by(|(_, a), (_, b)| a.total_cmp(b));

        let Some((bin, magnitude)) = peak else {
            return Ok(None);
        };
        let l1_norm: f64 = self.series.iter().map(f64::abs).sum();
        if magnitude <= APERIODIC_TOLERANCE * l1_norm {
            debug!(samples = len, "No dominant periodicity");
            return Ok(None);
        }

        let dominant_frequency_hz = bin as f64 * self.config.sample_rate_hz / len as f64;
        let estimate = FrequencyEstimate {
            dominant_frequency_hz,
            rate_per_minute: dominant_frequency_hz * 60.0,
            computed_at_sample_count: self.series.appended(),
        };
        debug!(
            bin,
            magnitude,
            hz = estimate.dominant_frequency_hz,
            "Dominant frequency"
        );
        Ok(Some(estimate))
    }

    /// Returns the forward plan for `len` samples, resizing buffers when it changes.
    /// Only the current plan is kept.
    fn plan(&mut self, len: usize) -> Arc<dyn RealToComplex<f64>> {
        if let Some(fft) = &self.fft {
            if fft.len() == len {
                return Arc::clone(fft);
            }
        }
        let fft = RealFftPlanner::<f64>::new().plan_fft_forward(len);
        self.input = fft.make_input_vec();
        self.spectrum = fft.make_output_vec();
        self.scratch = fft.make_scratch_vec();
        self.fft = Some(Arc::clone(&fft));
        fft
    }
}
