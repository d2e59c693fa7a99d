use std::path::Path;

use serde::Deserialize;

use crate::constants::common;
use crate::error::Result;
use crate::estimator::{EstimatorConfig, TriggerMode};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub serial: SerialConfig,
    pub estimator: EstimatorSection,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port path; the sensor is looked up by USB product id when unset.
    pub port: Option<String>,
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Continuous,
    Batch,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EstimatorSection {
    /// Overrides the rate derived from the baud rate.
    pub sample_rate_hz: Option<f64>,
    /// Window capacity in samples, 0 for unbounded.
    pub window: usize,
    pub trigger: Trigger,
    /// Samples per batch; defaults to the window size.
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Stop after this many validated frames.
    pub max_frames: Option<usize>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: common::BAUDRATE,
            timeout_ms: common::READ_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Default for EstimatorSection {
    fn default() -> Self {
        Self {
            sample_rate_hz: None,
            window: common::DEFAULT_WINDOW,
            trigger: Trigger::Batch,
            batch_size: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.estimator_config()?;
        Ok(config)
    }

    pub fn estimator_config(&self) -> Result<EstimatorConfig> {
        let section = &self.estimator;
        let window = (section.window > 0).then_some(section.window);
        let trigger = match section.trigger {
            Trigger::Continuous => TriggerMode::Continuous,
            Trigger::Batch => TriggerMode::Batch {
                size: section
                    .batch_size
                    .or(window)
                    .unwrap_or(common::DEFAULT_WINDOW),
            },
        };
        let config = EstimatorConfig {
            sample_rate_hz: section
                .sample_rate_hz
                .unwrap_or_else(|| EstimatorConfig::frame_rate_for_baud(self.serial.baud_rate)),
            window,
            trigger,
        };
        config.validate()?;
        Ok(config)
    }
}
