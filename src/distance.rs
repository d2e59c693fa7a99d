use std::fmt;

use crate::constants::common::{
    MILLIMETERS_PER_METER, RAW_ABOVE_RANGE, RAW_BELOW_RANGE, RAW_NO_TARGET,
};
use crate::parser::RawDistance;

/// One reading reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    Measured(f64),
    /// Target is beyond the maximum sensing distance.
    AboveRange,
    /// The sensor could not resolve a return.
    NoTarget,
    /// Target is closer than the minimum sensing distance.
    BelowRange,
}

impl Distance {
    pub fn as_meters(&self) -> Option<f64> {
        match self {
            Distance::Measured(meters) => Some(*meters),
            _ => None,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Distance::Measured(_))
    }
}

impl From<RawDistance> for Distance {
    fn from(raw: RawDistance) -> Self {
        DistanceMapper::map(raw)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Measured(meters) => write!(f, "{:.3} m", meters),
            Distance::AboveRange => write!(f, "+inf (above range)"),
            Distance::NoTarget => write!(f, "nan (no target)"),
            Distance::BelowRange => write!(f, "-inf (below range)"),
        }
    }
}

pub struct DistanceMapper;

impl DistanceMapper {
    pub fn map(raw: RawDistance) -> Distance {
        match raw.0 {
            RAW_BELOW_RANGE => Distance::BelowRange,
            RAW_NO_TARGET => Distance::NoTarget,
            RAW_ABOVE_RANGE => Distance::AboveRange,
            millimeters => Distance::Measured(millimeters as f64 / MILLIMETERS_PER_METER),
        }
    }
}
