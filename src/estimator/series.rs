use std::collections::VecDeque;

use crate::distance::Distance;

/// Numeric sample window fed to the spectrum analysis.
///
/// Sentinel readings repeat the most recent measured value so the time axis
/// stays evenly spaced; sentinels seen before any measurement are dropped.
/// With a capacity set, the oldest sample is evicted once the window is full.
/// A capacity of zero is raised to one.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    samples: VecDeque<f64>,
    capacity: Option<usize>,
    last_measured: Option<f64>,
    appended: usize,
}

impl SampleSeries {
    pub fn new(capacity: Option<usize>) -> Self {
        let capacity = capacity.map(|capacity| capacity.max(1));
        Self {
            samples: VecDeque::with_capacity(capacity.unwrap_or_default()),
            capacity,
            last_measured: None,
            appended: 0,
        }
    }

    /// Returns `false` when the reading contributed nothing to the window.
    pub fn push(&mut self, sample: Distance) -> bool {
        let value = match sample {
            Distance::Measured(meters) => {
                self.last_measured = Some(meters);
                meters
            }
            _ => match self.last_measured {
                Some(previous) => previous,
                None => return false,
            },
        };

        if let Some(capacity) = self.capacity {
            if self.samples.len() == capacity {
                self.samples.pop_front();
            }
        }
        self.samples.push_back(value);
        self.appended += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Samples appended since creation or the last [`clear`](Self::clear),
    /// including those already evicted from the window.
    pub fn appended(&self) -> usize {
        self.appended
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.last_measured = None;
        self.appended = 0;
    }
}
