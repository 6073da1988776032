use serde::{Deserialize, Serialize};

use super::ControlVector;
use crate::utils::{Result, SimError};

/// Append-only series whose timestamps strictly increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries<T> {
    times: Vec<f64>,
    values: Vec<T>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimeSeries<T> {
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends a sample. `time` must be finite and later than the last entry.
    pub fn push(&mut self, time: f64, value: T) -> Result<()> {
        let last = self.last_time();
        if !time.is_finite() || matches!(last, Some(last) if time <= last) {
            return Err(SimError::NonMonotonicRecord {
                last: last.unwrap_or(f64::NEG_INFINITY),
                attempted: time,
            });
        }
        self.times.push(time);
        self.values.push(value);
        Ok(())
    }

    /// Appends only when `time` is newer than the last entry. Returns whether it did.
    pub fn push_if_newer(&mut self, time: f64, value: T) -> bool {
        self.push(time, value).is_ok()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    pub fn last(&self) -> Option<(f64, &T)> {
        self.times.last().copied().zip(self.values.last())
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> {
        self.times.iter().copied().zip(self.values.iter())
    }
}

/// Recorded output of one run: flattened states and control inputs, kept as
/// independent series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    pub states: TimeSeries<Vec<f64>>,
    pub inputs: TimeSeries<ControlVector>,
}

impl TimeSeriesRecord {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: TimeSeries::with_capacity(capacity),
            inputs: TimeSeries::with_capacity(capacity),
        }
    }

    /// Whether both series carry the same timestamps.
    pub fn is_aligned(&self) -> bool {
        self.states.times() == self.inputs.times()
    }
}
