//! Fixed-capacity frame metric ring.
//!
//! A fixed-size pool rather than an unbounded `Vec`, since only the most
//! recent window of frame timings matters for auto-degrade decisions:
//! every `record` overwrites the oldest slot once the ring is full.

use crate::model::Real;
use super::frame_metric::FrameMetric;

const DEFAULT_CAPACITY: usize = 60;

pub struct FrameMetricRing {
    capacity: usize,
    slots: Vec<Option<FrameMetric>>,
    cursor: usize,
    filled: usize,
}

impl FrameMetricRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            slots: vec![None; capacity],
            cursor: 0,
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Append a frame metric, overwriting the oldest entry once full.
    pub fn record(&mut self, metric: FrameMetric) {
        self.slots[self.cursor] = Some(metric);
        self.cursor = (self.cursor + 1) % self.capacity;
        self.filled = (self.filled + 1).min(self.capacity);
    }

    /// All recorded entries, oldest first.
    pub fn entries(&self) -> Vec<FrameMetric> {
        if self.filled < self.capacity {
            self.slots[..self.filled].iter().filter_map(|s| *s).collect()
        } else {
            (0..self.capacity)
                .map(|i| (self.cursor + i) % self.capacity)
                .filter_map(|i| self.slots[i])
                .collect()
        }
    }

    /// Arithmetic mean of `frame_time_ms` over entries with
    /// `timestamp >= now - window_ms`.
    pub fn average_frame_time(&self, now: i64, window_ms: i64) -> Real {
        let cutoff = now - window_ms;
        let windowed: Vec<Real> = self
            .entries()
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .map(|e| e.frame_time_ms)
            .collect();
        if windowed.is_empty() {
            return 0.0;
        }
        windowed.iter().sum::<Real>() / windowed.len() as Real
    }

    pub fn fps(&self, now: i64, window_ms: i64) -> Real {
        let avg = self.average_frame_time(now, window_ms);
        if avg <= 0.0 {
            0.0
        } else {
            1000.0 / avg
        }
    }

    /// Count of consecutive trailing dropped frames (most recent first).
    pub fn violation_count(&self) -> usize {
        let entries = self.entries();
        entries.iter().rev().take_while(|e| e.dropped).count()
    }
}

impl Default for FrameMetricRing {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
#[path = "ring_tests.rs"]
mod tests;
