//! Bin keys and per-bin sample storage.

use std::collections::VecDeque;

use serde::Serialize;

use crate::vmg::TackSide;

/// Key of one performance bin: TWA bucket index plus tack side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BinKey {
    pub index: usize,
    pub tack: TackSide,
}

impl BinKey {
    /// Key for a TWA magnitude under the given bin width.
    pub fn for_twa(twa_deg: f64, tack: TackSide, bin_width_deg: f64) -> Self {
        Self {
            index: bin_index(twa_deg, bin_width_deg),
            tack,
        }
    }
}

/// Bucket index for a TWA magnitude.
///
/// `floor(clamp(|twa|, 0, 180) / width)`. Never negative and at most
/// `ceil(180 / width)`.
#[inline]
pub fn bin_index(twa_deg: f64, bin_width_deg: f64) -> usize {
    let clamped = if twa_deg.is_finite() {
        twa_deg.abs().clamp(0.0, 180.0)
    } else {
        0.0
    };
    (clamped / bin_width_deg).floor() as usize
}

/// Bounded FIFO of observed speeds.
#[derive(Debug, Default, Clone)]
pub(super) struct SpeedBin {
    samples: VecDeque<f64>,
}

impl SpeedBin {
    /// Append a sample and evict the oldest beyond `max`.
    pub(super) fn push(&mut self, sog_mps: f64, max: usize) {
        self.samples.push_back(sog_mps);
        self.truncate_oldest(max);
    }

    pub(super) fn truncate_oldest(&mut self, max: usize) {
        while self.samples.len() > max {
            self.samples.pop_front();
        }
    }

    pub(super) fn len(&self) -> usize {
        self.samples.len()
    }

    pub(super) fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    #[cfg(test)]
    pub(super) fn values(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }
}

/// Snapshot of one bin for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinSummary {
    pub key: BinKey,
    /// Lower edge of the bucket under the bin width in effect when the
    /// snapshot was taken.
    pub twa_from_deg: f64,
    pub samples: usize,
    pub mean_sog_mps: f64,
}
