//! Online per-tack speed model.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::DashMap;
use tracing::debug;

use super::bin::{BinKey, BinSummary, SpeedBin};
use crate::config::{AdvisorSettings, DEFAULT_BIN_WIDTH_DEG, DEFAULT_MAX_SAMPLES_PER_BIN};
use crate::vmg::TackSide;

/// Learned speed per (TWA bucket, tack).
///
/// Safe to share between the ingestion path and the evaluation ticker.
/// Each bin is guarded by its map shard lock, so an append plus eviction is
/// atomic with respect to readers of the same bin. The tuning parameters
/// are plain atomics read once per operation.
///
/// Changing the bin width does not move samples already stored; they keep
/// the index they were recorded under.
#[derive(Debug)]
pub struct PerformanceModel {
    bins: DashMap<BinKey, SpeedBin>,
    /// `f64` bit pattern of the bin width in degrees.
    bin_width_bits: AtomicU64,
    max_samples_per_bin: AtomicUsize,
}

impl PerformanceModel {
    /// Create a model with explicit parameters.
    ///
    /// Non-positive or non-finite widths fall back to the default, and a
    /// zero capacity is raised to one.
    pub fn new(bin_width_deg: f64, max_samples_per_bin: usize) -> Self {
        Self {
            bins: DashMap::new(),
            bin_width_bits: AtomicU64::new(sanitize_width(bin_width_deg).to_bits()),
            max_samples_per_bin: AtomicUsize::new(max_samples_per_bin.max(1)),
        }
    }

    /// Create a model with the default parameters.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BIN_WIDTH_DEG, DEFAULT_MAX_SAMPLES_PER_BIN)
    }

    /// Create a model using the learning parameters from settings.
    pub fn from_settings(settings: &AdvisorSettings) -> Self {
        Self::new(settings.bin_width_deg, settings.max_samples_per_bin)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    pub fn bin_width_deg(&self) -> f64 {
        f64::from_bits(self.bin_width_bits.load(Ordering::Acquire))
    }

    pub fn max_samples_per_bin(&self) -> usize {
        self.max_samples_per_bin.load(Ordering::Acquire)
    }

    /// Change the bucket width for subsequent operations.
    pub fn set_bin_width_deg(&self, bin_width_deg: f64) {
        let width = sanitize_width(bin_width_deg);
        let previous = f64::from_bits(self.bin_width_bits.swap(width.to_bits(), Ordering::AcqRel));
        if previous != width {
            debug!(from = previous, to = width, "Bin width changed; stored samples keep their bins");
        }
    }

    /// Change the per-bin capacity.
    ///
    /// Shrinking trims every bin to its newest samples so that no bin is
    /// ever observed above capacity.
    pub fn set_max_samples_per_bin(&self, max_samples_per_bin: usize) {
        let max = max_samples_per_bin.max(1);
        let previous = self.max_samples_per_bin.swap(max, Ordering::AcqRel);
        if max < previous {
            for mut bin in self.bins.iter_mut() {
                bin.truncate_oldest(max);
            }
            debug!(from = previous, to = max, "Per-bin capacity reduced; bins trimmed");
        }
    }

    /// Apply the learning parameters from settings.
    pub fn apply_settings(&self, settings: &AdvisorSettings) {
        self.set_bin_width_deg(settings.bin_width_deg);
        self.set_max_samples_per_bin(settings.max_samples_per_bin);
    }

    // =========================================================================
    // Samples
    // =========================================================================

    /// Record an observed speed for a TWA magnitude on a tack.
    ///
    /// Non-finite or negative speeds are ignored.
    pub fn record_sample(&self, twa_deg: f64, tack: TackSide, sog_mps: f64) {
        if !sog_mps.is_finite() || sog_mps < 0.0 {
            return;
        }
        let key = self.key(twa_deg, tack);
        let mut bin = self.bins.entry(key).or_default();
        // Capacity must be read under the bin lock; shrinking trims under it
        bin.push(sog_mps, self.max_samples_per_bin());
    }

    /// Mean learned speed for a TWA magnitude on a tack, if any samples exist.
    pub fn average_speed(&self, twa_deg: f64, tack: TackSide) -> Option<f64> {
        let key = self.key(twa_deg, tack);
        self.bins.get(&key).and_then(|bin| bin.mean())
    }

    /// Number of samples currently held for a TWA magnitude on a tack.
    pub fn sample_count(&self, twa_deg: f64, tack: TackSide) -> usize {
        let key = self.key(twa_deg, tack);
        self.bins.get(&key).map(|bin| bin.len()).unwrap_or(0)
    }

    /// Number of samples held across all bins.
    pub fn total_samples(&self) -> usize {
        self.bins.iter().map(|bin| bin.len()).sum()
    }

    /// Snapshot of every non-empty bin, ordered by tack then index.
    pub fn bins(&self) -> Vec<BinSummary> {
        let width = self.bin_width_deg();
        let mut summaries: Vec<BinSummary> = self
            .bins
            .iter()
            .filter_map(|entry| {
                let mean = entry.value().mean()?;
                Some(BinSummary {
                    key: *entry.key(),
                    twa_from_deg: entry.key().index as f64 * width,
                    samples: entry.value().len(),
                    mean_sog_mps: mean,
                })
            })
            .collect();
        summaries.sort_by_key(|s| (s.key.tack, s.key.index));
        summaries
    }

    /// Drop every learned sample.
    pub fn clear(&self) {
        self.bins.clear();
    }

    fn key(&self, twa_deg: f64, tack: TackSide) -> BinKey {
        BinKey::for_twa(twa_deg, tack, self.bin_width_deg())
    }
}

impl Default for PerformanceModel {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn sanitize_width(bin_width_deg: f64) -> f64 {
    if bin_width_deg.is_finite() && bin_width_deg > 0.0 {
        bin_width_deg
    } else {
        DEFAULT_BIN_WIDTH_DEG
    }
}
