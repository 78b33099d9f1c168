//! Adaptive per-tack performance model.
//!
//! Observed speed over ground is bucketed by true wind angle magnitude and
//! tack side. Each bucket keeps a bounded FIFO of the most recent speeds;
//! the mean of a bucket predicts the speed the boat will make on that
//! angle and tack. This is what lets the evaluator account for a boat that
//! is faster on one tack than the other.
//!
//! ```text
//! (bin index, tack) → [oldest … newest]   len ≤ max_samples_per_bin
//! bin index = floor(clamp(|twa|, 0, 180) / bin_width_deg)
//! ```

mod bin;
mod model;

pub use bin::{bin_index, BinKey, BinSummary};
pub use model::PerformanceModel;
