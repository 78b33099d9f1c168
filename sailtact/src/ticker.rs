//! Cancellable periodic task.
//!
//! `Ticker::start` spawns a task on the given runtime that calls a
//! callback every `interval`, first one `interval` after start. The
//! returned [`TickerHandle`] stops it; stopping is idempotent and can be
//! done from any thread. A tick that is already running completes.
//!
//! ```ignore
//! let handle = Ticker::start(&runtime, Duration::from_secs(30), move || {
//!     advisor.evaluate_now(Utc::now());
//! });
//!
//! handle.stop();
//! handle.stop(); // no-op
//! ```

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Spawns periodic callbacks.
pub struct Ticker;

impl Ticker {
    /// Start calling `callback` every `interval` on `runtime`.
    ///
    /// The cadence starts from the moment of this call. A zero interval is
    /// raised to one millisecond.
    pub fn start<F>(runtime: &Handle, interval: Duration, mut callback: F) -> TickerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let cancellation = CancellationToken::new();
        let token = cancellation.clone();

        runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    _ = token.cancelled() => {
                        debug!("Ticker task exiting");
                        break;
                    }

                    _ = ticks.tick() => {
                        callback();
                    }
                }
            }
        });

        info!(interval_secs = interval.as_secs_f64(), "Ticker started");

        TickerHandle {
            cancellation,
            interval,
        }
    }
}

/// Handle to a running ticker.
///
/// Dropping the handle stops the ticker.
#[derive(Debug)]
pub struct TickerHandle {
    cancellation: CancellationToken,
    interval: Duration,
}

impl TickerHandle {
    /// Stop scheduling further ticks. Safe to call more than once.
    pub fn stop(&self) {
        if !self.cancellation.is_cancelled() {
            info!(interval_secs = self.interval.as_secs_f64(), "Ticker stopped");
            self.cancellation.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        !self.cancellation.is_cancelled()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
