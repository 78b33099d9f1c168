//! Advisor session.
//!
//! Owns everything one sailing session needs: settings, the learned
//! performance model, the current wind input, the latest navigation state
//! and the evaluation ticker. State changes and recommendations are pushed
//! to subscribers over channels.
//!
//! # Architecture
//!
//! ```text
//!  NavigationUpdate ──mpsc──► run() ──► ingest()
//!                                         │  ├─► PerformanceModel::record_sample
//!                                         │  └─► watch<NavigationState>
//!                                         ▼
//!                                broadcast<AdvisorEvent>
//!                                         ▲
//!  Ticker (eval_interval) ──► evaluate_now() ──► ManeuverEvaluator
//! ```
//!
//! # Example
//!
//! ```ignore
//! let advisor = Arc::new(Advisor::new(AdvisorSettings::load()?));
//! advisor.set_wind(Some(WindInput::Direction(220.0)));
//!
//! let mut events = advisor.subscribe();
//! advisor.start_alerts(&runtime.handle());
//!
//! let (tx, rx) = mpsc::channel(64);
//! runtime.spawn({
//!     let advisor = Arc::clone(&advisor);
//!     async move { advisor.run(rx, shutdown).await }
//! });
//! ```

mod events;
mod waypoint;

pub use events::{AdvisorEvent, EVENT_CHANNEL_CAPACITY};

use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{AdvisorSettings, SharedSettings};
use crate::evaluator::{
    EvaluationInput, ManeuverAssessment, ManeuverEvaluator, ManeuverRecommendation,
};
use crate::geo::Coordinate;
use crate::navigation::{NavigationFix, NavigationState, NavigationUpdate};
use crate::performance::PerformanceModel;
use crate::ticker::{Ticker, TickerHandle};
use crate::vmg::{twa_magnitude, vmg, TackSide};
use crate::wind::WindInput;

use waypoint::StartWaypoint;

/// Running evaluation ticker plus what is needed to restart it.
///
/// Dropping the schedule stops the ticker.
struct AlertSchedule {
    ticker: TickerHandle,
    runtime: Handle,
    advisor: Weak<Advisor>,
}

/// One sailing session.
///
/// Every method takes `&self`; the advisor is meant to be shared behind an
/// `Arc` between the ingestion task, the ticker and the UI.
pub struct Advisor {
    settings: SharedSettings,
    model: Arc<PerformanceModel>,
    evaluator: ManeuverEvaluator,
    wind: RwLock<Option<WindInput>>,
    waypoint: Mutex<StartWaypoint>,
    last_fix_at: Mutex<Option<DateTime<Utc>>>,
    state_tx: watch::Sender<NavigationState>,
    events_tx: broadcast::Sender<AdvisorEvent>,
    alerts: Mutex<Option<AlertSchedule>>,
}

impl Advisor {
    /// Create an idle session. Alerts are off until [`Advisor::start_alerts`].
    pub fn new(settings: AdvisorSettings) -> Self {
        let model = Arc::new(PerformanceModel::from_settings(&settings));
        let (state_tx, _) = watch::channel(NavigationState::default());
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            settings: SharedSettings::new(settings),
            evaluator: ManeuverEvaluator::new(Arc::clone(&model)),
            model,
            wind: RwLock::new(None),
            waypoint: Mutex::new(StartWaypoint::default()),
            last_fix_at: Mutex::new(None),
            state_tx,
            events_tx,
            alerts: Mutex::new(None),
        }
    }

    /// Create a session with default settings.
    pub fn with_defaults() -> Self {
        Self::new(AdvisorSettings::default())
    }

    // =========================================================================
    // Accessors and subscriptions
    // =========================================================================

    pub fn settings(&self) -> AdvisorSettings {
        self.settings.snapshot()
    }

    pub fn model(&self) -> &Arc<PerformanceModel> {
        &self.model
    }

    /// Latest navigation state.
    pub fn state(&self) -> NavigationState {
        *self.state_tx.borrow()
    }

    /// Watch the navigation state.
    pub fn watch_state(&self) -> watch::Receiver<NavigationState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to state changes and recommendations.
    pub fn subscribe(&self) -> broadcast::Receiver<AdvisorEvent> {
        self.events_tx.subscribe()
    }

    // =========================================================================
    // Settings and wind
    // =========================================================================

    /// Mutate settings; changes apply to subsequent operations.
    ///
    /// Learning parameters are pushed to the model. A changed evaluation
    /// interval restarts a running ticker, so the cadence restarts now.
    pub fn update_settings<F>(&self, f: F) -> AdvisorSettings
    where
        F: FnOnce(&mut AdvisorSettings),
    {
        let (previous, current) = self.settings.update(f);
        self.model.apply_settings(&current);

        if previous.eval_interval != current.eval_interval {
            self.reschedule_alerts(&current);
        }
        current
    }

    /// Set or clear the wind input.
    pub fn set_wind(&self, wind: Option<WindInput>) {
        debug!(?wind, "Wind input updated");
        *self.wind.write() = wind;
    }

    pub fn wind(&self) -> Option<WindInput> {
        *self.wind.read()
    }

    /// True wind direction for the current state, if it can be resolved.
    pub fn twd(&self) -> Option<f64> {
        let settings = self.settings.snapshot();
        self.twd_for(self.state().effective_heading(), &settings)
    }

    fn twd_for(&self, heading: Option<f64>, settings: &AdvisorSettings) -> Option<f64> {
        self.wind
            .read()
            .and_then(|w| w.true_wind_direction(heading, settings.twa_positive_starboard))
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Apply one navigation update.
    ///
    /// Returns `false` when a position fix is dropped by rate limiting.
    /// Accepted updates publish the new state and, when heading, wind and
    /// speed are all known, record a performance sample.
    pub fn ingest(&self, update: NavigationUpdate) -> bool {
        let settings = self.settings.snapshot();

        if let NavigationUpdate::Fix(fix) = &update {
            if !self.accept_fix(fix, &settings) {
                return false;
            }
        }

        let waypoint = *self.waypoint.lock();
        let mut published = NavigationState::default();
        self.state_tx.send_modify(|state| {
            let next = match update {
                NavigationUpdate::Fix(fix) => state.with_fix(fix),
                NavigationUpdate::Heading(reading) => state.with_heading(reading),
            };
            let next = next.with_waypoint(waypoint.info_from(next.coordinate));
            *state = next;
            published = next;
        });

        self.record_sample(&published, &settings);
        // No subscribers is not an error
        let _ = self.events_tx.send(AdvisorEvent::StateChanged(published));
        true
    }

    /// Drive [`Advisor::ingest`] from a channel until it closes or
    /// `shutdown` fires.
    pub async fn run(
        &self,
        mut updates: mpsc::Receiver<NavigationUpdate>,
        shutdown: CancellationToken,
    ) {
        info!("Advisor ingestion loop started");
        let mut accepted = 0u64;
        let mut dropped = 0u64;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    debug!("Advisor ingestion cancelled");
                    break;
                }

                update = updates.recv() => {
                    match update {
                        Some(update) => {
                            if self.ingest(update) {
                                accepted += 1;
                            } else {
                                dropped += 1;
                            }
                        }
                        None => {
                            debug!("Navigation channel closed");
                            break;
                        }
                    }
                }
            }
        }

        info!(accepted, dropped, "Advisor ingestion loop stopped");
    }

    fn accept_fix(&self, fix: &NavigationFix, settings: &AdvisorSettings) -> bool {
        let at = fix.timestamp.unwrap_or_else(Utc::now);
        let min_interval = chrono::Duration::from_std(settings.min_fix_interval)
            .unwrap_or_else(|_| chrono::Duration::zero());

        let mut last = self.last_fix_at.lock();
        if let Some(previous) = *last {
            let elapsed = at.signed_duration_since(previous);
            // Out-of-order timestamps restart the window
            if elapsed >= chrono::Duration::zero() && elapsed < min_interval {
                debug!(elapsed_ms = elapsed.num_milliseconds(), "Fix dropped: too soon");
                return false;
            }
        }
        *last = Some(at);
        true
    }

    fn record_sample(&self, state: &NavigationState, settings: &AdvisorSettings) {
        let heading = state.effective_heading();
        let (Some(heading), Some(twd), Some(sog)) =
            (heading, self.twd_for(heading, settings), state.sog_mps)
        else {
            return;
        };

        let tack = TackSide::from_heading(heading, twd);
        self.model
            .record_sample(twa_magnitude(heading, twd), tack, sog);
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Evaluator inputs for the current state.
    pub fn evaluation_input(&self) -> EvaluationInput {
        let settings = self.settings.snapshot();
        let state = self.state();
        let heading = state.effective_heading();
        EvaluationInput {
            heading_deg: heading,
            twd_deg: self.twd_for(heading, &settings),
            sog_mps: state.sog_mps,
        }
    }

    /// Full assessment for the current state, for diagnostics.
    pub fn assess_now(&self) -> Option<ManeuverAssessment> {
        let settings = self.settings.snapshot();
        self.evaluator.assess(self.evaluation_input(), &settings)
    }

    /// Run one evaluation tick and broadcast any recommendation.
    pub fn evaluate_now(&self, now: DateTime<Utc>) -> Option<ManeuverRecommendation> {
        let settings = self.settings.snapshot();
        let recommendation = self
            .evaluator
            .evaluate(self.evaluation_input(), &settings, now)?;

        let _ = self
            .events_tx
            .send(AdvisorEvent::Recommendation(recommendation.clone()));
        Some(recommendation)
    }

    /// VMG for the current state and wind, for display.
    pub fn current_vmg(&self) -> Option<f64> {
        let input = self.evaluation_input();
        Some(vmg(input.sog_mps?, input.heading_deg?, input.twd_deg?))
    }

    // =========================================================================
    // Alerts
    // =========================================================================

    /// Start periodic evaluation on `runtime`, replacing any running ticker.
    pub fn start_alerts(self: &Arc<Self>, runtime: &Handle) {
        let interval = self.settings.snapshot().eval_interval;
        let advisor = Arc::downgrade(self);
        let ticker = spawn_alert_ticker(runtime, interval, advisor.clone());

        let previous = self.alerts.lock().replace(AlertSchedule {
            ticker,
            runtime: runtime.clone(),
            advisor,
        });
        if let Some(previous) = previous {
            previous.ticker.stop();
        }
    }

    /// Stop periodic evaluation. Safe to call when alerts are not running.
    pub fn stop_alerts(&self) {
        if let Some(schedule) = self.alerts.lock().take() {
            schedule.ticker.stop();
        }
    }

    pub fn alerts_running(&self) -> bool {
        self.alerts
            .lock()
            .as_ref()
            .map(|s| s.ticker.is_running())
            .unwrap_or(false)
    }

    fn reschedule_alerts(&self, settings: &AdvisorSettings) {
        let mut alerts = self.alerts.lock();
        if let Some(schedule) = alerts.as_mut() {
            schedule.ticker.stop();
            schedule.ticker = spawn_alert_ticker(
                &schedule.runtime,
                settings.eval_interval,
                schedule.advisor.clone(),
            );
            info!(
                interval_secs = settings.eval_interval.as_secs(),
                "Evaluation interval changed; ticker restarted"
            );
        }
    }

    // =========================================================================
    // Waypoint
    // =========================================================================

    /// Store the current position as the start waypoint.
    ///
    /// Returns `false` if no position is known yet.
    pub fn set_start_waypoint(&self) -> bool {
        let Some(coordinate) = self.state().coordinate else {
            return false;
        };
        let mut waypoint = self.waypoint.lock();
        waypoint.set(coordinate);
        let info = waypoint.info_from(Some(coordinate));
        drop(waypoint);

        self.state_tx.send_modify(|state| *state = state.with_waypoint(info));
        true
    }

    pub fn start_waypoint(&self) -> Option<Coordinate> {
        self.waypoint.lock().get()
    }

    pub fn clear_start_waypoint(&self) {
        self.waypoint.lock().clear();
        self.state_tx.send_modify(|state| *state = state.with_waypoint(None));
    }
}

fn spawn_alert_ticker(
    runtime: &Handle,
    interval: std::time::Duration,
    advisor: Weak<Advisor>,
) -> TickerHandle {
    Ticker::start(runtime, interval, move || {
        if let Some(advisor) = advisor.upgrade() {
            advisor.evaluate_now(Utc::now());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HeadingReading;
    use chrono::TimeZone;

    fn fix_at(secs: i64, sog: f64, cog: f64) -> NavigationUpdate {
        NavigationUpdate::Fix(NavigationFix {
            coordinate: Some(Coordinate::new(50.0, -1.0)),
            sog_mps: Some(sog),
            cog_deg: Some(cog),
            timestamp: Some(Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ingestion
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_ingest_publishes_state() {
        let advisor = Advisor::with_defaults();
        let rx = advisor.watch_state();

        assert!(advisor.ingest(fix_at(0, 4.0, 30.0)));
        assert_eq!(rx.borrow().sog_mps, Some(4.0));
        assert_eq!(advisor.state().effective_heading(), Some(30.0));
    }

    #[test]
    fn test_fixes_are_rate_limited() {
        let advisor = Advisor::with_defaults();
        assert!(advisor.ingest(fix_at(0, 4.0, 30.0)));
        // 0.8 s default spacing; same second is dropped
        assert!(!advisor.ingest(fix_at(0, 9.0, 30.0)));
        assert_eq!(advisor.state().sog_mps, Some(4.0));
        assert!(advisor.ingest(fix_at(1, 5.0, 30.0)));
        assert_eq!(advisor.state().sog_mps, Some(5.0));
    }

    #[test]
    fn test_heading_updates_are_not_rate_limited() {
        let advisor = Advisor::with_defaults();
        let reading = HeadingReading {
            true_deg: 10.0,
            magnetic_deg: 8.0,
        };
        assert!(advisor.ingest(NavigationUpdate::Heading(reading)));
        assert!(advisor.ingest(NavigationUpdate::Heading(reading)));
    }

    #[test]
    fn test_samples_recorded_only_with_wind() {
        let advisor = Advisor::with_defaults();
        advisor.ingest(fix_at(0, 4.0, 30.0));
        assert_eq!(advisor.model().total_samples(), 0);

        advisor.set_wind(Some(WindInput::Direction(0.0)));
        advisor.ingest(fix_at(1, 4.0, 30.0));
        // Heading 30, wind 0: starboard tack at TWA 30
        assert_eq!(advisor.model().sample_count(30.0, TackSide::Starboard), 1);
    }

    #[test]
    fn test_unknown_speed_is_not_recorded() {
        let advisor = Advisor::with_defaults();
        advisor.set_wind(Some(WindInput::Direction(0.0)));
        advisor.ingest(fix_at(0, -1.0, 30.0));

        assert_eq!(advisor.state().sog_mps, None);
        assert_eq!(advisor.model().total_samples(), 0);
        assert!(advisor.current_vmg().is_none());
    }

    #[test]
    fn test_twa_input_uses_heading() {
        let advisor = Advisor::with_defaults();
        advisor.set_wind(Some(WindInput::Angle(40.0)));
        assert_eq!(advisor.twd(), None);

        advisor.ingest(fix_at(0, 4.0, 100.0));
        assert_eq!(advisor.twd(), Some(140.0));

        advisor.update_settings(|s| s.twa_positive_starboard = false);
        assert_eq!(advisor.twd(), Some(60.0));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Evaluation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_evaluate_now_broadcasts_recommendation() {
        let advisor = Advisor::with_defaults();
        let mut events = advisor.subscribe();
        advisor.set_wind(Some(WindInput::Direction(10.0)));
        advisor.model().record_sample(80.0, TackSide::Starboard, 40.0);
        advisor.ingest(fix_at(0, 5.0, 0.0));

        let now = Utc::now();
        let rec = advisor.evaluate_now(now).unwrap();
        assert_eq!(rec.message, "Tack now →");

        // State change first, then the recommendation
        assert!(matches!(events.try_recv(), Ok(AdvisorEvent::StateChanged(_))));
        match events.try_recv() {
            Ok(AdvisorEvent::Recommendation(r)) => assert_eq!(r, rec),
            other => panic!("expected recommendation, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_without_wind_is_silent() {
        let advisor = Advisor::with_defaults();
        advisor.ingest(fix_at(0, 5.0, 0.0));
        assert!(advisor.evaluate_now(Utc::now()).is_none());
        assert!(advisor.assess_now().is_none());
    }

    #[test]
    fn test_current_vmg() {
        let advisor = Advisor::with_defaults();
        advisor.set_wind(Some(WindInput::Direction(0.0)));
        advisor.ingest(fix_at(0, 4.0, 180.0));
        assert!((advisor.current_vmg().unwrap() + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_settings_reach_model() {
        let advisor = Advisor::with_defaults();
        advisor.update_settings(|s| s.set_bin_width_deg(10.0));
        assert_eq!(advisor.model().bin_width_deg(), 10.0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Waypoint
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_waypoint_requires_position() {
        let advisor = Advisor::with_defaults();
        assert!(!advisor.set_start_waypoint());

        advisor.ingest(fix_at(0, 4.0, 0.0));
        assert!(advisor.set_start_waypoint());
        assert_eq!(advisor.start_waypoint(), Some(Coordinate::new(50.0, -1.0)));
        let info = advisor.state().waypoint.unwrap();
        assert!(info.distance_m.abs() < 1e-6);

        advisor.ingest(NavigationUpdate::Fix(NavigationFix {
            coordinate: Some(Coordinate::new(50.01, -1.0)),
            sog_mps: Some(4.0),
            cog_deg: Some(180.0),
            timestamp: Some(Utc.timestamp_opt(1_700_000_010, 0).unwrap()),
        }));
        let info = advisor.state().waypoint.unwrap();
        assert!((info.distance_m - 1111.95).abs() < 1.0);
        assert!((info.bearing_deg - 180.0).abs() < 1e-6);

        advisor.clear_start_waypoint();
        assert!(advisor.state().waypoint.is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Alerts
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_alerts_tick_and_stop() {
        let advisor = Arc::new(Advisor::new(
            AdvisorSettings::default().with_eval_interval_secs(10),
        ));
        advisor.set_wind(Some(WindInput::Direction(10.0)));
        advisor.model().record_sample(80.0, TackSide::Starboard, 40.0);
        advisor.ingest(fix_at(0, 5.0, 0.0));

        let mut events = advisor.subscribe();
        advisor.start_alerts(&Handle::current());
        assert!(advisor.alerts_running());

        tokio::time::sleep(std::time::Duration::from_secs(25)).await;
        let mut count = 0;
        while let Ok(event) = events.try_recv() {
            if event.as_recommendation().is_some() {
                count += 1;
            }
        }
        assert_eq!(count, 2);

        advisor.stop_alerts();
        advisor.stop_alerts();
        assert!(!advisor.alerts_running());

        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_change_restarts_ticker() {
        let advisor = Arc::new(Advisor::new(
            AdvisorSettings::default().with_eval_interval_secs(10),
        ));
        advisor.set_wind(Some(WindInput::Direction(10.0)));
        advisor.model().record_sample(80.0, TackSide::Starboard, 40.0);
        advisor.ingest(fix_at(0, 5.0, 0.0));

        let mut events = advisor.subscribe();
        advisor.start_alerts(&Handle::current());

        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        advisor.update_settings(|s| s.set_eval_interval_secs(20));

        // Old cadence would fire at 10s; new one at 25s
        tokio::time::sleep(std::time::Duration::from_secs(15)).await;
        assert!(events.try_recv().is_err());

        tokio::time::sleep(std::time::Duration::from_secs(6)).await;
        assert!(events
            .try_recv()
            .ok()
            .and_then(|e| e.as_recommendation().cloned())
            .is_some());
        assert!(advisor.alerts_running());
    }

    #[tokio::test]
    async fn test_run_until_channel_closes() {
        let advisor = Arc::new(Advisor::with_defaults());
        let (tx, rx) = mpsc::channel(8);

        let task = tokio::spawn({
            let advisor = Arc::clone(&advisor);
            async move { advisor.run(rx, CancellationToken::new()).await }
        });

        tx.send(fix_at(0, 3.0, 90.0)).await.unwrap();
        tx.send(fix_at(5, 6.0, 90.0)).await.unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(advisor.state().sog_mps, Some(6.0));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let advisor = Arc::new(Advisor::with_defaults());
        let (_tx, rx) = mpsc::channel::<NavigationUpdate>(8);
        let shutdown = CancellationToken::new();

        let task = tokio::spawn({
            let advisor = Arc::clone(&advisor);
            let shutdown = shutdown.clone();
            async move { advisor.run(rx, shutdown).await }
        });

        shutdown.cancel();
        task.await.unwrap();
    }
}
