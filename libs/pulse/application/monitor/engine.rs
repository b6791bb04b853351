//! Monitor engine
//!
//! Owns one refresh loop. Every tick refreshes prices and evaluates the
//! price rule; weather is checked on its own, slower cadence. Failures in
//! one step are logged and never stop the other step or the loop.

use super::dispatch::AlertDispatcher;
use super::price_feed::{PriceFeed, PriceRefresh};
use super::rules::{PriceRule, WeatherRule};
use super::MonitorResult;
use crate::domain::{AlertEvent, AlertKey, AlertLedger, AssetSnapshot, LocationSnapshot};
use crate::infrastructure::{AlertRecorder, AlertSink, MonitorConfig, PriceSource, WeatherSource};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Cumulative engine counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub ticks: u64,
    pub alerts_emitted: u64,
    pub price_fallbacks: u64,
    pub weather_failures: u64,
}

/// What a single tick produced
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub alerts: Vec<AlertEvent>,
    pub price: Option<PriceRefresh>,
    pub weather_checked: bool,
}

struct EngineState {
    assets: BTreeMap<String, AssetSnapshot>,
    locations: BTreeMap<String, LocationSnapshot>,
    ledger: AlertLedger,
    last_weather_check: Option<DateTime<Utc>>,
    price_feed: PriceFeed,
    stats: EngineStats,
}

struct EngineInner {
    config: MonitorConfig,
    price_rule: PriceRule,
    weather_rule: WeatherRule,
    weather_source: Option<Arc<dyn WeatherSource>>,
    dispatcher: AlertDispatcher,
    // Held for a whole tick so ticks never interleave
    state: tokio::sync::Mutex<EngineState>,
}

struct RunningLoop {
    handle: JoinHandle<()>,
    stop_tx: oneshot::Sender<()>,
}

pub struct MonitorEngine {
    inner: Arc<EngineInner>,
    running: Mutex<Option<RunningLoop>>,
}

pub struct MonitorEngineBuilder {
    config: MonitorConfig,
    price_source: Option<Arc<dyn PriceSource>>,
    weather_source: Option<Arc<dyn WeatherSource>>,
    sink: Option<Arc<dyn AlertSink>>,
    recorder: Option<Arc<dyn AlertRecorder>>,
    rng_seed: Option<u64>,
}

impl MonitorEngineBuilder {
    /// Live price feed; without one, prices are simulated
    pub fn price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.price_source = Some(source);
        self
    }

    pub fn weather_source(mut self, source: Arc<dyn WeatherSource>) -> Self {
        self.weather_source = Some(source);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn recorder(mut self, recorder: Arc<dyn AlertRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Seed the price simulation for reproducible runs
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> MonitorResult<MonitorEngine> {
        self.config.validate()?;

        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let inner = EngineInner {
            price_rule: PriceRule::new(self.config.alert_threshold, self.config.alert_cooldown()),
            weather_rule: WeatherRule::new(self.config.alert_cooldown()),
            weather_source: self.weather_source,
            dispatcher: AlertDispatcher::new(self.sink, self.recorder),
            state: tokio::sync::Mutex::new(EngineState {
                assets: BTreeMap::new(),
                locations: BTreeMap::new(),
                ledger: AlertLedger::new(),
                last_weather_check: None,
                price_feed: PriceFeed::new(self.price_source, rng),
                stats: EngineStats::default(),
            }),
            config: self.config,
        };

        Ok(MonitorEngine {
            inner: Arc::new(inner),
            running: Mutex::new(None),
        })
    }
}

impl MonitorEngine {
    pub fn builder(config: MonitorConfig) -> MonitorEngineBuilder {
        MonitorEngineBuilder {
            config,
            price_source: None,
            weather_source: None,
            sink: None,
            recorder: None,
            rng_seed: None,
        }
    }

    /// Start the refresh loop.
    ///
    /// Runs one refresh immediately and returns once it has completed.
    /// Returns `false` without doing anything if the loop is already running.
    pub async fn start(&self) -> bool {
        let ready = {
            let mut running = self.running.lock();
            if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
                debug!("Monitor engine already running");
                return false;
            }

            let (stop_tx, stop_rx) = oneshot::channel();
            let (ready_tx, ready_rx) = oneshot::channel();
            let handle = tokio::spawn(run_loop(Arc::clone(&self.inner), stop_rx, ready_tx));
            *running = Some(RunningLoop { handle, stop_tx });
            ready_rx
        };

        info!(
            "Monitor engine started (update every {} ms, weather every {} ms)",
            self.inner.config.update_interval_ms, self.inner.config.weather_check_interval_ms
        );

        let _ = ready.await;
        true
    }

    /// Stop the refresh loop. A tick already in flight runs to completion.
    ///
    /// Returns `false` if the loop was not running.
    pub fn stop(&self) -> bool {
        match self.running.lock().take() {
            Some(running) => {
                let _ = running.stop_tx.send(());
                info!("Monitor engine stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// Forward a permission request to the sink; never retried
    pub fn request_notification_permission(&self) -> bool {
        self.inner.dispatcher.request_permission()
    }

    /// Run one tick at `now`, independent of the loop
    pub async fn run_tick(&self, now: DateTime<Utc>) -> TickReport {
        self.inner.tick(now).await
    }

    pub async fn assets(&self) -> Vec<AssetSnapshot> {
        self.inner.state.lock().await.assets.values().cloned().collect()
    }

    pub async fn locations(&self) -> Vec<LocationSnapshot> {
        self.inner.state.lock().await.locations.values().cloned().collect()
    }

    pub async fn stats(&self) -> EngineStats {
        self.inner.state.lock().await.stats
    }

    pub async fn last_fired(&self, key: &AlertKey) -> Option<DateTime<Utc>> {
        self.inner.state.lock().await.ledger.last_fired(key)
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }
}

impl Drop for MonitorEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop(
    inner: Arc<EngineInner>,
    mut stop_rx: oneshot::Receiver<()>,
    ready_tx: oneshot::Sender<()>,
) {
    // Anchored before the first refresh; its duration does not shift later ticks
    let period = inner.config.update_interval();
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    inner.tick(Utc::now()).await;
    let _ = ready_tx.send(());

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = interval.tick() => {
                inner.tick(Utc::now()).await;
            }
        }
    }

    debug!("Monitor loop exited");
}

impl EngineInner {
    async fn tick(&self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();
        let mut state = self.state.lock().await;
        state.stats.ticks += 1;

        match self.refresh_prices(&mut state, now).await {
            Ok((refresh, events)) => {
                report.price = Some(refresh);
                report.alerts.extend(events);
            }
            Err(e) => error!("Error updating prices: {}", e),
        }

        if self.weather_due(&state, now) {
            // Recorded before evaluating so a slow check cannot re-trigger
            state.last_weather_check = Some(now);
            report.weather_checked = true;
            let events = self.check_weather(&mut state, now).await;
            report.alerts.extend(events);
        }

        state.stats.alerts_emitted += report.alerts.len() as u64;
        drop(state);

        for event in &report.alerts {
            self.dispatcher.dispatch(event.clone());
        }

        report
    }

    async fn refresh_prices(
        &self,
        state: &mut EngineState,
        now: DateTime<Utc>,
    ) -> MonitorResult<(PriceRefresh, Vec<AlertEvent>)> {
        let EngineState {
            assets,
            ledger,
            price_feed,
            stats,
            ..
        } = state;

        let refresh = price_feed.refresh(&self.config.assets, assets, now).await;
        stats.price_fallbacks = price_feed.fallbacks();
        let refresh = refresh?;

        let tracked = self
            .config
            .assets
            .iter()
            .filter_map(|id| assets.get(id));
        let events = self.price_rule.evaluate(tracked, ledger, now);

        Ok((refresh, events))
    }

    fn weather_due(&self, state: &EngineState, now: DateTime<Utc>) -> bool {
        match state.last_weather_check {
            Some(last) => now - last >= self.config.weather_check_interval(),
            None => true,
        }
    }

    async fn check_weather(&self, state: &mut EngineState, now: DateTime<Utc>) -> Vec<AlertEvent> {
        let Some(source) = &self.weather_source else {
            if !self.config.locations.is_empty() {
                debug!("No weather source configured, skipping weather check");
            }
            return Vec::new();
        };

        let mut events = Vec::new();

        for location in &self.config.locations {
            let snapshot = match source.fetch_current(location).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Weather fetch for {} failed, skipping: {}", location, e);
                    state.stats.weather_failures += 1;
                    continue;
                }
            };

            events.extend(self.weather_rule.evaluate(&snapshot, &mut state.ledger, now));
            state.locations.insert(location.clone(), snapshot);
        }

        events
    }
}
