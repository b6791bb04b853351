//! Application Facade
//!
//! Public API for binaries (presentation layer).
//! Wires upstream clients, sinks and the engine from a [`MonitorConfig`].

use super::monitor::{MonitorEngine, MonitorResult};
use crate::domain::AlertEvent;
use crate::infrastructure::{
    init_tracing_with_level, AlertStore, ChannelSink, CoinGeckoClient, Heartbeat, MonitorConfig,
    OpenWeatherClient, SharedAlertStore, ShutdownManager,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Pending notifications before the channel sink starts rejecting
const NOTIFICATION_BUFFER: usize = 64;

/// Application facade for the monitor service
pub struct MonitorApp {
    pub engine: MonitorEngine,
    pub store: SharedAlertStore,
    pub shutdown: ShutdownManager,
    pub heartbeat: Heartbeat,
    notifications: Option<mpsc::Receiver<AlertEvent>>,
}

impl MonitorApp {
    /// Build clients and engine from configuration
    pub fn new(config: MonitorConfig) -> MonitorResult<Self> {
        let timeout = config.request_timeout();
        let heartbeat = Heartbeat::new(config.heartbeat_interval_secs);
        let store = AlertStore::shared();
        let (sink, notifications) = ChannelSink::channel(NOTIFICATION_BUFFER);

        let mut builder = MonitorEngine::builder(config.clone())
            .sink(Arc::new(sink))
            .recorder(store.clone());

        if config.coingecko.enabled {
            let client = CoinGeckoClient::new(&config.coingecko.base_url, timeout)?;
            builder = builder.price_source(Arc::new(client));
        } else {
            info!("Live prices disabled, running on simulated prices");
        }

        if !config.locations.is_empty() {
            match config.openweather_api_key() {
                Ok(api_key) => {
                    let client =
                        OpenWeatherClient::new(&config.openweather.base_url, api_key, timeout)?;
                    builder = builder.weather_source(Arc::new(client));
                }
                Err(e) => warn!("Weather alerts disabled: {}", e),
            }
        }

        Ok(Self {
            engine: builder.build()?,
            store,
            shutdown: ShutdownManager::new(),
            heartbeat,
            notifications: Some(notifications),
        })
    }

    /// Spawn the task that turns channel notifications into log lines.
    ///
    /// Returns `None` if it was already spawned.
    pub fn spawn_notification_logger(&mut self) -> Option<JoinHandle<()>> {
        let mut notifications = self.notifications.take()?;
        Some(tokio::spawn(async move {
            while let Some(event) = notifications.recv().await {
                info!("🔔 {}: {}", event.title, event.message);
            }
        }))
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Log engine counters if the heartbeat interval has elapsed
    pub async fn heartbeat(&mut self) {
        if !self.heartbeat.poll() {
            return;
        }

        let stats = self.engine.stats().await;
        info!(
            "Heartbeat: {} ticks, {} alerts, {} price fallbacks, {} weather failures",
            stats.ticks, stats.alerts_emitted, stats.price_fallbacks, stats.weather_failures
        );
    }
}

/// Initialize logging with a specific level
pub fn init_logging_with_level(level: &str) {
    init_tracing_with_level(level);
}
