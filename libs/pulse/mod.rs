//! Pulse market and weather monitor
//!
//! Periodically refreshes crypto prices and weather conditions, evaluates
//! threshold rules and emits deduplicated alerts.
//!
//! ## Architecture
//!
//! - **domain**: snapshots, alert taxonomy, cooldown ledger
//! - **application**: the monitor engine and the facade for binaries
//! - **infrastructure**: upstream clients, sinks, config, logging

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::{MonitorApp, MonitorEngine, MonitorError, MonitorResult, TickReport};
pub use domain::{AlertCategory, AlertEvent, AlertKey, AssetSnapshot, LocationSnapshot};
pub use infrastructure::{
    init_tracing, AlertRecorder, AlertSink, AlertStore, ChannelSink, CoinGeckoClient,
    MonitorConfig, OpenWeatherClient, PriceSource, SourceError, WeatherSource,
};
