//! Infrastructure Layer
//!
//! Contains implementations of external interfaces (API clients, alert
//! sinks, config, logging). Depends on the domain layer only.

pub mod client;
pub mod config;
pub mod heartbeat;
pub mod logging;
pub mod shutdown;
pub mod sink;

// Re-export commonly used types from client
pub use client::{
    coingecko::CoinGeckoClient, openweather::OpenWeatherClient, PriceSource, SourceError,
    SourceResult, WeatherSource,
};

// Re-export sink types
pub use sink::{AlertRecorder, AlertSink, AlertStore, ChannelSink, SharedAlertStore, SinkError};

// Re-export config types
pub use config::{ConfigError, MonitorConfig};

// Re-export infrastructure services
pub use heartbeat::Heartbeat;
pub use logging::{init_tracing, init_tracing_with_level};
pub use shutdown::ShutdownManager;
