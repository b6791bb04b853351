//! Monitoring and alert-deduplication engine

pub mod dispatch;
pub mod engine;
pub mod price_feed;
pub mod rules;

use crate::infrastructure::{ConfigError, SourceError};
use thiserror::Error;

pub use dispatch::AlertDispatcher;
pub use engine::{EngineStats, MonitorEngine, MonitorEngineBuilder, TickReport};
pub use price_feed::{smoothed_change, PriceFeed, PriceRefresh};
pub use rules::{PriceRule, WeatherRule};

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("No price data available for any tracked asset")]
    NoPriceData,

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
