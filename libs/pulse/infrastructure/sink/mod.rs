//! Alert destinations
//!
//! Two independent capabilities: an [`AlertSink`] shows the alert to a
//! user (notification, push channel), an [`AlertRecorder`] keeps state
//! about fired alerts. The engine tolerates failures of either.

pub mod channel;
pub mod store;

use crate::domain::AlertEvent;
use thiserror::Error;

pub use channel::ChannelSink;
pub use store::{AlertStore, SharedAlertStore, WeatherAlertEntry};

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Alert channel closed")]
    ChannelClosed,

    #[error("Alert channel full")]
    ChannelFull,

    #[error("Alert rejected: {0}")]
    Rejected(String),
}

pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// User-visible notification capability
pub trait AlertSink: Send + Sync {
    fn notify(&self, event: &AlertEvent) -> SinkResult<()>;

    /// Ask the platform for permission to show notifications.
    ///
    /// Returns whether permission is granted. The default sink needs none.
    fn request_permission(&self) -> SinkResult<bool> {
        Ok(true)
    }
}

/// State-store echo of fired alerts
pub trait AlertRecorder: Send + Sync {
    fn record(&self, event: AlertEvent) -> SinkResult<()>;
}
