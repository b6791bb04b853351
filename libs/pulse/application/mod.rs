//! Application Layer
//!
//! Contains the monitor engine and the facade binaries use to wire it.
//! This layer depends on domain and infrastructure layers.

pub mod facade;
pub mod monitor;

// Re-export application facade for binaries
pub use facade::{init_logging_with_level, MonitorApp};

pub use monitor::{
    AlertDispatcher, EngineStats, MonitorEngine, MonitorEngineBuilder, MonitorError,
    MonitorResult, TickReport,
};
