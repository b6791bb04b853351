//! Pulse Monitor - Main Library
//!
//! Root crate for the monitor binary. Business logic lives in the `pulse`
//! workspace library.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI)
//! - **pulse**: Monitor engine, clients and sinks (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use pulsewatch::bin_common::{load_config_from_env, ConfigType};
//! use pulsewatch::pulse::application::MonitorApp;
//! ```

// Re-export workspace libraries for convenience
pub use pulse;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config_from_env, ConfigType};
}
