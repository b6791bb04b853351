//! Domain Layer
//!
//! Snapshot models, alert taxonomy and the cooldown ledger.
//! No I/O and no dependency on the other layers.

pub mod alert;
pub mod ledger;
pub mod models;

pub use alert::{AlertCategory, AlertEvent, AlertKey};
pub use ledger::AlertLedger;
pub use models::{AssetSnapshot, ConditionFamily, LocationSnapshot};
