//! Alert cooldown ledger
//!
//! Remembers when each (subject, category) key last fired. Entries are
//! overwritten on every fire and never evicted.

use super::alert::AlertKey;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct AlertLedger {
    last_fired: HashMap<AlertKey, DateTime<Utc>>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `key` has never fired or its last fire is strictly older
    /// than `cooldown` at `now`.
    pub fn is_ready(&self, key: &AlertKey, now: DateTime<Utc>, cooldown: Duration) -> bool {
        match self.last_fired.get(key) {
            Some(last) => now - *last > cooldown,
            None => true,
        }
    }

    /// Check the cooldown and, if ready, record `now` as the last fire.
    ///
    /// Returns whether the caller may emit.
    pub fn try_fire(&mut self, key: AlertKey, now: DateTime<Utc>, cooldown: Duration) -> bool {
        if !self.is_ready(&key, now, cooldown) {
            return false;
        }
        self.last_fired.insert(key, now);
        true
    }

    pub fn last_fired(&self, key: &AlertKey) -> Option<DateTime<Utc>> {
        self.last_fired.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}
