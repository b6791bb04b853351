//! In-memory alert state store
//!
//! Mirrors what a UI state layer keeps about alerts: the last price alert
//! per asset, the last weather alert per location, and a short history.

use super::{AlertRecorder, SinkResult};
use crate::domain::{AlertCategory, AlertEvent};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Shared store accessible by the engine and readers
pub type SharedAlertStore = Arc<AlertStore>;

const DEFAULT_HISTORY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherAlertEntry {
    pub category: AlertCategory,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    last_price_alert: HashMap<String, DateTime<Utc>>,
    last_weather_alert: HashMap<String, WeatherAlertEntry>,
    history: VecDeque<AlertEvent>,
}

#[derive(Debug)]
pub struct AlertStore {
    state: RwLock<StoreState>,
    capacity: usize,
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn shared() -> SharedAlertStore {
        Arc::new(Self::new())
    }

    pub fn last_price_alert(&self, asset_id: &str) -> Option<DateTime<Utc>> {
        self.state.read().last_price_alert.get(asset_id).copied()
    }

    pub fn last_weather_alert(&self, location: &str) -> Option<WeatherAlertEntry> {
        self.state.read().last_weather_alert.get(location).copied()
    }

    /// Most recent events first
    pub fn recent(&self, limit: usize) -> Vec<AlertEvent> {
        self.state.read().history.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().history.is_empty()
    }
}

impl AlertRecorder for AlertStore {
    fn record(&self, event: AlertEvent) -> SinkResult<()> {
        let mut state = self.state.write();

        if event.category.is_weather() {
            state.last_weather_alert.insert(
                event.subject.clone(),
                WeatherAlertEntry {
                    category: event.category,
                    time: event.timestamp,
                },
            );
        } else {
            state
                .last_price_alert
                .insert(event.subject.clone(), event.timestamp);
        }

        state.history.push_back(event);
        if state.history.len() > self.capacity {
            state.history.pop_front();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(subject: &str, category: AlertCategory, at: DateTime<Utc>) -> AlertEvent {
        AlertEvent {
            subject: subject.to_string(),
            category,
            title: format!("{} alert", subject),
            message: String::new(),
            magnitude: 0.0,
            timestamp: at,
        }
    }

    #[test]
    fn test_tracks_last_alerts_per_family() {
        let store = AlertStore::new();
        let now = Utc::now();

        store.record(event("bitcoin", AlertCategory::PriceAlert, now)).unwrap();
        store.record(event("London", AlertCategory::Rain, now)).unwrap();
        store
            .record(event("London", AlertCategory::ExtremeHeat, now + Duration::seconds(5)))
            .unwrap();

        assert_eq!(store.last_price_alert("bitcoin"), Some(now));
        assert_eq!(store.last_price_alert("London"), None);

        let weather = store.last_weather_alert("London").unwrap();
        assert_eq!(weather.category, AlertCategory::ExtremeHeat);
        assert_eq!(weather.time, now + Duration::seconds(5));
    }

    #[test]
    fn test_history_is_bounded() {
        let store = AlertStore::with_capacity(3);
        let now = Utc::now();

        for i in 0..5 {
            store
                .record(event(&format!("asset-{}", i), AlertCategory::PriceAlert, now))
                .unwrap();
        }

        assert_eq!(store.len(), 3);
        let recent = store.recent(10);
        assert_eq!(recent[0].subject, "asset-4");
        assert_eq!(recent[2].subject, "asset-2");
    }
}
