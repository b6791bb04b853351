//! Alert taxonomy and emitted alert events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed alert taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCategory {
    PriceAlert,
    ExtremeHeat,
    Freezing,
    Thunderstorm,
    Rain,
    Snow,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAlert => "price-alert",
            Self::ExtremeHeat => "extreme-heat",
            Self::Freezing => "freezing",
            Self::Thunderstorm => "thunderstorm",
            Self::Rain => "rain",
            Self::Snow => "snow",
        }
    }

    pub fn is_weather(&self) -> bool {
        !matches!(self, Self::PriceAlert)
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dedup key: one subject (asset id or location) per category
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertKey {
    pub subject: String,
    pub category: AlertCategory,
}

impl AlertKey {
    pub fn new(subject: impl Into<String>, category: AlertCategory) -> Self {
        Self {
            subject: subject.into(),
            category,
        }
    }
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.subject, self.category)
    }
}

/// A fired alert, handed to the sink and recorder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Asset id or location name
    pub subject: String,

    pub category: AlertCategory,

    /// Notification heading
    pub title: String,

    pub message: String,

    /// Absolute percentage change, temperature, or condition code
    pub magnitude: f64,

    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    pub fn key(&self) -> AlertKey {
        AlertKey::new(self.subject.clone(), self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names() {
        assert_eq!(AlertCategory::PriceAlert.as_str(), "price-alert");
        assert_eq!(AlertCategory::ExtremeHeat.to_string(), "extreme-heat");
        assert!(!AlertCategory::PriceAlert.is_weather());
        assert!(AlertCategory::Snow.is_weather());
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        let json = serde_json::to_string(&AlertCategory::ExtremeHeat).unwrap();
        assert_eq!(json, "\"extreme-heat\"");
    }

    #[test]
    fn test_keys_do_not_collide_across_categories() {
        // "london-rain" as a subject must not alias ("london", Rain)
        let a = AlertKey::new("london-rain", AlertCategory::PriceAlert);
        let b = AlertKey::new("london", AlertCategory::Rain);
        assert_ne!(a, b);
    }
}
