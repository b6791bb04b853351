//! Snapshot models for tracked assets and locations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked financial instrument at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// Upstream identifier (e.g. "bitcoin"), unique across the tracked set
    pub id: String,

    /// Display name (e.g. "Bitcoin")
    pub name: String,

    /// Ticker symbol (e.g. "BTC")
    pub symbol: String,

    /// Current price in USD
    pub current_price: f64,

    /// 24h percentage change
    pub price_change_24h: f64,

    /// When this snapshot was produced
    pub updated_at: DateTime<Utc>,
}

impl AssetSnapshot {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        current_price: f64,
        price_change_24h: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            current_price,
            price_change_24h,
            updated_at: Utc::now(),
        }
    }

    /// A snapshot is usable for evaluation only with a positive, finite price
    /// and a finite change figure.
    pub fn is_valid(&self) -> bool {
        self.current_price.is_finite()
            && self.current_price > 0.0
            && self.price_change_24h.is_finite()
    }
}

/// One tracked geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    /// Canonical location name (e.g. "London")
    pub id: String,

    /// Temperature in degrees Celsius, `None` if no reading yet
    pub temperature: Option<f64>,

    /// Condition code from the upstream classification scheme
    pub condition_code: Option<u16>,

    /// Human readable condition (e.g. "light rain")
    pub description: String,

    pub observed_at: DateTime<Utc>,
}

impl LocationSnapshot {
    pub fn new(
        id: impl Into<String>,
        temperature: Option<f64>,
        condition_code: Option<u16>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            temperature,
            condition_code,
            description: description.into(),
            observed_at: Utc::now(),
        }
    }

    /// Weather family for the current condition code, if any
    pub fn condition_family(&self) -> Option<ConditionFamily> {
        self.condition_code.map(ConditionFamily::from_code)
    }
}

/// Weather families as denoted by contiguous ranges of condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionFamily {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
    Unknown,
}

impl ConditionFamily {
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Atmosphere,
            800 => Self::Clear,
            801..=899 => Self::Clouds,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Atmosphere => "Atmosphere",
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Unknown => "Unknown",
        }
    }
}
