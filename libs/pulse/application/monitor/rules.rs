//! Alert rules
//!
//! Each rule checks its condition, then consults the cooldown ledger with
//! its own key before producing an [`AlertEvent`].

use crate::domain::{AlertCategory, AlertEvent, AlertKey, AlertLedger, AssetSnapshot, ConditionFamily, LocationSnapshot};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

/// Strictly above this temperature (°C) is extreme heat
pub const EXTREME_HEAT_CELSIUS: f64 = 35.0;

/// Strictly below this temperature (°C) is freezing
pub const FREEZING_CELSIUS: f64 = 0.0;

/// Fires when an asset's absolute 24h change reaches the threshold
#[derive(Debug, Clone)]
pub struct PriceRule {
    pub threshold: f64,
    pub cooldown: Duration,
}

impl PriceRule {
    pub fn new(threshold: f64, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
        }
    }

    pub fn evaluate<'a>(
        &self,
        assets: impl IntoIterator<Item = &'a AssetSnapshot>,
        ledger: &mut AlertLedger,
        now: DateTime<Utc>,
    ) -> Vec<AlertEvent> {
        let mut events = Vec::new();

        for asset in assets {
            if !asset.is_valid() {
                debug!(asset = %asset.id, "Skipping asset without usable data");
                continue;
            }

            let change = asset.price_change_24h;
            if change.abs() < self.threshold {
                continue;
            }

            let key = AlertKey::new(asset.id.clone(), AlertCategory::PriceAlert);
            if !ledger.try_fire(key, now, self.cooldown) {
                debug!(asset = %asset.id, "Alert suppressed (cooldown)");
                continue;
            }

            let direction = if change > 0.0 { "up" } else { "down" };
            info!("Alert: {} price changed by {:.2}%", asset.name, change);

            events.push(AlertEvent {
                subject: asset.id.clone(),
                category: AlertCategory::PriceAlert,
                title: format!("{} Price Alert", asset.name),
                message: format!(
                    "{} price is {} by {:.2}%",
                    asset.name,
                    direction,
                    change.abs()
                ),
                magnitude: change.abs(),
                timestamp: now,
            });
        }

        events
    }
}

/// Temperature and condition-code alerts for one location
#[derive(Debug, Clone)]
pub struct WeatherRule {
    pub cooldown: Duration,
}

impl WeatherRule {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Evaluate both rule families; each may fire independently.
    ///
    /// A location without both a temperature and a condition code has no
    /// current reading and is skipped.
    pub fn evaluate(
        &self,
        location: &LocationSnapshot,
        ledger: &mut AlertLedger,
        now: DateTime<Utc>,
    ) -> Vec<AlertEvent> {
        if location.temperature.is_none() || location.condition_code.is_none() {
            debug!(location = %location.id, "Skipping location without a current reading");
            return Vec::new();
        }

        [
            temperature_alert(location),
            condition_alert(location),
        ]
        .into_iter()
        .flatten()
        .filter_map(|(category, message, magnitude)| {
            let key = AlertKey::new(location.id.clone(), category);
            if !ledger.try_fire(key, now, self.cooldown) {
                debug!(location = %location.id, %category, "Alert suppressed (cooldown)");
                return None;
            }

            info!("Weather Alert: {}", message);

            Some(AlertEvent {
                subject: location.id.clone(),
                category,
                title: format!("Weather Alert for {}", location.id),
                message,
                magnitude,
                timestamp: now,
            })
        })
        .collect()
    }
}

fn temperature_alert(location: &LocationSnapshot) -> Option<(AlertCategory, String, f64)> {
    let temp = location.temperature.filter(|t| t.is_finite())?;

    if temp > EXTREME_HEAT_CELSIUS {
        Some((
            AlertCategory::ExtremeHeat,
            format!("Extreme heat in {}: {}°C", location.id, temp.round()),
            temp,
        ))
    } else if temp < FREEZING_CELSIUS {
        Some((
            AlertCategory::Freezing,
            format!("Freezing temperature in {}: {}°C", location.id, temp.round()),
            temp,
        ))
    } else {
        None
    }
}

fn condition_alert(location: &LocationSnapshot) -> Option<(AlertCategory, String, f64)> {
    let code = location.condition_code?;

    let family = ConditionFamily::from_code(code);
    let category = match family {
        ConditionFamily::Thunderstorm => AlertCategory::Thunderstorm,
        ConditionFamily::Rain => AlertCategory::Rain,
        ConditionFamily::Snow => AlertCategory::Snow,
        _ => return None,
    };

    Some((
        category,
        format!("{} in {}: {}", family.label(), location.id, location.description),
        f64::from(code),
    ))
}
