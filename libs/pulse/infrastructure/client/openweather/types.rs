use crate::domain::LocationSnapshot;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Response of `GET /weather` (metric units); only the fields the monitor reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<MainReading>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub dt: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReading {
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub id: Option<u16>,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
}

impl CurrentWeather {
    /// Convert to a snapshot keyed by the requested location name
    pub fn into_snapshot(self, location: &str) -> LocationSnapshot {
        let temperature = self.main.and_then(|main| main.temp);
        let (condition_code, description) = match self.weather.into_iter().next() {
            Some(condition) => (condition.id, condition.description),
            None => (None, String::new()),
        };

        LocationSnapshot {
            id: location.to_string(),
            temperature,
            condition_code,
            description,
            observed_at: Utc::now(),
        }
    }
}
