use super::types::CurrentWeather;
use crate::domain::LocationSnapshot;
use crate::infrastructure::client::{
    build_http_client, check_status, SourceError, SourceResult, WeatherSource,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// OpenWeather current conditions client
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> SourceResult<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: build_http_client(timeout)?,
        })
    }

    /// Fetch current conditions in metric units
    pub async fn get_current(&self, location: &str) -> SourceResult<CurrentWeather> {
        let url = format!("{}/weather", self.base_url);

        debug!("GET {} for {}", url, location);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| SourceError::Deserialize(e.to_string()))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    fn name(&self) -> &str {
        "openweather"
    }

    async fn fetch_current(&self, location: &str) -> SourceResult<LocationSnapshot> {
        let weather = self.get_current(location).await?;
        Ok(weather.into_snapshot(location))
    }
}
