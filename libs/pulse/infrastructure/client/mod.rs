//! Upstream data sources
//!
//! The engine only sees the [`PriceSource`] and [`WeatherSource`] traits;
//! the concrete clients live in submodules.

pub mod coingecko;
pub mod openweather;

use crate::domain::{AssetSnapshot, LocationSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Deserialization failed: {0}")]
    Deserialize(String),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Supplies current market data per tracked asset
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Name for logging
    fn name(&self) -> &str;

    /// Fetch snapshots for the given ids. Ids unknown upstream are simply
    /// absent from the returned map.
    async fn fetch_markets(&self, ids: &[String]) -> SourceResult<HashMap<String, AssetSnapshot>>;
}

/// Supplies current conditions per tracked location
#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_current(&self, location: &str) -> SourceResult<LocationSnapshot>;
}

/// Build a reqwest client, applying the optional request timeout
pub(crate) fn build_http_client(timeout: Option<Duration>) -> SourceResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Map a non-success response to a [`SourceError`]
pub(crate) async fn check_status(response: reqwest::Response) -> SourceResult<reqwest::Response> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::RateLimited);
    }

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(SourceError::Api(format!("{}: {}", status, error_text)));
    }

    Ok(response)
}
