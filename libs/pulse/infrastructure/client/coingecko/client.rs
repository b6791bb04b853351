use super::types::CoinMarket;
use crate::domain::AssetSnapshot;
use crate::infrastructure::client::{
    build_http_client, check_status, PriceSource, SourceError, SourceResult,
};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// CoinGecko markets API client
pub struct CoinGeckoClient {
    base_url: String,
    client: Client,
}

impl CoinGeckoClient {
    /// Create new CoinGecko client
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> SourceResult<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_http_client(timeout)?,
        })
    }

    /// Fetch one page of market entries for the given ids
    pub async fn get_markets(&self, ids: &[String]) -> SourceResult<Vec<CoinMarket>> {
        let url = format!("{}/coins/markets", self.base_url);
        let params = [
            ("vs_currency", "usd".to_string()),
            ("ids", ids.join(",")),
            ("order", "market_cap_desc".to_string()),
            ("per_page", ids.len().max(1).to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
            ("price_change_percentage", "24h".to_string()),
        ];

        debug!("GET {} for {} ids", url, ids.len());

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&params)
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
impl PriceSource for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_markets(&self, ids: &[String]) -> SourceResult<HashMap<String, AssetSnapshot>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let markets = self.get_markets(ids).await?;
        let snapshots = markets
            .into_iter()
            .filter_map(|market| {
                let id = market.id.clone();
                let snapshot = market.into_snapshot();
                if snapshot.is_none() {
                    debug!("Dropping {} (no current price)", id);
                }
                snapshot
            })
            .map(|snapshot| (snapshot.id.clone(), snapshot))
            .collect();

        Ok(snapshots)
    }
}
