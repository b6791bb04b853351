use crate::domain::AssetSnapshot;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One entry of `GET /coins/markets`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

impl CoinMarket {
    /// Convert to a snapshot. Entries without a current price are unusable;
    /// a missing 24h change reads as 0.
    pub fn into_snapshot(self) -> Option<AssetSnapshot> {
        let current_price = self.current_price?;
        Some(AssetSnapshot {
            id: self.id,
            name: self.name,
            symbol: self.symbol.to_uppercase(),
            current_price,
            price_change_24h: self.price_change_percentage_24h.unwrap_or(0.0),
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markets_response() {
        let json = r#"[
            {
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
                "current_price": 43210.5,
                "market_cap": 846000000000,
                "total_volume": 21000000000,
                "price_change_percentage_24h": -2.345
            },
            {
                "id": "solana",
                "symbol": "sol",
                "name": "Solana",
                "current_price": 101.2,
                "price_change_percentage_24h": null
            }
        ]"#;

        let markets: Vec<CoinMarket> = serde_json::from_str(json).unwrap();
        assert_eq!(markets.len(), 2);

        let snapshots: Vec<AssetSnapshot> = markets
            .into_iter()
            .filter_map(CoinMarket::into_snapshot)
            .collect();

        assert_eq!(snapshots[0].symbol, "BTC");
        assert_eq!(snapshots[0].current_price, 43210.5);
        assert_eq!(snapshots[0].price_change_24h, -2.345);
        assert_eq!(snapshots[1].price_change_24h, 0.0);
    }

    #[test]
    fn test_missing_price_is_dropped() {
        let json = r#"{"id": "ghost", "symbol": "gst", "name": "Ghost", "current_price": null}"#;
        let market: CoinMarket = serde_json::from_str(json).unwrap();
        assert!(market.into_snapshot().is_none());
    }
}
