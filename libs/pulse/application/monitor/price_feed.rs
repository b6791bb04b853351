//! Price refresh step
//!
//! Pulls live snapshots when a source is configured and answers; otherwise
//! advances each asset with a bounded random walk and smooths the 24h
//! change figure.

use super::{MonitorError, MonitorResult};
use crate::domain::AssetSnapshot;
use crate::infrastructure::PriceSource;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Max per-tick move of a simulated price, in percent
pub const RANDOM_WALK_BOUND_PCT: f64 = 2.0;

/// Weight kept from the previous 24h change on each simulated tick
pub const SMOOTHING_RETAIN: f64 = 0.95;

/// Weight given to the instantaneous tick delta
pub const SMOOTHING_WEIGHT: f64 = 0.05;

/// Bound of the random 24h change assigned to a freshly seeded asset
const SEED_CHANGE_BOUND_PCT: f64 = 5.0;

/// Base prices used when an asset must be seeded without upstream data
const BASE_PRICES: &[(&str, f64)] = &[("bitcoin", 36_000.0), ("ethereum", 2_400.0), ("solana", 145.0)];

pub fn base_price(id: &str) -> Option<f64> {
    BASE_PRICES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, price)| *price)
}

/// Exponentially smoothed 24h change after a move from `old_price` to `new_price`
pub fn smoothed_change(old_change: f64, old_price: f64, new_price: f64) -> f64 {
    let delta_pct = (new_price - old_price) / old_price * 100.0;
    old_change * SMOOTHING_RETAIN + delta_pct * SMOOTHING_WEIGHT
}

/// Move `price` by a uniform random percentage in [-2%, +2%]
pub fn random_walk_step<R: Rng>(price: f64, rng: &mut R) -> f64 {
    let pct = rng.gen_range(-RANDOM_WALK_BOUND_PCT..=RANDOM_WALK_BOUND_PCT);
    price * (1.0 + pct / 100.0)
}

/// Next simulated snapshot for `current`
pub fn simulate_tick<R: Rng>(
    current: &AssetSnapshot,
    rng: &mut R,
    now: DateTime<Utc>,
) -> AssetSnapshot {
    let new_price = random_walk_step(current.current_price, rng);
    AssetSnapshot {
        current_price: new_price,
        price_change_24h: smoothed_change(
            current.price_change_24h,
            current.current_price,
            new_price,
        ),
        updated_at: now,
        ..current.clone()
    }
}

/// Fallback snapshot for an asset with no data at all
pub fn seed_snapshot<R: Rng>(
    id: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Option<AssetSnapshot> {
    let price = base_price(id)?;
    Some(AssetSnapshot {
        id: id.to_string(),
        name: capitalize(id),
        symbol: id.chars().take(3).collect::<String>().to_uppercase(),
        current_price: price,
        price_change_24h: rng.gen_range(-SEED_CHANGE_BOUND_PCT..=SEED_CHANGE_BOUND_PCT),
        updated_at: now,
    })
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Outcome counters of one price refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRefresh {
    pub live: usize,
    pub simulated: usize,
    pub seeded: usize,
    /// A live source was configured but did not answer
    pub fell_back: bool,
}

pub struct PriceFeed {
    source: Option<Arc<dyn PriceSource>>,
    rng: StdRng,
    fallbacks: u64,
}

impl PriceFeed {
    pub fn new(source: Option<Arc<dyn PriceSource>>, rng: StdRng) -> Self {
        Self {
            source,
            rng,
            fallbacks: 0,
        }
    }

    /// Number of refreshes where the live source failed
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// Refresh `assets` for every id in `ids`.
    ///
    /// Live snapshots replace stored ones wholesale; anything the live
    /// source did not provide takes the simulated path.
    pub async fn refresh(
        &mut self,
        ids: &[String],
        assets: &mut BTreeMap<String, AssetSnapshot>,
        now: DateTime<Utc>,
    ) -> MonitorResult<PriceRefresh> {
        let mut refresh = PriceRefresh::default();

        let mut live: HashMap<String, AssetSnapshot> = match &self.source {
            Some(source) => match source.fetch_markets(ids).await {
                Ok(markets) => {
                    debug!("{} returned {} markets", source.name(), markets.len());
                    markets
                }
                Err(e) => {
                    warn!(
                        "Price source {} failed, falling back to simulated prices: {}",
                        source.name(),
                        e
                    );
                    refresh.fell_back = true;
                    self.fallbacks += 1;
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };

        for id in ids {
            if let Some(mut snapshot) = live.remove(id).filter(AssetSnapshot::is_valid) {
                snapshot.id = id.clone();
                assets.insert(id.clone(), snapshot);
                refresh.live += 1;
                continue;
            }

            let next = match assets.get(id) {
                Some(current) => {
                    refresh.simulated += 1;
                    Some(simulate_tick(current, &mut self.rng, now))
                }
                None => {
                    let seeded = seed_snapshot(id, &mut self.rng, now);
                    if seeded.is_some() {
                        refresh.seeded += 1;
                    } else {
                        debug!("No price data for {}, skipping this tick", id);
                    }
                    seeded
                }
            };

            if let Some(next) = next {
                assets.insert(id.clone(), next);
            }
        }

        if !ids.is_empty() && ids.iter().all(|id| !assets.contains_key(id)) {
            return Err(MonitorError::NoPriceData);
        }

        Ok(refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_smoothing_weights() {
        let change = smoothed_change(5.0, 100.0, 102.0);
        assert!((change - 4.85).abs() < 1e-12);
    }

    #[test]
    fn test_smoothing_negative_move() {
        // 0 * 0.95 + (-1%) * 0.05
        let change = smoothed_change(0.0, 200.0, 198.0);
        assert!((change + 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_random_walk_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let next = random_walk_step(100.0, &mut rng);
            assert!((98.0..=102.0).contains(&next), "out of bounds: {}", next);
        }
    }

    #[test]
    fn test_simulate_tick_updates_price_and_change() {
        let mut rng = StdRng::seed_from_u64(42);
        let current = AssetSnapshot::new("bitcoin", "Bitcoin", "BTC", 100.0, 5.0);
        let now = Utc::now();

        let next = simulate_tick(&current, &mut rng, now);

        assert_eq!(next.id, "bitcoin");
        assert_eq!(next.updated_at, now);
        let expected = smoothed_change(5.0, 100.0, next.current_price);
        assert!((next.price_change_24h - expected).abs() < 1e-12);
    }

    #[test]
    fn test_seed_snapshot() {
        let mut rng = StdRng::seed_from_u64(1);
        let seeded = seed_snapshot("ethereum", &mut rng, Utc::now()).unwrap();

        assert_eq!(seeded.name, "Ethereum");
        assert_eq!(seeded.symbol, "ETH");
        assert_eq!(seeded.current_price, 2_400.0);
        assert!(seeded.price_change_24h.abs() <= 5.0);

        assert!(seed_snapshot("dogecoin", &mut rng, Utc::now()).is_none());
    }

    #[tokio::test]
    async fn test_simulation_mode_seeds_then_walks() {
        let mut feed = PriceFeed::new(None, StdRng::seed_from_u64(3));
        let ids = vec!["bitcoin".to_string(), "solana".to_string()];
        let mut assets = BTreeMap::new();

        let first = feed.refresh(&ids, &mut assets, Utc::now()).await.unwrap();
        assert_eq!(first.seeded, 2);
        assert!(!first.fell_back);
        assert_eq!(assets["solana"].current_price, 145.0);

        let second = feed.refresh(&ids, &mut assets, Utc::now()).await.unwrap();
        assert_eq!(second.simulated, 2);
        assert_ne!(assets["solana"].current_price, 145.0);
    }

    #[tokio::test]
    async fn test_unknown_assets_only_is_an_error() {
        let mut feed = PriceFeed::new(None, StdRng::seed_from_u64(3));
        let ids = vec!["dogecoin".to_string()];
        let mut assets = BTreeMap::new();

        let result = feed.refresh(&ids, &mut assets, Utc::now()).await;
        assert!(matches!(result, Err(MonitorError::NoPriceData)));
    }
}
