#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use spotscout::domain::asset::AssetSnapshot;
use spotscout::domain::error::SpotscoutError;
use spotscout::domain::series::{PricePoint, PriceSeries};
use spotscout::ports::market_port::MarketDataPort;

/// In-memory market data port for tests.
pub struct MockMarketPort {
    pub assets: Vec<AssetSnapshot>,
    pub histories: HashMap<String, PriceSeries>,
    pub history_errors: HashMap<String, String>,
    pub top_assets_error: Option<String>,
    pub spot_prices: HashMap<String, f64>,
}

impl MockMarketPort {
    pub fn new() -> Self {
        Self {
            assets: Vec::new(),
            histories: HashMap::new(),
            history_errors: HashMap::new(),
            top_assets_error: None,
            spot_prices: HashMap::new(),
        }
    }

    pub fn with_asset(mut self, snapshot: AssetSnapshot, series: PriceSeries) -> Self {
        self.histories.insert(snapshot.id.clone(), series);
        self.assets.push(snapshot);
        self
    }

    pub fn with_history_error(mut self, snapshot: AssetSnapshot, reason: &str) -> Self {
        self.history_errors
            .insert(snapshot.id.clone(), reason.to_string());
        self.assets.push(snapshot);
        self
    }

    pub fn with_top_assets_error(mut self, reason: &str) -> Self {
        self.top_assets_error = Some(reason.to_string());
        self
    }

    pub fn with_spot_price(mut self, id: &str, price: f64) -> Self {
        self.spot_prices.insert(id.to_string(), price);
        self
    }
}

impl MarketDataPort for MockMarketPort {
    fn top_assets(&self, n: usize) -> Result<Vec<AssetSnapshot>, SpotscoutError> {
        if let Some(reason) = &self.top_assets_error {
            return Err(SpotscoutError::Provider {
                reason: reason.clone(),
            });
        }
        Ok(self.assets.iter().take(n).cloned().collect())
    }

    fn price_history(&self, asset_id: &str, _days: u32) -> Result<PriceSeries, SpotscoutError> {
        if let Some(reason) = self.history_errors.get(asset_id) {
            return Err(SpotscoutError::Provider {
                reason: reason.clone(),
            });
        }
        Ok(self
            .histories
            .get(asset_id)
            .cloned()
            .unwrap_or_else(PriceSeries::empty))
    }

    fn current_prices(&self, asset_ids: &[String]) -> Result<HashMap<String, f64>, SpotscoutError> {
        Ok(asset_ids
            .iter()
            .filter_map(|id| self.spot_prices.get(id).map(|&p| (id.clone(), p)))
            .collect())
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn snapshot(id: &str, rank: u32, price: f64, ath: f64, atl: f64) -> AssetSnapshot {
    AssetSnapshot {
        id: id.to_string(),
        name: {
            let mut name = id.to_string();
            if let Some(first) = name.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            name
        },
        symbol: id.chars().take(3).collect(),
        current_price: price,
        ath,
        atl,
        change_24h_pct: 1.5,
        market_cap_rank: rank,
    }
}

/// Daily series of `prices`, one point per day ending at `base_time()`.
pub fn series_of(prices: &[f64]) -> PriceSeries {
    let start = base_time() - Duration::days(prices.len() as i64);
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            timestamp: start + Duration::days(i as i64 + 1),
            price,
        })
        .collect();
    PriceSeries::new(points)
}

/// A steadily declining series: deep oversold signals and a huge upside
/// ratio push the composite score well above the buy threshold.
pub fn oversold_series(len: usize) -> PriceSeries {
    let prices: Vec<f64> = (0..len).map(|i| 100.0 - i as f64 * 0.5).collect();
    series_of(&prices)
}

/// A flat, fully-priced series that scores low.
pub fn flat_series(len: usize) -> PriceSeries {
    series_of(&vec![100.0; len])
}
