//! CoinGecko market data adapter.
//!
//! Wire parsing is split from transport so the response handling is
//! testable against fixture payloads without a network.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use serde::Deserialize;

use crate::domain::asset::AssetSnapshot;
use crate::domain::error::SpotscoutError;
use crate::domain::series::{PricePoint, PriceSeries};
use crate::ports::market_port::MarketDataPort;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com";

pub struct CoinGeckoAdapter {
    base_url: String,
    http: reqwest::blocking::Client,
}

/// One row of the /coins/markets response. Nullable fields are common for
/// thinly traded listings; they default rather than failing the whole page.
#[derive(Debug, Deserialize)]
pub(crate) struct MarketRow {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    ath: Option<f64>,
    #[serde(default)]
    atl: Option<f64>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
}

/// The /coins/{id}/market_chart response; each price entry is
/// [unix_millis, price].
#[derive(Debug, Deserialize)]
pub(crate) struct MarketChart {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

pub(crate) fn snapshot_from_row(row: MarketRow) -> AssetSnapshot {
    AssetSnapshot {
        id: row.id,
        name: row.name,
        symbol: row.symbol,
        current_price: row.current_price.unwrap_or(0.0),
        ath: row.ath.unwrap_or(0.0),
        atl: row.atl.unwrap_or(0.0),
        change_24h_pct: row.price_change_percentage_24h.unwrap_or(0.0),
        market_cap_rank: row.market_cap_rank.unwrap_or(0),
    }
}

pub(crate) fn series_from_chart(chart: MarketChart) -> PriceSeries {
    let points = chart
        .prices
        .into_iter()
        .filter_map(|(millis, price)| {
            let timestamp = Utc.timestamp_millis_opt(millis as i64).single()?;
            Some(PricePoint { timestamp, price })
        })
        .collect();
    PriceSeries::new(points)
}

impl CoinGeckoAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpotscoutError> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| SpotscoutError::Provider {
                reason: format!("request to {url} failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SpotscoutError::Provider {
                reason: format!("{url} returned {status}"),
            });
        }

        resp.json().map_err(|e| SpotscoutError::Provider {
            reason: format!("malformed response from {url}: {e}"),
        })
    }
}

impl MarketDataPort for CoinGeckoAdapter {
    fn top_assets(&self, n: usize) -> Result<Vec<AssetSnapshot>, SpotscoutError> {
        let rows: Vec<MarketRow> = self.get_json(
            "/api/v3/coins/markets",
            &[
                ("vs_currency", "usd".to_string()),
                ("order", "market_cap_desc".to_string()),
                ("per_page", n.to_string()),
                ("page", "1".to_string()),
            ],
        )?;
        Ok(rows.into_iter().map(snapshot_from_row).collect())
    }

    fn price_history(&self, asset_id: &str, days: u32) -> Result<PriceSeries, SpotscoutError> {
        let chart: MarketChart = self.get_json(
            &format!("/api/v3/coins/{asset_id}/market_chart"),
            &[
                ("vs_currency", "usd".to_string()),
                ("days", days.to_string()),
                ("interval", "daily".to_string()),
            ],
        )?;
        Ok(series_from_chart(chart))
    }

    fn current_prices(&self, asset_ids: &[String]) -> Result<HashMap<String, f64>, SpotscoutError> {
        if asset_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let raw: HashMap<String, HashMap<String, f64>> = self.get_json(
            "/api/v3/simple/price",
            &[
                ("ids", asset_ids.join(",")),
                ("vs_currencies", "usd".to_string()),
            ],
        )?;

        Ok(raw
            .into_iter()
            .filter_map(|(id, quotes)| quotes.get("usd").map(|&price| (id, price)))
            .collect())
    }
}
