//! Market data access port trait.

use std::collections::HashMap;

use crate::domain::asset::AssetSnapshot;
use crate::domain::error::SpotscoutError;
use crate::domain::series::PriceSeries;

pub trait MarketDataPort {
    /// Top `n` assets by market cap, descending.
    fn top_assets(&self, n: usize) -> Result<Vec<AssetSnapshot>, SpotscoutError>;

    /// Daily price history for one asset over the trailing `days` days.
    /// May legitimately return fewer points, or an empty series.
    fn price_history(&self, asset_id: &str, days: u32) -> Result<PriceSeries, SpotscoutError>;

    /// Batch spot-price lookup for ledger valuation. Assets the provider
    /// cannot price are simply absent from the map.
    fn current_prices(&self, asset_ids: &[String]) -> Result<HashMap<String, f64>, SpotscoutError>;
}
