//! TTL-caching decorator around a market data port.
//!
//! Each cached call owns its `(value, fetched_at)` pair; staleness is the
//! pure predicate [`is_stale`] of the injected clock, never of ambient
//! wall-clock reads scattered across call sites.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::asset::AssetSnapshot;
use crate::domain::error::SpotscoutError;
use crate::domain::series::PriceSeries;
use crate::ports::market_port::MarketDataPort;

/// A snapshot fetched at `fetched_at` is stale once the TTL has fully
/// elapsed.
pub fn is_stale(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(fetched_at) >= ttl
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct CachedProvider<P> {
    inner: P,
    ttl: Duration,
    clock: Clock,
    top_assets: RefCell<Option<Entry<Vec<AssetSnapshot>>>>,
    histories: RefCell<HashMap<(String, u32), Entry<PriceSeries>>>,
    prices: RefCell<Option<Entry<HashMap<String, f64>>>>,
    last_fetch: Cell<Option<DateTime<Utc>>>,
}

impl<P> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self::with_clock(inner, ttl, Box::new(Utc::now))
    }

    /// Construct with an explicit clock; tests inject a fake one.
    pub fn with_clock(inner: P, ttl: Duration, clock: Clock) -> Self {
        Self {
            inner,
            ttl,
            clock,
            top_assets: RefCell::new(None),
            histories: RefCell::new(HashMap::new()),
            prices: RefCell::new(None),
            last_fetch: Cell::new(None),
        }
    }

    /// When the inner provider was last actually called, across all
    /// cached methods. `None` until the first miss.
    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.last_fetch.get()
    }

    fn fresh<T: Clone>(&self, entry: &Option<Entry<T>>, now: DateTime<Utc>) -> Option<T> {
        entry
            .as_ref()
            .filter(|e| !is_stale(e.fetched_at, now, self.ttl))
            .map(|e| e.value.clone())
    }
}

impl<P: MarketDataPort> MarketDataPort for CachedProvider<P> {
    fn top_assets(&self, n: usize) -> Result<Vec<AssetSnapshot>, SpotscoutError> {
        let now = (self.clock)();

        if let Some(cached) = self.fresh(&self.top_assets.borrow(), now) {
            return Ok(cached);
        }

        let value = self.inner.top_assets(n)?;
        self.last_fetch.set(Some(now));
        *self.top_assets.borrow_mut() = Some(Entry {
            value: value.clone(),
            fetched_at: now,
        });
        Ok(value)
    }

    fn price_history(&self, asset_id: &str, days: u32) -> Result<PriceSeries, SpotscoutError> {
        let now = (self.clock)();
        let key = (asset_id.to_string(), days);

        if let Some(entry) = self.histories.borrow().get(&key) {
            if !is_stale(entry.fetched_at, now, self.ttl) {
                return Ok(entry.value.clone());
            }
        }

        let value = self.inner.price_history(asset_id, days)?;
        self.last_fetch.set(Some(now));
        self.histories.borrow_mut().insert(
            key,
            Entry {
                value: value.clone(),
                fetched_at: now,
            },
        );
        Ok(value)
    }

    fn current_prices(&self, asset_ids: &[String]) -> Result<HashMap<String, f64>, SpotscoutError> {
        let now = (self.clock)();

        if let Some(cached) = self.fresh(&self.prices.borrow(), now) {
            // Only reuse the batch when it covers everything asked for.
            if asset_ids.iter().all(|id| cached.contains_key(id)) {
                return Ok(cached);
            }
        }

        let value = self.inner.current_prices(asset_ids)?;
        self.last_fetch.set(Some(now));
        *self.prices.borrow_mut() = Some(Entry {
            value: value.clone(),
            fetched_at: now,
        });
        Ok(value)
    }
}
