//! Paper-trade records, dedup policy, and valuation.
//!
//! Records are append-only and immutable once written. The auto-entry
//! dedup rule: no two `Auto` records for one asset within a trailing
//! 24-hour window, checked against the write-time clock before the
//! append happens.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::domain::asset::AssetSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    Auto,
    Manual,
}

impl TradeType {
    /// Lenient reader: "manual" is manual, anything else (including the
    /// older schema's absent column) is auto.
    pub fn parse(raw: &str) -> TradeType {
        if raw.trim().eq_ignore_ascii_case("manual") {
            TradeType::Manual
        } else {
            TradeType::Auto
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Auto => write!(f, "auto"),
            TradeType::Manual => write!(f, "manual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub asset_id: String,
    pub name: String,
    pub symbol: String,
    pub buy_price: f64,
    pub quantity: f64,
    pub trade_type: TradeType,
}

impl TradeRecord {
    /// Open a fixed-notional position at the snapshot's current price.
    pub fn open(
        snapshot: &AssetSnapshot,
        notional: f64,
        trade_type: TradeType,
        timestamp: DateTime<Utc>,
    ) -> TradeRecord {
        let buy_price = snapshot.current_price;
        let quantity = if buy_price.is_finite() && buy_price > 0.0 {
            notional / buy_price
        } else {
            0.0
        };
        TradeRecord {
            timestamp,
            asset_id: snapshot.id.clone(),
            name: snapshot.name.clone(),
            symbol: snapshot.symbol.clone(),
            buy_price,
            quantity,
            trade_type,
        }
    }
}

pub fn dedup_window() -> Duration {
    Duration::hours(24)
}

/// True when an existing `Auto` record for `asset_id` falls within the
/// trailing dedup window of `now`, i.e. a fresh auto entry must be
/// suppressed.
pub fn blocks_auto_append(existing: &[TradeRecord], asset_id: &str, now: DateTime<Utc>) -> bool {
    existing.iter().any(|r| {
        r.trade_type == TradeType::Auto
            && r.asset_id == asset_id
            && now.signed_duration_since(r.timestamp) < dedup_window()
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
}

/// Mark a record to the given price under the fixed-notional convention:
/// pnl is measured against the notional invested, not buy_price times
/// quantity. A non-positive or non-finite price values the position at 0
/// rather than failing.
pub fn value_at(record: &TradeRecord, current_price: f64, notional: f64) -> Valuation {
    let current_value = if current_price.is_finite() && current_price > 0.0 {
        current_price * record.quantity
    } else {
        0.0
    };
    let pnl = current_value - notional;
    let pnl_percent = if notional > 0.0 {
        pnl / notional * 100.0
    } else {
        0.0
    };
    Valuation {
        current_value,
        pnl,
        pnl_percent,
    }
}
