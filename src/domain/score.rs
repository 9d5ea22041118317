//! Composite spot score.
//!
//! Five weighted sub-scores (weights sum to 1.0):
//!   potential 0.30, RSI 0.25, MACD 0.20, Bollinger 0.15, trend 0.10.
//! The composite is truncated (not rounded) to an integer. Only the
//! potential term is unclamped below zero, so the composite can leave the
//! 0-100 range; that asymmetry is part of the scoring model and must not
//! be "fixed" here.

use std::collections::BTreeMap;

use crate::domain::asset::AssetSnapshot;
use crate::domain::indicator::IndicatorSet;

pub const WEIGHT_POTENTIAL: f64 = 0.30;
pub const WEIGHT_RSI: f64 = 0.25;
pub const WEIGHT_MACD: f64 = 0.20;
pub const WEIGHT_BOLLINGER: f64 = 0.15;
pub const WEIGHT_TREND: f64 = 0.10;

/// Output of one scoring pass. `breakdown` maps component name to its
/// weighted contribution; the contributions sum to the composite before
/// truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: i64,
    pub breakdown: BTreeMap<String, f64>,
    pub current_price: f64,
    pub rsi: f64,
}

/// Upside-to-downside ratio score. upside = (ATH - price)/price * 100,
/// downside = (price - ATL)/price * 100; ratio = upside / (downside + 1).
/// Capped at 100, deliberately not floored at 0.
fn potential_score(price: f64, ath: f64, atl: f64) -> f64 {
    let upside = (ath - price) / price * 100.0;
    let downside = (price - atl) / price * 100.0;
    let ratio = upside / (downside + 1.0);
    (ratio * 25.0).min(100.0)
}

fn macd_score(line: f64, signal: f64) -> f64 {
    (50.0 + (line - signal) * 15.0).clamp(0.0, 100.0)
}

/// Discrete three-tier band signal: 100 below the lower band, 60 below
/// the middle, 0 otherwise.
fn bollinger_score(price: f64, lower: f64, middle: f64) -> f64 {
    if price < lower {
        100.0
    } else if price < middle {
        60.0
    } else {
        0.0
    }
}

/// Binary long-term trend signal; indeterminate (0) without an SMA.
fn trend_score(price: f64, sma_50: Option<f64>) -> f64 {
    match sma_50 {
        Some(sma) if price > sma => 100.0,
        _ => 0.0,
    }
}

/// Pure scoring function over a snapshot and its latest indicators.
pub fn calculate_score(snapshot: &AssetSnapshot, indicators: &IndicatorSet) -> ScoreResult {
    let price = snapshot.current_price;

    let contributions = [
        (
            "potential",
            potential_score(price, snapshot.ath, snapshot.atl) * WEIGHT_POTENTIAL,
        ),
        ("rsi", (100.0 - indicators.rsi_14) * WEIGHT_RSI),
        (
            "macd",
            macd_score(indicators.macd_line, indicators.macd_signal) * WEIGHT_MACD,
        ),
        (
            "bollinger",
            bollinger_score(price, indicators.bollinger_lower, indicators.bollinger_mid)
                * WEIGHT_BOLLINGER,
        ),
        ("trend", trend_score(price, indicators.sma_50) * WEIGHT_TREND),
    ];

    let composite: f64 = contributions.iter().map(|(_, c)| c).sum();
    let breakdown = contributions
        .iter()
        .map(|(name, c)| (name.to_string(), *c))
        .collect();

    ScoreResult {
        score: composite.trunc() as i64,
        breakdown,
        current_price: price,
        rsi: indicators.rsi_14,
    }
}
