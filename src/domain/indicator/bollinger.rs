//! Bollinger Bands.
//!
//! Middle = SMA(n); upper/lower = middle ± multiplier × population stddev
//! (divides by N, not N-1) over the same window.

use crate::domain::indicator::sma::sma;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bands over the trailing `period` values; `None` when the series is too
/// short.
pub fn bollinger(prices: &[f64], period: usize, multiplier: f64) -> Option<Bands> {
    let middle = sma(prices, period)?;
    let window = &prices[prices.len() - period..];

    let variance = window
        .iter()
        .map(|p| {
            let diff = p - middle;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    let stddev = variance.sqrt();

    Some(Bands {
        upper: middle + multiplier * stddev,
        middle,
        lower: middle - multiplier * stddev,
    })
}
