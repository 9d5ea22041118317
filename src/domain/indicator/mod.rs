//! Technical indicators, computed on the latest row of a price series.
//!
//! Each submodule implements one indicator; [`compute_indicators`] is the
//! engine entry point that derives the full [`IndicatorSet`] for a series
//! or fails with `InsufficientData` when a hard-floor lookback is unmet.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use crate::domain::error::SpotscoutError;
use crate::domain::series::PriceSeries;

pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_MULTIPLIER: f64 = 2.0;
pub const TREND_SMA_PERIOD: usize = 50;

/// Latest-row indicator values for one asset.
///
/// `sma_50` is `None` when the series is shorter than the trend lookback;
/// the trend signal is then indeterminate rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub rsi_14: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub bollinger_lower: f64,
    pub bollinger_mid: f64,
    pub sma_50: Option<f64>,
}

/// Derive the indicator set for a series.
///
/// Hard floors: RSI needs 15 points, Bollinger 20, MACD 26. Any shorter
/// series fails with `InsufficientData` naming the first unmet floor.
pub fn compute_indicators(series: &PriceSeries) -> Result<IndicatorSet, SpotscoutError> {
    let prices = series.prices();

    let rsi_14 =
        rsi::rsi(&prices, RSI_PERIOD).ok_or_else(|| SpotscoutError::InsufficientData {
            points: prices.len(),
            minimum: RSI_PERIOD + 1,
        })?;

    let bands = bollinger::bollinger(&prices, BOLLINGER_PERIOD, BOLLINGER_MULTIPLIER).ok_or_else(
        || SpotscoutError::InsufficientData {
            points: prices.len(),
            minimum: BOLLINGER_PERIOD,
        },
    )?;

    let macd_point =
        macd::macd_default(&prices).ok_or_else(|| SpotscoutError::InsufficientData {
            points: prices.len(),
            minimum: macd::DEFAULT_SLOW,
        })?;

    Ok(IndicatorSet {
        rsi_14,
        macd_line: macd_point.line,
        macd_signal: macd_point.signal,
        bollinger_lower: bands.lower,
        bollinger_mid: bands.middle,
        sma_50: sma::sma(&prices, TREND_SMA_PERIOD),
    })
}
