//! MACD (Moving Average Convergence Divergence).
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal) of the
//! MACD line. The MACD line exists from index (slow - 1); the signal EMA
//! is seeded with the mean of the first min(signal, available) MACD
//! values, so a series only slightly longer than `slow` still yields a
//! signal value rather than an error.

use crate::domain::indicator::ema::ema_series;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
}

/// Latest MACD line and signal values. Needs at least `slow` observations;
/// returns `None` below that or for zero periods.
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal_period: usize) -> Option<MacdPoint> {
    if fast == 0 || slow == 0 || signal_period == 0 || prices.len() < slow {
        return None;
    }

    let ema_fast = ema_series(prices, fast);
    let ema_slow = ema_series(prices, slow);

    // Both EMAs are valid from index (slow - 1) onward when fast <= slow.
    let macd_line: Vec<f64> = (slow - 1..prices.len())
        .map(|i| ema_fast[i] - ema_slow[i])
        .collect();

    let seed_len = signal_period.min(macd_line.len());
    let mut signal = macd_line[..seed_len].iter().sum::<f64>() / seed_len as f64;

    let k = 2.0 / (signal_period as f64 + 1.0);
    for &value in &macd_line[seed_len..] {
        signal = value * k + signal * (1.0 - k);
    }

    Some(MacdPoint {
        line: *macd_line.last()?,
        signal,
    })
}

pub fn macd_default(prices: &[f64]) -> Option<MacdPoint> {
    macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending(len: usize, step: f64) -> Vec<f64> {
        (0..len).map(|i| 100.0 + i as f64 * step).collect()
    }

    #[test]
    fn macd_needs_slow_observations() {
        assert!(macd_default(&trending(25, 1.0)).is_none());
        assert!(macd_default(&trending(26, 1.0)).is_some());
    }

    #[test]
    fn macd_zero_periods_are_none() {
        let prices = trending(40, 1.0);
        assert!(macd(&prices, 0, 26, 9).is_none());
        assert!(macd(&prices, 12, 0, 9).is_none());
        assert!(macd(&prices, 12, 26, 0).is_none());
    }

    #[test]
    fn macd_line_positive_in_uptrend() {
        let point = macd_default(&trending(60, 1.0)).unwrap();
        assert!(point.line > 0.0);
    }

    #[test]
    fn macd_line_negative_in_downtrend() {
        let point = macd_default(&trending(60, -1.0)).unwrap();
        assert!(point.line < 0.0);
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let prices = trending(50, 0.7);
        let point = macd_default(&prices).unwrap();

        let ema_fast = ema_series(&prices, DEFAULT_FAST);
        let ema_slow = ema_series(&prices, DEFAULT_SLOW);
        let expected = ema_fast[prices.len() - 1] - ema_slow[prices.len() - 1];

        assert!((point.line - expected).abs() < 1e-10);
    }

    #[test]
    fn macd_signal_equals_line_at_minimum_length() {
        // With exactly `slow` points there is a single MACD value; the
        // signal seed is the mean of that one value.
        let point = macd_default(&trending(26, 1.0)).unwrap();
        assert!((point.signal - point.line).abs() < f64::EPSILON);
    }

    #[test]
    fn macd_signal_is_seeded_ema_of_line() {
        let prices = trending(60, 0.5);
        let point = macd_default(&prices).unwrap();

        let ema_fast = ema_series(&prices, DEFAULT_FAST);
        let ema_slow = ema_series(&prices, DEFAULT_SLOW);
        let line: Vec<f64> = (DEFAULT_SLOW - 1..prices.len())
            .map(|i| ema_fast[i] - ema_slow[i])
            .collect();

        let mut signal = line[..DEFAULT_SIGNAL].iter().sum::<f64>() / DEFAULT_SIGNAL as f64;
        let k = 2.0 / (DEFAULT_SIGNAL as f64 + 1.0);
        for &v in &line[DEFAULT_SIGNAL..] {
            signal = v * k + signal * (1.0 - k);
        }

        assert!((point.signal - signal).abs() < 1e-10);
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let point = macd_default(&[100.0; 60]).unwrap();
        assert!(point.line.abs() < 1e-10);
        assert!(point.signal.abs() < 1e-10);
    }

    #[test]
    fn macd_default_constants() {
        assert_eq!(DEFAULT_FAST, 12);
        assert_eq!(DEFAULT_SLOW, 26);
        assert_eq!(DEFAULT_SIGNAL, 9);
    }
}
