//! RSI (Relative Strength Index), Wilder's smoothing.
//!
//! First average gain/loss: simple mean over the first n price changes.
//! Subsequent: avg = (prev_avg * (n-1) + current) / n.
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)); 100 when avg_loss == 0.

/// Latest RSI value over `prices`. Needs `period + 1` observations for the
/// initial averages; returns `None` below that.
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..=period {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += -change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    for i in (period + 1)..prices.len() {
        let change = prices[i] - prices[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_needs_period_plus_one_points() {
        let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&prices, 14).is_none());

        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&prices, 14).is_some());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let value = rsi(&prices, 14).unwrap();
        assert!((value - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let value = rsi(&prices, 14).unwrap();
        assert!(value.abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_stays_in_range() {
        let prices: Vec<f64> = (0..60)
            .map(|i| 100.0 + ((i as f64) % 7.0 - 3.0) * 2.0)
            .collect();
        let value = rsi(&prices, 14).unwrap();
        assert!((0.0..=100.0).contains(&value), "RSI {value} out of range");
    }

    #[test]
    fn rsi_known_bullish_series() {
        let prices = [
            44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.75, 45.25, 45.5, 45.25, 45.5, 46.0, 46.25,
            46.0, 46.5,
        ];
        let value = rsi(&prices, 14).unwrap();
        assert!(
            value > 50.0 && value < 100.0,
            "RSI {value} should be in bullish territory"
        );
    }

    #[test]
    fn rsi_zero_period_is_none() {
        assert!(rsi(&[100.0, 101.0], 0).is_none());
    }

    #[test]
    fn rsi_smoothing_dampens_latest_move() {
        // One large drop after a long flat stretch should not pin RSI to 0.
        let mut prices = vec![100.0; 30];
        for (i, p) in prices.iter_mut().enumerate() {
            *p += (i as f64 % 3.0) * 0.5;
        }
        prices.push(90.0);
        let value = rsi(&prices, 14).unwrap();
        assert!(value > 0.0 && value < 50.0);
    }
}
