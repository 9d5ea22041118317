//! Simple Moving Average over the trailing window.

/// Mean of the last `period` values; `None` when the series is shorter
/// than the period or the period is zero.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_uses_trailing_window() {
        let values = [1.0, 2.0, 3.0, 10.0, 20.0, 30.0];
        assert_eq!(sma(&values, 3), Some(20.0));
    }

    #[test]
    fn sma_whole_series() {
        assert_eq!(sma(&[10.0, 20.0, 30.0], 3), Some(20.0));
    }

    #[test]
    fn sma_short_series_is_none() {
        assert_eq!(sma(&[10.0, 20.0], 3), None);
    }

    #[test]
    fn sma_zero_period_is_none() {
        assert_eq!(sma(&[10.0, 20.0], 0), None);
    }

    #[test]
    fn sma_period_1_is_latest() {
        assert_eq!(sma(&[10.0, 20.0, 30.0], 1), Some(30.0));
    }
}
