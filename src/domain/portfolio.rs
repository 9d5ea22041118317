//! Portfolio valuation over the trade ledger.

use std::collections::HashMap;

use crate::domain::ledger::{value_at, TradeRecord, Valuation};

#[derive(Debug, Clone, PartialEq)]
pub struct PositionView {
    pub record: TradeRecord,
    pub current_price: f64,
    pub valuation: Valuation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub positions: Vec<PositionView>,
    pub total_invested: f64,
    pub total_value: f64,
    pub total_pnl: f64,
}

/// Mark every ledger record to the given price map. Assets missing from
/// the map are valued at 0 (the provider could not price them right now).
pub fn summarize(
    records: Vec<TradeRecord>,
    prices: &HashMap<String, f64>,
    notional: f64,
) -> PortfolioSummary {
    let mut positions = Vec::with_capacity(records.len());
    let mut total_value = 0.0;

    for record in records {
        let current_price = prices.get(&record.asset_id).copied().unwrap_or(0.0);
        let valuation = value_at(&record, current_price, notional);
        total_value += valuation.current_value;
        positions.push(PositionView {
            record,
            current_price,
            valuation,
        });
    }

    let total_invested = notional * positions.len() as f64;
    PortfolioSummary {
        total_pnl: total_value - total_invested,
        total_invested,
        total_value,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::TradeType;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn record(asset_id: &str, buy_price: f64, quantity: f64) -> TradeRecord {
        TradeRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            asset_id: asset_id.into(),
            name: asset_id.into(),
            symbol: asset_id.into(),
            buy_price,
            quantity,
            trade_type: TradeType::Auto,
        }
    }

    #[test]
    fn summarize_totals() {
        let records = vec![record("bitcoin", 100.0, 0.1), record("ethereum", 20.0, 0.5)];
        let prices = HashMap::from([("bitcoin".to_string(), 150.0), ("ethereum".to_string(), 30.0)]);

        let summary = summarize(records, &prices, 10.0);

        assert_eq!(summary.positions.len(), 2);
        assert_relative_eq!(summary.total_invested, 20.0);
        // 150*0.1 + 30*0.5 = 15 + 15
        assert_relative_eq!(summary.total_value, 30.0);
        assert_relative_eq!(summary.total_pnl, 10.0);
    }

    #[test]
    fn missing_price_values_position_at_zero() {
        let records = vec![record("delistedcoin", 100.0, 0.1)];
        let summary = summarize(records, &HashMap::new(), 10.0);

        assert_eq!(summary.positions[0].current_price, 0.0);
        assert_relative_eq!(summary.positions[0].valuation.pnl, -10.0);
        assert_relative_eq!(summary.total_pnl, -10.0);
    }

    #[test]
    fn empty_ledger_summarizes_to_zero() {
        let summary = summarize(Vec::new(), &HashMap::new(), 10.0);
        assert!(summary.positions.is_empty());
        assert_eq!(summary.total_invested, 0.0);
        assert_eq!(summary.total_value, 0.0);
        assert_eq!(summary.total_pnl, 0.0);
    }
}
