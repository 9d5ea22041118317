//! Refresh-cycle orchestration.
//!
//! One cycle walks the top-N universe in the provider's market-cap order,
//! scores each asset from its daily history, and logs an auto paper trade
//! when the score crosses the buy threshold. Per-asset failures skip only
//! that asset; a failed universe fetch aborts the whole cycle.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::error::SpotscoutError;
use crate::domain::indicator::compute_indicators;
use crate::domain::ledger::{TradeRecord, TradeType};
use crate::domain::score::calculate_score;
use crate::ports::ledger_port::{AppendOutcome, LedgerPort};
use crate::ports::market_port::MarketDataPort;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub top_n: usize,
    pub history_days: u32,
    pub buy_threshold: i64,
    pub trade_notional_usd: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: 25,
            history_days: 365,
            buy_threshold: 65,
            trade_notional_usd: 10.0,
        }
    }
}

/// One display row of the cycle's overview table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub rank: u32,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
    pub score: i64,
    pub rsi: f64,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    HistoryFetch(String),
    EmptySeries,
    InsufficientData { points: usize, minimum: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::HistoryFetch(reason) => write!(f, "history fetch failed: {reason}"),
            SkipReason::EmptySeries => write!(f, "no price history"),
            SkipReason::InsufficientData { points, minimum } => {
                write!(f, "only {points} points, minimum {minimum} required")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkippedAsset {
    pub id: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub rows: Vec<SummaryRow>,
    pub skipped: Vec<SkippedAsset>,
    /// Auto trades actually written this cycle (dedup-suppressed appends
    /// are not listed).
    pub trades_opened: Vec<TradeRecord>,
}

/// Run one refresh cycle. `now` is the cycle's clock reading; it stamps
/// trade records and anchors the ledger dedup window.
pub fn run_cycle(
    market: &dyn MarketDataPort,
    ledger: &mut dyn LedgerPort,
    cfg: &PipelineConfig,
    now: DateTime<Utc>,
) -> Result<CycleReport, SpotscoutError> {
    let snapshots = market.top_assets(cfg.top_n)?;

    let mut rows = Vec::with_capacity(snapshots.len());
    let mut skipped = Vec::new();
    let mut trades_opened = Vec::new();

    for snapshot in snapshots {
        let series = match market.price_history(&snapshot.id, cfg.history_days) {
            Ok(series) => series,
            Err(e) => {
                eprintln!("warning: skipping {} ({e})", snapshot.id);
                skipped.push(SkippedAsset {
                    id: snapshot.id,
                    reason: SkipReason::HistoryFetch(e.to_string()),
                });
                continue;
            }
        };

        if series.is_empty() {
            skipped.push(SkippedAsset {
                id: snapshot.id,
                reason: SkipReason::EmptySeries,
            });
            continue;
        }

        let indicators = match compute_indicators(&series) {
            Ok(indicators) => indicators,
            Err(SpotscoutError::InsufficientData { points, minimum }) => {
                eprintln!(
                    "warning: skipping {} (only {} points, minimum {} required)",
                    snapshot.id, points, minimum
                );
                skipped.push(SkippedAsset {
                    id: snapshot.id,
                    reason: SkipReason::InsufficientData { points, minimum },
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let result = calculate_score(&snapshot, &indicators);

        if result.score > cfg.buy_threshold {
            let record = TradeRecord::open(&snapshot, cfg.trade_notional_usd, TradeType::Auto, now);
            if ledger.append(record.clone(), now)? == AppendOutcome::Logged {
                trades_opened.push(record);
            }
        }

        rows.push(SummaryRow {
            rank: snapshot.market_cap_rank,
            name: snapshot.name,
            symbol: snapshot.symbol,
            price: result.current_price,
            change_24h: snapshot.change_24h_pct,
            score: result.score,
            rsi: result.rsi,
        });
    }

    Ok(CycleReport {
        rows,
        skipped,
        trades_opened,
    })
}
