//! CSV-file trade ledger adapter.
//!
//! Flat append-only store, one row per trade:
//! `timestamp,coin_id,name,symbol,buy_price,quantity,trade_type`.
//! An older schema variant lacks the trailing `trade_type` column; those
//! rows read back as auto trades.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::error::SpotscoutError;
use crate::domain::ledger::{blocks_auto_append, TradeRecord, TradeType};
use crate::ports::ledger_port::{AppendOutcome, LedgerPort};

pub const LEDGER_COLUMNS: [&str; 7] = [
    "timestamp",
    "coin_id",
    "name",
    "symbol",
    "buy_price",
    "quantity",
    "trade_type",
];

pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse one data row. Field order is positional; the seventh column is
/// optional for backward compatibility.
fn parse_row(record: &csv::StringRecord) -> Result<TradeRecord, SpotscoutError> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SpotscoutError::MalformedRecord {
                reason: format!("missing {name} column"),
            })
    };

    let timestamp = DateTime::parse_from_rfc3339(field(0, "timestamp")?)
        .map_err(|e| SpotscoutError::MalformedRecord {
            reason: format!("invalid timestamp: {e}"),
        })?
        .with_timezone(&Utc);

    let buy_price: f64 =
        field(4, "buy_price")?
            .parse()
            .map_err(|e| SpotscoutError::MalformedRecord {
                reason: format!("invalid buy_price: {e}"),
            })?;

    let quantity: f64 = field(5, "quantity")?
        .parse()
        .map_err(|e| SpotscoutError::MalformedRecord {
            reason: format!("invalid quantity: {e}"),
        })?;

    let trade_type = match record.get(6) {
        Some(raw) => TradeType::parse(raw),
        None => TradeType::Auto,
    };

    Ok(TradeRecord {
        timestamp,
        asset_id: field(1, "coin_id")?.to_string(),
        name: field(2, "name")?.to_string(),
        symbol: field(3, "symbol")?.to_string(),
        buy_price,
        quantity,
        trade_type,
    })
}

impl LedgerPort for CsvLedger {
    fn ensure_store(&self) -> Result<(), SpotscoutError> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if !needs_header {
            return Ok(());
        }

        let mut writer = csv::Writer::from_writer(File::create(&self.path)?);
        writer
            .write_record(LEDGER_COLUMNS)
            .map_err(|e| SpotscoutError::Ledger {
                reason: format!("failed to write header: {e}"),
            })?;
        writer.flush()?;
        Ok(())
    }

    fn append(
        &mut self,
        record: TradeRecord,
        now: DateTime<Utc>,
    ) -> Result<AppendOutcome, SpotscoutError> {
        if record.trade_type == TradeType::Auto {
            let existing = self.load_all()?;
            if blocks_auto_append(&existing, &record.asset_id, now) {
                return Ok(AppendOutcome::Duplicate);
            }
        }

        self.ensure_store()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record([
                record.timestamp.to_rfc3339(),
                record.asset_id,
                record.name,
                record.symbol,
                record.buy_price.to_string(),
                record.quantity.to_string(),
                record.trade_type.to_string(),
            ])
            .map_err(|e| SpotscoutError::Ledger {
                reason: format!("failed to append trade: {e}"),
            })?;
        writer.flush()?;
        Ok(AppendOutcome::Logged)
    }

    fn load_all(&self) -> Result<Vec<TradeRecord>, SpotscoutError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        // Flexible: a migrated file may hold six-column rows from the old
        // schema next to seven-column rows from the current one.
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| SpotscoutError::Ledger {
                reason: format!("failed to read {}: {e}", self.path.display()),
            })?;

        let mut records = Vec::new();
        for result in reader.records() {
            let row = match result {
                Ok(row) => row,
                // Structurally broken line: drop it, keep reading.
                Err(_) => continue,
            };
            match parse_row(&row) {
                Ok(record) => records.push(record),
                Err(_) => continue,
            }
        }
        Ok(records)
    }
}
