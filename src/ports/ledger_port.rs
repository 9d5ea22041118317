//! Trade ledger port trait.

use chrono::{DateTime, Utc};

use crate::domain::error::SpotscoutError;
use crate::domain::ledger::TradeRecord;

/// What `append` actually did. A suppressed duplicate is not an error;
/// it signals "already logged recently, skip".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Logged,
    Duplicate,
}

pub trait LedgerPort {
    /// Idempotent initialization of the backing store and its schema.
    fn ensure_store(&self) -> Result<(), SpotscoutError>;

    /// Append a record. `Auto` records are suppressed when another `Auto`
    /// record for the same asset falls within the trailing dedup window
    /// of `now`; `Manual` records always append.
    fn append(
        &mut self,
        record: TradeRecord,
        now: DateTime<Utc>,
    ) -> Result<AppendOutcome, SpotscoutError>;

    /// All readable records. Malformed rows are dropped, never fatal.
    fn load_all(&self) -> Result<Vec<TradeRecord>, SpotscoutError>;
}
