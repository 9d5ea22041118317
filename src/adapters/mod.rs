//! Concrete adapter implementations for ports.

pub mod cached_provider;
pub mod coingecko;
pub mod csv_ledger;
pub mod file_config_adapter;
