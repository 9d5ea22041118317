//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};

use crate::adapters::cached_provider::CachedProvider;
use crate::adapters::coingecko::{CoinGeckoAdapter, DEFAULT_BASE_URL};
use crate::adapters::csv_ledger::CsvLedger;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::SpotscoutError;
use crate::domain::ledger::{TradeRecord, TradeType};
use crate::domain::pipeline::{run_cycle, CycleReport, PipelineConfig, SummaryRow};
use crate::domain::portfolio::{summarize, PortfolioSummary};
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::market_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "spotscout", about = "Spot-market scoring pipeline with a paper-trade ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one scoring cycle over the top-N universe
    Scan {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run scoring cycles continuously on the cache-TTL cadence
    Watch {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the paper-trade portfolio with current valuations
    Portfolio {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Log a manual fixed-notional paper trade
    Trade {
        #[arg(short, long)]
        config: PathBuf,
        /// Provider id of the asset, e.g. "bitcoin"
        #[arg(long)]
        asset: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan { config } => run_scan(&config),
        Command::Watch { config } => run_watch(&config),
        Command::Portfolio { config } => run_portfolio(&config),
        Command::Trade { config, asset } => run_trade(&config, &asset),
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub base_url: String,
    pub ttl: Duration,
    pub ledger_path: PathBuf,
    pub pipeline: PipelineConfig,
}

pub fn build_settings(cfg: &dyn ConfigPort) -> Result<AppSettings, SpotscoutError> {
    let base_url = cfg
        .get_string("provider", "base_url")
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let ttl_minutes = cfg.get_int("provider", "ttl_minutes", 15);
    if ttl_minutes <= 0 {
        return Err(SpotscoutError::ConfigInvalid {
            section: "provider".into(),
            key: "ttl_minutes".into(),
            reason: "must be positive".into(),
        });
    }

    let top_n = cfg.get_int("provider", "top_n", 25);
    if top_n <= 0 {
        return Err(SpotscoutError::ConfigInvalid {
            section: "provider".into(),
            key: "top_n".into(),
            reason: "must be positive".into(),
        });
    }

    let history_days = cfg.get_int("provider", "history_days", 365);
    if history_days <= 0 {
        return Err(SpotscoutError::ConfigInvalid {
            section: "provider".into(),
            key: "history_days".into(),
            reason: "must be positive".into(),
        });
    }

    let buy_threshold = cfg.get_int("scoring", "buy_threshold", 65);
    if !(0..=100).contains(&buy_threshold) {
        return Err(SpotscoutError::ConfigInvalid {
            section: "scoring".into(),
            key: "buy_threshold".into(),
            reason: "must be between 0 and 100".into(),
        });
    }

    let trade_notional_usd = cfg.get_double("scoring", "trade_notional_usd", 10.0);
    if trade_notional_usd <= 0.0 {
        return Err(SpotscoutError::ConfigInvalid {
            section: "scoring".into(),
            key: "trade_notional_usd".into(),
            reason: "must be positive".into(),
        });
    }

    let ledger_path = cfg
        .get_string("ledger", "path")
        .ok_or_else(|| SpotscoutError::ConfigMissing {
            section: "ledger".into(),
            key: "path".into(),
        })?;

    Ok(AppSettings {
        base_url,
        ttl: Duration::minutes(ttl_minutes),
        ledger_path: PathBuf::from(ledger_path),
        pipeline: PipelineConfig {
            top_n: top_n as usize,
            history_days: history_days as u32,
            buy_threshold,
            trade_notional_usd,
        },
    })
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SpotscoutError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn setup(
    config_path: &PathBuf,
) -> Result<(AppSettings, CachedProvider<CoinGeckoAdapter>, CsvLedger), ExitCode> {
    let adapter = load_config(config_path)?;
    let settings = match build_settings(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };

    let provider = CachedProvider::new(
        CoinGeckoAdapter::new(settings.base_url.clone()),
        settings.ttl,
    );
    let ledger = CsvLedger::new(&settings.ledger_path);

    Ok((settings, provider, ledger))
}

fn run_scan(config_path: &PathBuf) -> ExitCode {
    let (settings, provider, mut ledger) = match setup(config_path) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    if let Err(e) = ledger.ensure_store() {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!(
        "Scanning top {} assets ({} days of history)...",
        settings.pipeline.top_n, settings.pipeline.history_days
    );

    match run_cycle(&provider, &mut ledger, &settings.pipeline, Utc::now()) {
        Ok(report) => {
            print_cycle(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_watch(config_path: &PathBuf) -> ExitCode {
    let (settings, provider, mut ledger) = match setup(config_path) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    if let Err(e) = ledger.ensure_store() {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let started = Utc::now();
    let sleep = settings
        .ttl
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(900));
    let mut cycles: u64 = 0;

    loop {
        // A failed cycle is reported once and retried on the next tick.
        match run_cycle(&provider, &mut ledger, &settings.pipeline, Utc::now()) {
            Ok(report) => {
                cycles += 1;
                print_cycle(&report);
            }
            Err(e) => eprintln!("error: cycle aborted: {e}"),
        }

        let last_fetch = provider
            .last_fetch()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        eprintln!(
            "-- watching since {} | cycles: {} | last provider fetch: {} | next in {} min --",
            started.format("%Y-%m-%d %H:%M:%S UTC"),
            cycles,
            last_fetch,
            settings.ttl.num_minutes()
        );

        std::thread::sleep(sleep);
    }
}

fn run_portfolio(config_path: &PathBuf) -> ExitCode {
    let (settings, provider, ledger) = match setup(config_path) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    let mut records = match ledger.load_all() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if records.is_empty() {
        println!(
            "No paper trades logged yet. Run `spotscout scan` to let scores above {} open them, \
             or log one with `spotscout trade`.",
            settings.pipeline.buy_threshold
        );
        return ExitCode::SUCCESS;
    }

    // Newest first, as the portfolio is read.
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut ids: Vec<String> = Vec::new();
    for record in &records {
        if !ids.contains(&record.asset_id) {
            ids.push(record.asset_id.clone());
        }
    }

    eprintln!("Fetching current prices for {} assets...", ids.len());
    let prices = match provider.current_prices(&ids) {
        Ok(prices) => prices,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let summary = summarize(records, &prices, settings.pipeline.trade_notional_usd);
    print_portfolio(&summary);
    ExitCode::SUCCESS
}

fn run_trade(config_path: &PathBuf, asset: &str) -> ExitCode {
    let (settings, provider, mut ledger) = match setup(config_path) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    let result = log_manual_trade(&provider, &mut ledger, &settings, asset, Utc::now());
    match result {
        Ok(record) => {
            println!(
                "Logged manual trade: {} ({}) — ${:.2} at ${:.4}, quantity {:.6}",
                record.name,
                record.symbol.to_uppercase(),
                settings.pipeline.trade_notional_usd,
                record.buy_price,
                record.quantity
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Manual trades go through the same universe the scanner sees, so the
/// logged name/symbol/price match the current snapshot.
pub fn log_manual_trade(
    market: &dyn MarketDataPort,
    ledger: &mut dyn LedgerPort,
    settings: &AppSettings,
    asset: &str,
    now: chrono::DateTime<Utc>,
) -> Result<TradeRecord, SpotscoutError> {
    let snapshots = market.top_assets(settings.pipeline.top_n)?;
    let snapshot = snapshots
        .into_iter()
        .find(|s| s.id.eq_ignore_ascii_case(asset))
        .ok_or_else(|| SpotscoutError::UnknownAsset { id: asset.into() })?;

    let record = TradeRecord::open(
        &snapshot,
        settings.pipeline.trade_notional_usd,
        TradeType::Manual,
        now,
    );
    ledger.ensure_store()?;
    ledger.append(record.clone(), now)?;
    Ok(record)
}

fn print_cycle(report: &CycleReport) {
    print_summary(&report.rows);

    for trade in &report.trades_opened {
        println!(
            "auto trade: {} ({}) @ ${:.4}, quantity {:.6}",
            trade.name,
            trade.symbol.to_uppercase(),
            trade.buy_price,
            trade.quantity
        );
    }

    if !report.skipped.is_empty() {
        eprintln!("Skipped {} of {} assets:", report.skipped.len(),
            report.skipped.len() + report.rows.len());
        for skip in &report.skipped {
            eprintln!("  {}: {}", skip.id, skip.reason);
        }
    }
}

fn print_summary(rows: &[SummaryRow]) {
    println!(
        "{:>4}  {:<28} {:>14} {:>9} {:>6} {:>5}",
        "Rank", "Coin", "Price", "24h %", "Score", "RSI"
    );
    for row in rows {
        println!(
            "{:>4}  {:<28} {:>14} {:>8.2}% {:>6} {:>5.0}",
            row.rank,
            format!("{} ({})", row.name, row.symbol.to_uppercase()),
            format!("${:.2}", row.price),
            row.change_24h,
            row.score,
            row.rsi
        );
    }
}

fn print_portfolio(summary: &PortfolioSummary) {
    println!(
        "{:<20} {:<22} {:<7} {:>12} {:>12} {:>10} {:>10}",
        "Logged", "Coin", "Type", "Buy", "Current", "Value", "PnL"
    );
    for position in &summary.positions {
        let record = &position.record;
        println!(
            "{:<20} {:<22} {:<7} {:>12} {:>12} {:>10} {:>+10.2}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            format!("{} ({})", record.name, record.symbol.to_uppercase()),
            record.trade_type.to_string(),
            format!("${:.4}", record.buy_price),
            format!("${:.4}", position.current_price),
            format!("${:.2}", position.valuation.current_value),
            position.valuation.pnl
        );
    }

    let pct = if summary.total_invested > 0.0 {
        summary.total_pnl / summary.total_invested * 100.0
    } else {
        0.0
    };
    println!(
        "\nInvested ${:.2} | Current ${:.2} | PnL {:+.2} ({:+.2}%)",
        summary.total_invested, summary.total_value, summary.total_pnl, pct
    );
}
