use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use candle_ingestor::{
    catalog::select_symbols,
    config::IngestorConfig,
    exchange::{ExchangeClient, binance::BinanceFutures},
    models::selection::SymbolSelection,
    pipeline::{DrainOptions, SymbolStatus, run_continuous, run_once},
    storage::{CandleStore, postgres::PgCandleStore},
};

#[derive(Parser)]
#[command(author, version, about = "Incremental OHLCV candle ingestor for perpetual futures")]
struct Cli {
    /// Path to the config file (ingestor.toml)
    #[arg(short, long, required_unless_present = "list")]
    config: Option<String>,

    /// Print every perpetual symbol in the catalog and exit
    #[arg(long)]
    list: bool,

    /// Comma-separated list of symbols (e.g. "BTC/USDT,ETH/USDT"), or
    /// "all" for every perpetual contract in the catalog
    #[arg(long, default_value = "all")]
    symbols: String,

    /// Also mirror each downloaded page to <table>.csv
    #[arg(long)]
    export_csv: bool,

    /// Directory for CSV exports
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Keep re-polling all symbols instead of exiting after one drain
    #[arg(long)]
    watch: bool,

    /// Idle seconds between polling cycles (with --watch)
    #[arg(long, default_value = "300")]
    poll_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Setup-level failures below abort the whole run with a non-zero
    // exit; per-symbol failures later never do.
    let exchange: Arc<dyn ExchangeClient> =
        Arc::new(BinanceFutures::new().context("cannot build exchange client")?);
    let catalog = exchange
        .list_instruments()
        .await
        .context("cannot list exchange instruments")?;

    // Catalog-only mode: no config or storage needed.
    if cli.list {
        for symbol in select_symbols(&catalog, &SymbolSelection::All) {
            println!("{symbol}");
        }
        return Ok(());
    }

    let config_path = cli.config.as_deref().context("--config is required")?;
    let cfg = IngestorConfig::load(config_path)?;
    let store: Arc<dyn CandleStore> = Arc::new(
        PgCandleStore::connect(&cfg.database)
            .await
            .context("cannot open storage")?,
    );

    let selection: SymbolSelection = cli.symbols.parse()?;
    let symbols = select_symbols(&catalog, &selection);
    if symbols.is_empty() {
        tracing::warn!("no symbols selected; nothing to do");
        return Ok(());
    }
    tracing::info!(count = symbols.len(), "symbols selected");

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("shutdown signal received");
                cancel.cancel();
            }
        });
    }

    let opts = DrainOptions::from(&cfg.fetch);
    let export_dir = cli.export_csv.then(|| cli.export_dir.clone());

    let summary = if cli.watch {
        run_continuous(
            exchange,
            store,
            &symbols,
            &opts,
            &cancel,
            export_dir.as_ref(),
            Duration::from_secs(cli.poll_secs),
        )
        .await
    } else {
        run_once(exchange, store, &symbols, &opts, &cancel, export_dir.as_ref()).await
    };

    for report in &summary.reports {
        match &report.status {
            SymbolStatus::Drained => {
                println!("{}: drained ({} rows)", report.symbol, report.rows);
            }
            SymbolStatus::Failed(err) => {
                println!("{}: failed after {} rows: {err}", report.symbol, report.rows);
            }
            SymbolStatus::Cancelled => {
                println!("{}: cancelled after {} rows", report.symbol, report.rows);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_mode_does_not_require_config() {
        let cli = Cli::try_parse_from(["candle-ingestor", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_is_required_outside_list_mode() {
        assert!(Cli::try_parse_from(["candle-ingestor"]).is_err());
        let cli = Cli::try_parse_from(["candle-ingestor", "--config", "ingestor.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("ingestor.toml"));
        assert!(!cli.list);
    }
}
