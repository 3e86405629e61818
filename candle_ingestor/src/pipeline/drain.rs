//! The per-symbol fetch-and-append loop.

use std::time::Duration;

use chrono::DateTime;
use tokio_util::sync::CancellationToken;

use crate::{
    config::FetchConfig,
    errors::Error,
    exchange::ExchangeClient,
    export::CsvExporter,
    pipeline::{SymbolReport, SymbolStatus, resolve_cursor},
    storage::CandleStore,
};

/// Tuning for one drain loop.
#[derive(Debug, Clone)]
pub struct DrainOptions {
    /// Candles requested per page.
    pub page_limit: u32,
    /// Cooperative pause between pages.
    pub page_delay: Duration,
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for DrainOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            page_limit: cfg.page_limit,
            page_delay: Duration::from_millis(cfg.page_delay_ms),
        }
    }
}

/// Drains all available history for one symbol, starting from the
/// cursor recovered out of storage.
///
/// Loop invariant: the cursor only moves once a page's write has been
/// confirmed, so the stored max timestamp always equals true progress.
/// An empty page is the terminal `Drained` state; errors and
/// cancellation end the loop early with their own terminal states. All
/// errors are captured in the returned report, never propagated — that
/// is what isolates sibling symbol loops from each other.
pub async fn drain_symbol(
    exchange: &dyn ExchangeClient,
    store: &dyn CandleStore,
    symbol: &str,
    opts: &DrainOptions,
    cancel: &CancellationToken,
    csv: Option<&mut CsvExporter>,
) -> SymbolReport {
    let mut rows: u64 = 0;
    let status = match drain_inner(exchange, store, symbol, opts, cancel, csv, &mut rows).await {
        Ok(Terminal::Drained) => SymbolStatus::Drained,
        Ok(Terminal::Cancelled) => SymbolStatus::Cancelled,
        Err(err) => SymbolStatus::Failed(err),
    };
    SymbolReport {
        symbol: symbol.to_string(),
        status,
        rows,
    }
}

enum Terminal {
    Drained,
    Cancelled,
}

async fn drain_inner(
    exchange: &dyn ExchangeClient,
    store: &dyn CandleStore,
    symbol: &str,
    opts: &DrainOptions,
    cancel: &CancellationToken,
    mut csv: Option<&mut CsvExporter>,
    rows: &mut u64,
) -> Result<Terminal, Error> {
    let mut cursor = resolve_cursor(store, symbol).await?;
    tracing::debug!(symbol, cursor, "resuming");

    loop {
        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(Terminal::Cancelled),
            page = exchange.fetch_candles(symbol, cursor, opts.page_limit) => page?,
        };

        let Some(last) = page.last() else {
            return Ok(Terminal::Drained);
        };
        let last_ts = last.timestamp;

        // The page write is a single atomic statement; the cursor moves
        // only after it returns.
        let written = store.append_candles(symbol, &page).await?;
        *rows += written;
        if let Some(exporter) = csv.as_deref_mut() {
            exporter.append(&page)?;
        }
        cursor = last_ts + 1;

        tracing::info!(symbol, rows = *rows, through = %format_ms(last_ts), "page committed");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(Terminal::Cancelled),
            _ = tokio::time::sleep(opts.page_delay) => {}
        }
    }
}

fn format_ms(ts: i64) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}
