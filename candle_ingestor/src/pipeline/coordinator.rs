//! Concurrent fan-out of drain loops across symbols.

use std::{path::PathBuf, sync::Arc};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    errors::Error,
    exchange::ExchangeClient,
    export::CsvExporter,
    pipeline::{DrainOptions, SymbolReport, SymbolStatus, drain_symbol},
    storage::CandleStore,
};

/// Aggregate outcome of one run: every symbol's terminal report.
#[derive(Debug)]
pub struct RunSummary {
    pub reports: Vec<SymbolReport>,
}

impl RunSummary {
    pub fn drained(&self) -> usize {
        self.reports.iter().filter(|r| r.is_drained()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failed()).count()
    }

    pub fn cancelled(&self) -> usize {
        self.reports.iter().filter(|r| r.is_cancelled()).count()
    }

    pub fn total_rows(&self) -> u64 {
        self.reports.iter().map(|r| r.rows).sum()
    }
}

/// Runs one drain loop per symbol concurrently and waits for all of
/// them to reach a terminal state.
///
/// Failures are contained inside each loop; the coordinator itself
/// never fails, it only collects reports. Across symbols there is no
/// ordering guarantee — report order is completion order.
pub async fn run_once(
    exchange: Arc<dyn ExchangeClient>,
    store: Arc<dyn CandleStore>,
    symbols: &[String],
    opts: &DrainOptions,
    cancel: &CancellationToken,
    export_dir: Option<&PathBuf>,
) -> RunSummary {
    let mut tasks = JoinSet::new();

    for symbol in symbols {
        let symbol = symbol.clone();
        let exchange = Arc::clone(&exchange);
        let store = Arc::clone(&store);
        let opts = opts.clone();
        let cancel = cancel.clone();
        let export_dir = export_dir.cloned();

        tasks.spawn(async move {
            let mut exporter = match export_dir
                .as_deref()
                .map(|dir| CsvExporter::create(dir, &symbol))
                .transpose()
            {
                Ok(exporter) => exporter,
                Err(err) => {
                    return SymbolReport {
                        symbol,
                        status: SymbolStatus::Failed(err),
                        rows: 0,
                    };
                }
            };

            let report = drain_symbol(
                exchange.as_ref(),
                store.as_ref(),
                &symbol,
                &opts,
                &cancel,
                exporter.as_mut(),
            )
            .await;

            if let Some(exporter) = exporter {
                match exporter.finish() {
                    Ok((rows, path)) => {
                        tracing::info!(symbol = %report.symbol, rows, path = %path.display(), "CSV written");
                    }
                    Err(err) => {
                        tracing::warn!(symbol = %report.symbol, error = %err, "CSV flush failed");
                    }
                }
            }

            report
        });
    }

    let mut reports = Vec::with_capacity(symbols.len());
    while let Some(joined) = tasks.join_next().await {
        let report = joined.unwrap_or_else(|err| SymbolReport {
            // A panicked task has already lost its symbol name.
            symbol: "<unknown>".to_string(),
            status: SymbolStatus::Failed(Error::Task(err.to_string())),
            rows: 0,
        });

        match &report.status {
            SymbolStatus::Drained => {
                tracing::info!(symbol = %report.symbol, rows = report.rows, "drained");
            }
            SymbolStatus::Failed(err) => {
                tracing::error!(symbol = %report.symbol, rows = report.rows, error = %err, "failed");
            }
            SymbolStatus::Cancelled => {
                tracing::warn!(symbol = %report.symbol, rows = report.rows, "cancelled");
            }
        }
        reports.push(report);
    }

    RunSummary { reports }
}
