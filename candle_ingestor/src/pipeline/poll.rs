//! Continuous polling mode.
//!
//! Layered on top of the one-shot drain: alternate a full drain cycle
//! (Draining) with a timer (Idle-Wait) until cancelled. The core fetch
//! loop knows nothing about this — each cycle re-resolves every cursor
//! from storage and picks up whatever new candles have appeared.

use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    exchange::ExchangeClient,
    pipeline::{DrainOptions, RunSummary, run_once},
    storage::CandleStore,
};

/// Repeatedly drains all symbols, idling `idle_wait` between cycles.
///
/// Returns the summary of the last completed cycle once cancellation
/// is observed.
pub async fn run_continuous(
    exchange: Arc<dyn ExchangeClient>,
    store: Arc<dyn CandleStore>,
    symbols: &[String],
    opts: &DrainOptions,
    cancel: &CancellationToken,
    export_dir: Option<&PathBuf>,
    idle_wait: Duration,
) -> RunSummary {
    loop {
        let summary = run_once(
            Arc::clone(&exchange),
            Arc::clone(&store),
            symbols,
            opts,
            cancel,
            export_dir,
        )
        .await;

        tracing::info!(
            drained = summary.drained(),
            failed = summary.failed(),
            rows = summary.total_rows(),
            idle_secs = idle_wait.as_secs(),
            "cycle complete"
        );

        if cancel.is_cancelled() {
            return summary;
        }
        tokio::select! {
            _ = cancel.cancelled() => return summary,
            _ = tokio::time::sleep(idle_wait) => {}
        }
    }
}
