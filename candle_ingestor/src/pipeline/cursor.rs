//! Per-symbol cursor recovery.
//!
//! There is no separate checkpoint store: the symbol table's own
//! maximum timestamp is the checkpoint, recomputed at every loop start.
//! That is also the crash-recovery mechanism — a run killed mid-symbol
//! resumes from exactly the last committed page.

use crate::storage::{CandleStore, StorageError};

/// Resolves the next timestamp to fetch for `symbol`.
///
/// Ensures the table exists, then returns one past the maximum stored
/// timestamp (exclusive resume — a committed timestamp is never fetched
/// again), or `0` for an empty table (start of history).
pub async fn resolve_cursor(store: &dyn CandleStore, symbol: &str) -> Result<i64, StorageError> {
    store.ensure_table(symbol).await?;
    let max = store.max_timestamp(symbol).await?;
    Ok(max.map_or(0, |ts| ts + 1))
}
