//! The ingestion core: cursor recovery, the paginated drain loop, and
//! concurrent fan-out across symbols.
//!
//! One logical loop runs per symbol: resolve the cursor from storage,
//! fetch a page from the exchange, append it, advance, repeat until the
//! exchange returns an empty page. Loops are independent; a failure in
//! one never aborts its siblings. Every loop ends in exactly one
//! terminal state, captured as a [`SymbolReport`].

pub mod coordinator;
pub mod cursor;
pub mod drain;
pub mod poll;

pub use coordinator::{RunSummary, run_once};
pub use cursor::resolve_cursor;
pub use drain::{DrainOptions, drain_symbol};
pub use poll::run_continuous;

use crate::errors::Error;

/// Terminal state of one symbol's ingestion loop.
#[derive(Debug)]
pub enum SymbolStatus {
    /// The exchange returned an empty page; history is exhausted.
    Drained,
    /// The loop ended early on a contained per-symbol error.
    Failed(Error),
    /// An external shutdown signal was observed mid-loop.
    Cancelled,
}

/// Outcome of one symbol's loop: the terminal status plus the
/// cumulative number of rows persisted during this run.
#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub status: SymbolStatus,
    pub rows: u64,
}

impl SymbolReport {
    pub fn is_drained(&self) -> bool {
        matches!(self.status, SymbolStatus::Drained)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SymbolStatus::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.status, SymbolStatus::Cancelled)
    }
}
