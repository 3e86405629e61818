use thiserror::Error;

use crate::{exchange::ExchangeError, storage::StorageError};

/// The unified error type for the `candle_ingestor` crate.
///
/// Per-symbol loop failures are carried as one of these; only
/// configuration and catalog-level errors abort a whole run.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the exchange client (network, API, decoding).
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// An error originating from the candle store.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A CSV export error.
    #[error("CSV export failed")]
    Csv(#[from] csv::Error),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// A per-symbol task ended abnormally (panic or runtime shutdown).
    #[error("Symbol task aborted: {0}")]
    Task(String),
}
