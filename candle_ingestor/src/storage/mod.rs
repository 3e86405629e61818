//! Candle persistence abstraction.
//!
//! The pipeline consumes storage through the narrow [`CandleStore`]
//! capability: ensure a symbol's table exists, read its maximum stored
//! timestamp (the resume checkpoint), and bulk-append a page. One table
//! per symbol is a deliberate denormalization for simple per-symbol
//! scans; [`table::table_name`] is the single place symbol-to-table
//! mapping happens.

pub mod errors;
pub mod postgres;
pub mod table;

pub use errors::StorageError;

use async_trait::async_trait;

use crate::models::candle::Candle;

#[async_trait]
pub trait CandleStore: Send + Sync {
    /// Creates the symbol's table if it does not exist. Idempotent:
    /// calling it again must not error or alter existing rows.
    async fn ensure_table(&self, symbol: &str) -> Result<(), StorageError>;

    /// Returns the maximum stored candle timestamp for the symbol, or
    /// `None` when the table is empty.
    async fn max_timestamp(&self, symbol: &str) -> Result<Option<i64>, StorageError>;

    /// Appends one page of candles in a single bulk statement and
    /// returns the number of rows actually persisted.
    ///
    /// Rows whose timestamp is already stored are skipped, so re-running
    /// from an overlapping cursor cannot duplicate data.
    async fn append_candles(&self, symbol: &str, candles: &[Candle]) -> Result<u64, StorageError>;
}
