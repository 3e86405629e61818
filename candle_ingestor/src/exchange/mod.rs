//! Exchange client abstraction.
//!
//! This module defines the [`ExchangeClient`] trait, the unified
//! capability the ingestion pipeline consumes for symbol discovery and
//! candle fetching. Each concrete implementation (currently
//! [`binance::BinanceFutures`]) handles its own wire format and rate
//! limiting; the pipeline only sees ordered pages of [`Candle`]s.
//!
//! The trait is async and supports dynamic dispatch
//! (`dyn ExchangeClient`) so tests can substitute scripted exchanges.

pub mod binance;
pub mod errors;

pub use errors::ExchangeError;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::models::{candle::Candle, instrument::Instrument};

#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Loads the full instrument catalog, keyed by unified symbol.
    ///
    /// Called once at pipeline start; the result is an immutable
    /// snapshot for the whole run.
    async fn list_instruments(&self) -> Result<IndexMap<String, Instrument>, ExchangeError>;

    /// Fetches up to `limit` one-minute candles for `symbol`, starting
    /// at `since_ms` (inclusive, epoch milliseconds).
    ///
    /// The returned page is ordered by non-decreasing timestamp and may
    /// be empty, which signals exhausted history.
    async fn fetch_candles(
        &self,
        symbol: &str,
        since_ms: i64,
        limit: u32,
    ) -> Result<Vec<Candle>, ExchangeError>;
}
