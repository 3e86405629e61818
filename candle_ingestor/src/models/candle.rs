//! Canonical in-memory representation of a one-interval OHLCV candle.
//!
//! This struct is the standard currency between the
//! [`ExchangeClient`](crate::exchange::ExchangeClient) and the
//! [`CandleStore`](crate::storage::CandleStore), regardless of which
//! exchange produced it.

use serde::{Deserialize, Serialize};

/// A single OHLCV candle for one time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time of the interval, milliseconds since the Unix epoch.
    pub timestamp: i64,

    /// Opening price.
    pub open: f64,

    /// Highest price during the interval.
    pub high: f64,

    /// Lowest price during the interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Base-asset volume traded during the interval.
    pub volume: f64,
}
