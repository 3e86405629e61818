//! Binance USDⓈ-M futures REST client.
//!
//! Talks to `fapi.binance.com` for the instrument catalog
//! (`/fapi/v1/exchangeInfo`) and one-minute klines (`/fapi/v1/klines`).
//! Every request passes through an internal direct rate limiter so the
//! concurrent per-symbol loops share one request budget; the limiter is
//! the actual throughput governor of a run, not the task scheduler.

pub mod response;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use indexmap::IndexMap;
use nonzero_ext::nonzero;
use reqwest::Client;
use serde_json::Value;

use crate::{
    exchange::{ExchangeClient, ExchangeError},
    models::{candle::Candle, instrument::Instrument},
};

const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

/// Candle granularity; the pipeline ingests one-minute candles only.
const INTERVAL: &str = "1m";

/// Shared request budget across all symbol loops. Well under the
/// exchange's published request-weight limit for klines.
const REQUESTS_PER_SECOND: u32 = 10;

pub struct BinanceFutures {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl BinanceFutures {
    /// Creates a client against the production futures API.
    pub fn new() -> Result<Self, ExchangeError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (testnet, local stub).
    pub fn with_base_url(base_url: &str) -> Result<Self, ExchangeError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(Quota::per_second(nonzero!(REQUESTS_PER_SECOND))),
        })
    }

    /// Maps a unified symbol to the exchange-native form used in
    /// request parameters: `BTC/USDT` becomes `BTCUSDT`, and a dated
    /// contract like `BTC/USDT-240927` becomes `BTCUSDT_240927`. This
    /// is the exact inverse of how [`response::instrument_from_entry`]
    /// derives the unified symbol, so it reproduces
    /// [`Instrument::exchange_symbol`] for every catalog entry.
    fn wire_symbol(symbol: &str) -> String {
        symbol
            .chars()
            .filter(|c| *c != '/')
            .map(|c| if c == '-' { '_' } else { c })
            .collect()
    }
}

#[async_trait]
impl ExchangeClient for BinanceFutures {
    async fn list_instruments(&self) -> Result<IndexMap<String, Instrument>, ExchangeError> {
        self.limiter.until_ready().await;

        let url = format!("{}/fapi/v1/exchangeInfo", self.base_url);
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ExchangeError::Api { status, body });
        }

        let info: response::ExchangeInfo = resp.json().await?;
        response::catalog_from_entries(&info.symbols)
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        since_ms: i64,
        limit: u32,
    ) -> Result<Vec<Candle>, ExchangeError> {
        self.limiter.until_ready().await;

        let url = format!("{}/fapi/v1/klines", self.base_url);
        let query = [
            ("symbol", Self::wire_symbol(symbol)),
            ("interval", INTERVAL.to_string()),
            ("startTime", since_ms.to_string()),
            ("limit", limit.to_string()),
        ];
        let resp = self.client.get(&url).query(&query).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(response::classify_api_error(status, body, symbol));
        }

        let rows: Vec<Vec<Value>> = resp.json().await?;
        response::candles_from_klines(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_symbol_strips_separator() {
        assert_eq!(BinanceFutures::wire_symbol("BTC/USDT"), "BTCUSDT");
        assert_eq!(BinanceFutures::wire_symbol("BTCUSDT"), "BTCUSDT");
    }

    #[test]
    fn wire_symbol_restores_delivery_suffix() {
        assert_eq!(
            BinanceFutures::wire_symbol("BTC/USDT-240927"),
            "BTCUSDT_240927"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = BinanceFutures::with_base_url("http://localhost:9000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
