//! Incremental, resumable ingestion of minute-resolution OHLCV candles
//! for perpetual-futures symbols into per-symbol Postgres tables.
//!
//! The crate is organized around two narrow collaborator capabilities —
//! [`exchange::ExchangeClient`] and [`storage::CandleStore`] — and one
//! ingestion core in [`pipeline`] that drives them: recover a per-symbol
//! cursor from the table's own max timestamp, fetch bounded pages from
//! that cursor, append each page before advancing, and fan the loop out
//! concurrently across symbols with per-symbol failure isolation.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod exchange;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod storage;
