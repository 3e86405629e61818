//! Postgres-backed candle store over a shared connection pool.
//!
//! Table names are dynamic (one per symbol), so statements are built
//! with identifiers validated by [`table_name`] and values bound as
//! parameters. Each page is appended with a single `UNNEST` bulk
//! insert; `ON CONFLICT DO NOTHING` on the timestamp key makes
//! overlapping reruns idempotent.
//!
//! The pool is shared read-write-safe across all symbol loops. When
//! more loops run than the pool holds connections, loops queue for a
//! checkout between pages; that is bounded backpressure, not a
//! deadlock risk, since every call releases its connection on return.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::{
    config::DatabaseConfig,
    models::candle::Candle,
    storage::{CandleStore, StorageError, table::table_name},
};

pub struct PgCandleStore {
    pool: PgPool,
}

impl PgCandleStore {
    /// Connects a pool using the configured connection parameters.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url())
            .await?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool (tests, embedded use).
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandleStore for PgCandleStore {
    async fn ensure_table(&self, symbol: &str) -> Result<(), StorageError> {
        let table = table_name(symbol)?;
        let stmt = format!(
            r#"CREATE TABLE IF NOT EXISTS "{table}" (
                "timestamp" BIGINT PRIMARY KEY,
                open   DOUBLE PRECISION NOT NULL,
                high   DOUBLE PRECISION NOT NULL,
                low    DOUBLE PRECISION NOT NULL,
                close  DOUBLE PRECISION NOT NULL,
                volume DOUBLE PRECISION NOT NULL
            )"#
        );
        sqlx::query(&stmt).execute(&self.pool).await?;
        Ok(())
    }

    async fn max_timestamp(&self, symbol: &str) -> Result<Option<i64>, StorageError> {
        let table = table_name(symbol)?;
        let stmt = format!(r#"SELECT MAX("timestamp") FROM "{table}""#);
        let max: Option<i64> = sqlx::query_scalar(&stmt).fetch_one(&self.pool).await?;
        Ok(max)
    }

    async fn append_candles(&self, symbol: &str, candles: &[Candle]) -> Result<u64, StorageError> {
        if candles.is_empty() {
            return Ok(0);
        }

        let table = table_name(symbol)?;

        let mut timestamps = Vec::with_capacity(candles.len());
        let mut opens = Vec::with_capacity(candles.len());
        let mut highs = Vec::with_capacity(candles.len());
        let mut lows = Vec::with_capacity(candles.len());
        let mut closes = Vec::with_capacity(candles.len());
        let mut volumes = Vec::with_capacity(candles.len());
        for c in candles {
            timestamps.push(c.timestamp);
            opens.push(c.open);
            highs.push(c.high);
            lows.push(c.low);
            closes.push(c.close);
            volumes.push(c.volume);
        }

        let stmt = format!(
            r#"INSERT INTO "{table}" ("timestamp", open, high, low, close, volume)
               SELECT * FROM UNNEST(
                   $1::bigint[], $2::float8[], $3::float8[],
                   $4::float8[], $5::float8[], $6::float8[]
               )
               ON CONFLICT ("timestamp") DO NOTHING"#
        );

        let result = sqlx::query(&stmt)
            .bind(&timestamps)
            .bind(&opens)
            .bind(&highs)
            .bind(&lows)
            .bind(&closes)
            .bind(&volumes)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
