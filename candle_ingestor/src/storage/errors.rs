use thiserror::Error;

/// Errors that can occur within a `CandleStore` implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A database error (connection, statement execution).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The symbol cannot be mapped to a valid table identifier.
    #[error("Invalid table identifier for symbol {symbol:?}: {reason}")]
    InvalidIdentifier {
        /// The offending symbol.
        symbol: String,
        /// Why it was rejected.
        reason: String,
    },
}
