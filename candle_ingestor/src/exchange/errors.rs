use thiserror::Error;

/// Errors that can occur within an `ExchangeClient` implementation.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// An error during an API request (e.g., network failure, timeout).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The exchange returned a non-success response.
    #[error("Exchange API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, usually an exchange error object.
        body: String,
    },

    /// The requested symbol is not known to the exchange.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// The response body did not match the expected wire format.
    #[error("Malformed exchange payload: {0}")]
    Malformed(String),
}
