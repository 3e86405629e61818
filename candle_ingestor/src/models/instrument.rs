//! Immutable snapshot of a tradable instrument from the exchange catalog.

use serde::{Deserialize, Serialize};

/// Contract-type tag marking a perpetual futures instrument in the
/// exchange metadata.
pub const PERPETUAL: &str = "PERPETUAL";

/// One instrument from the exchange catalog, fetched once per run.
///
/// `symbol` is the unified display form (e.g. `"BTC/USDT"`);
/// `exchange_symbol` is the exchange-native identifier used on the wire
/// (e.g. `"BTCUSDT"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    /// Unified symbol, base and quote separated by `/`.
    pub symbol: String,

    /// Exchange-native symbol as sent in API requests.
    pub exchange_symbol: String,

    /// Contract-type tag from the exchange metadata (e.g. `"PERPETUAL"`).
    pub contract_type: String,

    /// The exchange-native metadata blob, kept verbatim.
    pub info: serde_json::Value,
}

impl Instrument {
    /// Whether the exchange tags this instrument as a perpetual contract.
    pub fn is_perpetual(&self) -> bool {
        self.contract_type == PERPETUAL
    }
}
