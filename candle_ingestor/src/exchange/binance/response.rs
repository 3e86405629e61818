//! Decoding of Binance futures REST payloads.
//!
//! Kline rows come back as heterogeneous JSON arrays (timestamps as
//! numbers, prices as strings), so they are decoded by hand rather
//! than with a derived struct.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    exchange::ExchangeError,
    models::{candle::Candle, instrument::Instrument},
};

/// Binance error code for a symbol the exchange does not recognize.
const INVALID_SYMBOL_CODE: i64 = -1121;

/// Response envelope of `/fapi/v1/exchangeInfo`.
///
/// Each entry is kept as a raw `Value` so the full metadata blob can be
/// preserved on the [`Instrument`].
#[derive(Debug, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<Value>,
}

/// Builds the instrument catalog from `exchangeInfo` symbol entries.
///
/// The map is keyed by the exchange-native symbol, which the exchange
/// guarantees unique. Keying by the unified pair would let a delivery
/// contract (`BTCUSDT_240927`, same base and quote) overwrite the
/// perpetual (`BTCUSDT`) and silently drop it from an "all" run.
pub fn catalog_from_entries(
    entries: &[Value],
) -> Result<IndexMap<String, Instrument>, ExchangeError> {
    let mut catalog = IndexMap::with_capacity(entries.len());
    for entry in entries {
        let inst = instrument_from_entry(entry)?;
        catalog.insert(inst.exchange_symbol.clone(), inst);
    }
    Ok(catalog)
}

/// Builds an [`Instrument`] from one `exchangeInfo` symbol entry.
///
/// The unified symbol is `baseAsset/quoteAsset`, with the delivery
/// suffix of a dated contract carried over (`BTC/USDT-240927`) so
/// unified symbols stay distinct within a pair. `contractType` is
/// absent on some non-futures entries and defaults to empty (never
/// matching the perpetual tag).
pub fn instrument_from_entry(entry: &Value) -> Result<Instrument, ExchangeError> {
    let field = |name: &str| -> Result<&str, ExchangeError> {
        entry
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ExchangeError::Malformed(format!("exchangeInfo entry missing `{name}`")))
    };

    let exchange_symbol = field("symbol")?.to_string();
    let base = field("baseAsset")?;
    let quote = field("quoteAsset")?;
    let contract_type = entry
        .get("contractType")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let symbol = match exchange_symbol.split_once('_') {
        Some((_, suffix)) => format!("{base}/{quote}-{suffix}"),
        None => format!("{base}/{quote}"),
    };

    Ok(Instrument {
        symbol,
        exchange_symbol,
        contract_type,
        info: entry.clone(),
    })
}

/// Converts raw `/fapi/v1/klines` rows into [`Candle`]s.
///
/// Only the first six elements of each row are used (open time and
/// OHLCV); the close time and trade statistics that follow are ignored.
pub fn candles_from_klines(rows: Vec<Vec<Value>>) -> Result<Vec<Candle>, ExchangeError> {
    rows.iter().map(|row| candle_from_row(row)).collect()
}

fn candle_from_row(row: &[Value]) -> Result<Candle, ExchangeError> {
    if row.len() < 6 {
        return Err(ExchangeError::Malformed(format!(
            "kline row has {} elements, expected at least 6",
            row.len()
        )));
    }

    let timestamp = row[0].as_i64().ok_or_else(|| {
        ExchangeError::Malformed(format!("kline open time is not an integer: {}", row[0]))
    })?;

    Ok(Candle {
        timestamp,
        open: decimal_field(&row[1], "open")?,
        high: decimal_field(&row[2], "high")?,
        low: decimal_field(&row[3], "low")?,
        close: decimal_field(&row[4], "close")?,
        volume: decimal_field(&row[5], "volume")?,
    })
}

// Binance encodes prices as decimal strings; tolerate plain numbers too.
fn decimal_field(value: &Value, name: &str) -> Result<f64, ExchangeError> {
    match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .ok_or_else(|| ExchangeError::Malformed(format!("kline {name} is not a decimal: {value}")))
}

/// Classifies a non-success API response, distinguishing the
/// invalid-symbol error so the pipeline can report it per-symbol.
pub fn classify_api_error(status: u16, body: String, symbol: &str) -> ExchangeError {
    if let Ok(err) = serde_json::from_str::<Value>(&body) {
        if err.get("code").and_then(Value::as_i64) == Some(INVALID_SYMBOL_CODE) {
            return ExchangeError::UnknownSymbol(symbol.to_string());
        }
    }
    ExchangeError::Api { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_kline_rows() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([
            [
                1499040000000i64,
                "0.01634790",
                "0.80000000",
                "0.01575800",
                "0.02000000",
                "148976.11427815",
                1499040059999i64,
                "2434.19055334",
                308,
                "1756.87402397",
                "28.46694368",
                "0"
            ]
        ]))
        .unwrap();

        let candles = candles_from_klines(rows).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].timestamp, 1_499_040_000_000);
        assert_eq!(candles[0].open, 0.0163479);
        assert_eq!(candles[0].volume, 148_976.11427815);
    }

    #[test]
    fn short_row_is_malformed() {
        let rows = vec![vec![json!(1499040000000i64), json!("1.0")]];
        let err = candles_from_klines(rows).unwrap_err();
        assert!(matches!(err, ExchangeError::Malformed(_)));
    }

    #[test]
    fn non_decimal_price_is_malformed() {
        let rows = vec![vec![
            json!(1499040000000i64),
            json!("not-a-price"),
            json!("1"),
            json!("1"),
            json!("1"),
            json!("1"),
        ]];
        assert!(matches!(
            candles_from_klines(rows).unwrap_err(),
            ExchangeError::Malformed(_)
        ));
    }

    #[test]
    fn builds_instrument_from_exchange_info_entry() {
        let entry = json!({
            "symbol": "BTCUSDT",
            "baseAsset": "BTC",
            "quoteAsset": "USDT",
            "contractType": "PERPETUAL",
            "status": "TRADING"
        });
        let inst = instrument_from_entry(&entry).unwrap();
        assert_eq!(inst.symbol, "BTC/USDT");
        assert_eq!(inst.exchange_symbol, "BTCUSDT");
        assert!(inst.is_perpetual());
        assert_eq!(inst.info["status"], "TRADING");
    }

    #[test]
    fn delivery_contract_keeps_suffix_in_unified_symbol() {
        let entry = json!({
            "symbol": "BTCUSDT_240927",
            "baseAsset": "BTC",
            "quoteAsset": "USDT",
            "contractType": "CURRENT_QUARTER"
        });
        let inst = instrument_from_entry(&entry).unwrap();
        assert_eq!(inst.symbol, "BTC/USDT-240927");
        assert!(!inst.is_perpetual());
    }

    #[test]
    fn catalog_keeps_perpetual_alongside_delivery_contracts() {
        use crate::catalog::select_symbols;
        use crate::models::selection::SymbolSelection;

        // Same base/quote pair, listed with the quarterly after the
        // perpetual as exchangeInfo does; neither may shadow the other.
        let entries = vec![
            json!({
                "symbol": "BTCUSDT",
                "baseAsset": "BTC",
                "quoteAsset": "USDT",
                "contractType": "PERPETUAL"
            }),
            json!({
                "symbol": "BTCUSDT_240927",
                "baseAsset": "BTC",
                "quoteAsset": "USDT",
                "contractType": "CURRENT_QUARTER"
            }),
        ];

        let catalog = catalog_from_entries(&entries).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog["BTCUSDT"].is_perpetual());
        assert!(!catalog["BTCUSDT_240927"].is_perpetual());

        let selected = select_symbols(&catalog, &SymbolSelection::All);
        assert_eq!(selected, vec!["BTC/USDT"]);
    }

    #[test]
    fn missing_contract_type_is_not_perpetual() {
        let entry = json!({
            "symbol": "BTCUSDT",
            "baseAsset": "BTC",
            "quoteAsset": "USDT"
        });
        let inst = instrument_from_entry(&entry).unwrap();
        assert!(!inst.is_perpetual());
    }

    #[test]
    fn invalid_symbol_code_maps_to_unknown_symbol() {
        let body = r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string();
        let err = classify_api_error(400, body, "NOPE/USDT");
        assert!(matches!(err, ExchangeError::UnknownSymbol(s) if s == "NOPE/USDT"));
    }

    #[test]
    fn other_api_errors_keep_status_and_body() {
        let err = classify_api_error(418, "banned".to_string(), "BTC/USDT");
        assert!(matches!(err, ExchangeError::Api { status: 418, .. }));
    }
}
