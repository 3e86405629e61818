//! Symbol-to-table-identifier mapping.

use crate::storage::StorageError;

/// Derives the table identifier for a symbol.
///
/// Separator characters (`/`, `:`, `-`) are stripped, so `"BTC/USDT"`
/// becomes `"BTCUSDT"`. The remainder must be non-empty ASCII
/// alphanumeric or underscore; anything else is rejected rather than
/// interpolated into SQL.
pub fn table_name(symbol: &str) -> Result<String, StorageError> {
    let name: String = symbol
        .chars()
        .filter(|c| !matches!(c, '/' | ':' | '-'))
        .collect();

    if name.is_empty() {
        return Err(StorageError::InvalidIdentifier {
            symbol: symbol.to_string(),
            reason: "empty after stripping separators".to_string(),
        });
    }

    if let Some(bad) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(StorageError::InvalidIdentifier {
            symbol: symbol.to_string(),
            reason: format!("contains {bad:?}"),
        });
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators() {
        assert_eq!(table_name("BTC/USDT").unwrap(), "BTCUSDT");
        assert_eq!(table_name("BTC/USDT:USDT").unwrap(), "BTCUSDTUSDT");
        assert_eq!(table_name("1000SHIB/USDT").unwrap(), "1000SHIBUSDT");
    }

    #[test]
    fn underscore_is_allowed() {
        assert_eq!(table_name("BTC_PERP").unwrap(), "BTC_PERP");
    }

    #[test]
    fn rejects_quote_injection() {
        assert!(table_name("BTC\"USDT").is_err());
        assert!(table_name("BTC USDT").is_err());
        assert!(table_name("BTC;DROP").is_err());
    }

    #[test]
    fn rejects_separator_only_symbol() {
        let err = table_name("//").unwrap_err();
        assert!(matches!(err, StorageError::InvalidIdentifier { .. }));
    }
}
