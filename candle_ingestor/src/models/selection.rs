//! Which symbols a run should ingest.

use std::{convert::Infallible, str::FromStr};

/// Symbol selection given on the command line.
///
/// The literal token `all` (case-insensitive) selects every perpetual
/// instrument in the catalog; anything else is taken as a
/// comma-separated list of unified symbols, used verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSelection {
    /// Every perpetual instrument the exchange lists.
    All,
    /// An explicit list of symbols, not validated against the catalog.
    Explicit(Vec<String>),
}

impl FromStr for SymbolSelection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SymbolSelection::All);
        }
        let symbols = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(SymbolSelection::Explicit(symbols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_is_case_insensitive() {
        assert_eq!("all".parse::<SymbolSelection>().unwrap(), SymbolSelection::All);
        assert_eq!("ALL".parse::<SymbolSelection>().unwrap(), SymbolSelection::All);
        assert_eq!(" All ".parse::<SymbolSelection>().unwrap(), SymbolSelection::All);
    }

    #[test]
    fn comma_list_is_split_and_trimmed() {
        let sel = "BTC/USDT, ETH/USDT".parse::<SymbolSelection>().unwrap();
        assert_eq!(
            sel,
            SymbolSelection::Explicit(vec!["BTC/USDT".into(), "ETH/USDT".into()])
        );
    }

    #[test]
    fn empty_entries_are_dropped() {
        let sel = "BTC/USDT,,".parse::<SymbolSelection>().unwrap();
        assert_eq!(sel, SymbolSelection::Explicit(vec!["BTC/USDT".into()]));
    }
}
