//! Market catalog filtering.
//!
//! Turns the exchange's full instrument map plus a [`SymbolSelection`]
//! into the ordered, distinct set of symbols a run will process. With
//! [`SymbolSelection::All`] only instruments tagged as perpetual
//! contracts are kept, in catalog order; an explicit list passes
//! through verbatim (first occurrence wins on duplicates) and is left
//! for the fetcher to validate per-symbol.

use indexmap::IndexMap;

use crate::models::{instrument::Instrument, selection::SymbolSelection};

/// Selects the symbols to ingest for this run.
///
/// An empty result is not an error; it simply yields a no-op run.
pub fn select_symbols(
    catalog: &IndexMap<String, Instrument>,
    selection: &SymbolSelection,
) -> Vec<String> {
    match selection {
        SymbolSelection::All => catalog
            .values()
            .filter(|inst| inst.is_perpetual())
            .map(|inst| inst.symbol.clone())
            .collect(),
        SymbolSelection::Explicit(symbols) => {
            let mut seen = Vec::with_capacity(symbols.len());
            for s in symbols {
                if !seen.contains(s) {
                    seen.push(s.clone());
                }
            }
            seen
        }
    }
}
