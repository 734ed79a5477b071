// src/edgar/cik.rs
use crate::edgar::models::{FilerId, TickerSymbol};
use once_cell::sync::Lazy;
use std::collections::HashMap;

// Bundled reference table: uppercase ticker -> zero-padded CIK string.
const TICKER_TABLE_JSON: &str = include_str!("../../data/ticker_to_cik.json");

static TICKER_TO_CIK: Lazy<HashMap<String, FilerId>> = Lazy::new(|| {
    let raw: HashMap<String, String> = match serde_json::from_str(TICKER_TABLE_JSON) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!("Bundled ticker table is not valid JSON: {}", e);
            return HashMap::new();
        }
    };

    raw.into_iter()
        .filter_map(|(ticker, cik)| match FilerId::parse(&cik) {
            Some(id) => Some((ticker.to_uppercase(), id)),
            None => {
                tracing::warn!("Skipping ticker table entry {} with non-numeric CIK {:?}", ticker, cik);
                None
            }
        })
        .collect()
});

/// Looks up the filer identifier for a ticker in the bundled table.
/// Input is normalized before lookup; `None` means the ticker is unknown.
pub fn resolve(ticker: &str) -> Option<FilerId> {
    resolve_symbol(&TickerSymbol::new(ticker))
}

pub fn resolve_symbol(ticker: &TickerSymbol) -> Option<FilerId> {
    let found = TICKER_TO_CIK.get(ticker.as_str()).copied();
    if found.is_none() {
        tracing::debug!("Ticker {} not present in bundled CIK table", ticker);
    }
    found
}
