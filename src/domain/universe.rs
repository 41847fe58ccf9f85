//! Symbol universe for batch runs.
//!
//! Parses symbol lists from configuration or the command line and loads each
//! symbol's daily series, skipping symbols that have no data or too little
//! history.

use crate::domain::error::TitanError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// A symbol together with its loaded daily bars.
#[derive(Debug, Clone)]
pub struct SymbolData {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize },
}

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct Universe {
    pub loaded: Vec<SymbolData>,
    pub skipped: Vec<SkippedSymbol>,
}

/// Load every symbol between `start_date` and `end_date`. Symbols with fewer
/// than `minimum_bars` bars are skipped; an error is returned only when no
/// symbol survives.
pub fn load_universe(
    data_port: &dyn DataPort,
    symbols: Vec<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    minimum_bars: usize,
) -> Result<Universe, TitanError> {
    let mut loaded = Vec::new();
    let mut skipped = Vec::new();

    for symbol in symbols {
        let bars = match data_port.fetch_daily(&symbol, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                tracing::warn!("skipping {} ({})", symbol, e);
                skipped.push(SkippedSymbol {
                    symbol,
                    reason: SkipReason::NoData,
                });
                continue;
            }
        };

        if bars.is_empty() {
            tracing::warn!("skipping {} (no data found)", symbol);
            skipped.push(SkippedSymbol {
                symbol,
                reason: SkipReason::NoData,
            });
            continue;
        }

        if bars.len() < minimum_bars {
            tracing::warn!(
                "skipping {} (only {} bars, minimum {} required)",
                symbol,
                bars.len(),
                minimum_bars
            );
            skipped.push(SkippedSymbol {
                symbol,
                reason: SkipReason::InsufficientBars { bars: bars.len() },
            });
            continue;
        }

        tracing::info!("{}: {} bars", symbol, bars.len());
        loaded.push(SymbolData { symbol, bars });
    }

    if loaded.is_empty() {
        return Err(TitanError::InsufficientData {
            symbol: "all".to_string(),
            bars: 0,
            minimum: minimum_bars,
        });
    }

    if !skipped.is_empty() {
        tracing::info!(
            "processing {} of {} symbols",
            loaded.len(),
            loaded.len() + skipped.len()
        );
    }

    Ok(Universe { loaded, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_symbols_basic() {
        let result = parse_symbols("AAPL,MSFT,2330").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT", "2330"]);
    }

    #[test]
    fn parse_symbols_trims_and_uppercases() {
        let result = parse_symbols("  aapl , msft ,nvda").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn parse_symbols_empty_token() {
        assert_eq!(parse_symbols("AAPL,,MSFT"), Err(UniverseError::EmptyToken));
        assert_eq!(parse_symbols(""), Err(UniverseError::EmptyToken));
    }

    #[test]
    fn parse_symbols_duplicate() {
        let result = parse_symbols("AAPL,MSFT,aapl");
        assert!(matches!(result, Err(UniverseError::DuplicateSymbol(s)) if s == "AAPL"));
    }
}
