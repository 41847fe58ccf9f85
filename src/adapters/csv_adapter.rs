//! CSV file data adapter.
//!
//! Reads `<SYMBOL>.csv` files from a directory. Each file has the header
//! `date,open,high,low,close,volume` with `YYYY-MM-DD` dates. Rows may appear
//! in any order; they are sorted by date and repeated dates keep the first
//! row.

use crate::domain::error::TitanError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, TitanError> {
    record
        .get(index)
        .ok_or_else(|| TitanError::DataAccess {
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| TitanError::DataAccess {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TitanError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TitanError::DataAccess {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TitanError::DataAccess {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TitanError::DataAccess {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                TitanError::DataAccess {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        let mut seen = HashSet::new();
        bars.retain(|b| seen.insert(b.date));

        tracing::debug!("{}: read {} bars from {}", symbol, bars.len(), path.display());
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TitanError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TitanError::DataAccess {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TitanError::DataAccess {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
