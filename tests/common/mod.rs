#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;
use titan::domain::backtest::BacktestResult;
use titan::domain::error::TitanError;
use titan::domain::geometry::GeometryProfile;
pub use titan::domain::ohlcv::PriceBar;
use titan::domain::rating::RatingResult;
use titan::domain::resample::month_end;
use titan::ports::data_port::DataPort;
use titan::ports::report_port::ReportPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TitanError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TitanError::DataAccess {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TitanError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Report sink that records what it was asked to write.
#[derive(Default)]
pub struct RecordingReport {
    pub ratings: Vec<(String, Option<GeometryProfile>, RatingResult)>,
    pub backtests: Vec<(String, BacktestResult)>,
    pub rankings: Vec<(String, Vec<BacktestResult>)>,
}

impl ReportPort for RecordingReport {
    fn write_rating(
        &mut self,
        symbol: &str,
        profile: Option<&GeometryProfile>,
        rating: &RatingResult,
    ) -> Result<(), TitanError> {
        self.ratings
            .push((symbol.to_string(), profile.cloned(), rating.clone()));
        Ok(())
    }

    fn write_backtest(&mut self, symbol: &str, result: &BacktestResult) -> Result<(), TitanError> {
        self.backtests.push((symbol.to_string(), result.clone()));
        Ok(())
    }

    fn write_strategy_ranking(
        &mut self,
        symbol: &str,
        results: &[BacktestResult],
    ) -> Result<(), TitanError> {
        self.rankings.push((symbol.to_string(), results.to_vec()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting at `start_date`, close rising by one
/// per day.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| PriceBar {
            date: start + Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000.0,
        })
        .collect()
}

/// One bar per month-end from `start` with the given log prices.
pub fn monthly_from_logs(start: NaiveDate, logs: &[f64]) -> Vec<PriceBar> {
    let mut year = start.year();
    let mut month = start.month();
    logs.iter()
        .map(|&l| {
            let bar = PriceBar::flat(month_end(date(year, month, 1)), 100.0 * l.exp());
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
            bar
        })
        .collect()
}

/// Monthly series compounding at a constant log rate per month.
pub fn exponential_monthly(start: NaiveDate, months: usize, log_rate: f64) -> Vec<PriceBar> {
    let logs: Vec<f64> = (0..months).map(|i| log_rate * i as f64).collect();
    monthly_from_logs(start, &logs)
}

/// CSV text in the layout the CSV adapter reads.
pub fn to_csv(bars: &[PriceBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    out
}
