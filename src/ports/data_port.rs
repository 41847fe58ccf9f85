//! Price data access port.

use crate::domain::error::TitanError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` within the inclusive date range, ordered by
    /// date with no duplicate dates.
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TitanError>;

    fn list_symbols(&self) -> Result<Vec<String>, TitanError>;
}
