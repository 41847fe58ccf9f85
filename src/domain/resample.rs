//! Daily to monthly bar aggregation.
//!
//! Each calendar month present in the input becomes one bar dated on the
//! last calendar day of that month: open of the first bar, highest high,
//! lowest low, close of the last bar and summed volume. Months without any
//! input bar are skipped rather than filled.

use crate::domain::ohlcv::PriceBar;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

pub fn to_monthly(daily: &[PriceBar]) -> Vec<PriceBar> {
    let mut months: BTreeMap<(i32, u32), PriceBar> = BTreeMap::new();

    for bar in daily {
        let key = (bar.date.year(), bar.date.month());
        months
            .entry(key)
            .and_modify(|m| {
                m.high = m.high.max(bar.high);
                m.low = m.low.min(bar.low);
                m.close = bar.close;
                m.volume += bar.volume;
            })
            .or_insert_with(|| PriceBar {
                date: month_end(bar.date),
                ..bar.clone()
            });
    }

    months.into_values().collect()
}
