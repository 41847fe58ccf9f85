//! Price bar representation.

use chrono::NaiveDate;

/// One observation of an instrument. Daily and monthly series share this
/// shape; a series is a slice ordered by strictly increasing date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Bar whose open, high, low and close all equal `close`.
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    /// close / prev_close - 1
    pub fn pct_change(&self, prev_close: f64) -> f64 {
        self.close / prev_close - 1.0
    }
}
