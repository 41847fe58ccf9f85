//! Trailing window extraction.

use crate::domain::ohlcv::PriceBar;

/// The last `months` bars of a monthly series, or the whole series when it
/// is shorter. Empty input gives an empty slice.
pub fn trailing(series: &[PriceBar], months: usize) -> &[PriceBar] {
    let start = series.len().saturating_sub(months);
    &series[start..]
}
