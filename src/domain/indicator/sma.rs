//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n) / n
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_sma(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = period.saturating_sub(1);

    for i in 0..bars.len() {
        let valid = period > 0 && i >= warmup;

        let value = if valid {
            let window = &bars[i + 1 - period..=i];
            window.iter().map(|b| b.close).sum::<f64>() / period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint { valid, value });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
