//! Moving-average indicators used by the strategy signals.
//!
//! - `IndicatorPoint`: a single point with a `valid` flag for warm-up bars
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values aligned to the bars

pub mod sma;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at `index`, `None` during warm-up or past the end.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn get_skips_invalid_points() {
        let series = IndicatorSeries {
            indicator_type: IndicatorType::Sma(2),
            values: vec![
                IndicatorPoint {
                    valid: false,
                    value: 0.0,
                },
                IndicatorPoint {
                    valid: true,
                    value: 1.5,
                },
            ],
        };
        assert_eq!(series.get(0), None);
        assert_eq!(series.get(1), Some(1.5));
        assert_eq!(series.get(2), None);
    }
}
