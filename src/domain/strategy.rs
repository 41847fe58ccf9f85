//! Moving-average strategy catalog.
//!
//! Every strategy maps a daily series to a long/flat signal per bar. The
//! backtest holds yesterday's signal today. Comparisons against a moving
//! average that is still warming up are false, so warm-up bars are flat.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::PriceBar;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Long while close > SMA(period).
    PriceAboveMa(usize),
    /// Enter when close > SMA(entry), stay long until close < SMA(exit).
    Asymmetric { entry: usize, exit: usize },
    /// Long while SMA(fast) > SMA(slow).
    MaCross { fast: usize, slow: usize },
    /// Long while SMA(fast) > SMA(mid) > SMA(slow).
    TripleMa { fast: usize, mid: usize, slow: usize },
}

impl Strategy {
    /// The fixed strategy of the standard backtest.
    pub const CANONICAL: Strategy = Strategy::PriceAboveMa(20);

    /// The fifteen moving-average strategies offered for comparison.
    pub fn catalog() -> Vec<Strategy> {
        use Strategy::*;
        vec![
            PriceAboveMa(20),
            PriceAboveMa(43),
            PriceAboveMa(60),
            PriceAboveMa(87),
            PriceAboveMa(284),
            Asymmetric { entry: 20, exit: 60 },
            MaCross { fast: 20, slow: 60 },
            MaCross { fast: 20, slow: 87 },
            MaCross { fast: 20, slow: 284 },
            MaCross { fast: 43, slow: 87 },
            MaCross { fast: 43, slow: 284 },
            MaCross { fast: 60, slow: 87 },
            MaCross { fast: 60, slow: 284 },
            TripleMa {
                fast: 20,
                mid: 60,
                slow: 87,
            },
            TripleMa {
                fast: 43,
                mid: 87,
                slow: 284,
            },
        ]
    }

    pub fn periods(&self) -> Vec<usize> {
        match *self {
            Strategy::PriceAboveMa(period) => vec![period],
            Strategy::Asymmetric { entry, exit } => vec![entry, exit],
            Strategy::MaCross { fast, slow } => vec![fast, slow],
            Strategy::TripleMa { fast, mid, slow } => vec![fast, mid, slow],
        }
    }

    /// Bars needed for at least one tradeable day after the longest
    /// average has warmed up.
    pub fn min_bars(&self) -> usize {
        self.periods().into_iter().max().unwrap_or(0) + 1
    }

    /// Long (true) / flat (false) per bar.
    pub fn signals(&self, bars: &[PriceBar]) -> Vec<bool> {
        let averages: HashMap<usize, IndicatorSeries> = self
            .periods()
            .into_iter()
            .map(|p| (p, calculate_sma(bars, p)))
            .collect();
        let ma = |period: usize, i: usize| averages.get(&period).and_then(|s| s.get(i));
        let above = |left: Option<f64>, right: Option<f64>| match (left, right) {
            (Some(l), Some(r)) => l > r,
            _ => false,
        };

        match *self {
            Strategy::PriceAboveMa(period) => (0..bars.len())
                .map(|i| above(Some(bars[i].close), ma(period, i)))
                .collect(),
            Strategy::Asymmetric { entry, exit } => {
                let mut long = false;
                let mut signals = Vec::with_capacity(bars.len());
                for (i, bar) in bars.iter().enumerate() {
                    if !long && above(Some(bar.close), ma(entry, i)) {
                        long = true;
                    } else if long && above(ma(exit, i), Some(bar.close)) {
                        long = false;
                    }
                    signals.push(long);
                }
                signals
            }
            Strategy::MaCross { fast, slow } => (0..bars.len())
                .map(|i| above(ma(fast, i), ma(slow, i)))
                .collect(),
            Strategy::TripleMa { fast, mid, slow } => (0..bars.len())
                .map(|i| above(ma(fast, i), ma(mid, i)) && above(ma(mid, i), ma(slow, i)))
                .collect(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::PriceAboveMa(period) => write!(f, "Price > {}MA", period),
            Strategy::Asymmetric { entry, exit } => {
                write!(f, "Asymmetric (P>{} in / P<{} out)", entry, exit)
            }
            Strategy::MaCross { fast, slow } => write!(f, "{}MA cross {}MA", fast, slow),
            Strategy::TripleMa { fast, mid, slow } => {
                write!(f, "Triple MA ({}>{}>{})", fast, mid, slow)
            }
        }
    }
}

/// Parses `sma:20`, `asym:20/60`, `cross:20/60` and `triple:20/60/87`.
impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, params) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected <kind>:<periods>, got '{s}'"))?;
        let periods = params
            .split('/')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| format!("invalid period '{p}'"))
            })
            .collect::<Result<Vec<usize>, String>>()?;

        match (kind.trim().to_lowercase().as_str(), periods.as_slice()) {
            ("sma", &[period]) => Ok(Strategy::PriceAboveMa(period)),
            ("asym", &[entry, exit]) => Ok(Strategy::Asymmetric { entry, exit }),
            ("cross", &[fast, slow]) => Ok(Strategy::MaCross { fast, slow }),
            ("triple", &[fast, mid, slow]) => Ok(Strategy::TripleMa { fast, mid, slow }),
            _ => Err(format!("unknown strategy '{s}'")),
        }
    }
}
