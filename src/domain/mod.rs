//! Core analytics: trend geometry, tier rating and strategy backtests.
//!
//! Everything here is a pure function of in-memory price series.

pub mod ohlcv;
pub mod resample;
pub mod window;
pub mod trend;
pub mod geometry;
pub mod rating;
pub mod indicator;
pub mod strategy;
pub mod backtest;
pub mod metrics;
pub mod universe;
pub mod config_validation;
pub mod error;
