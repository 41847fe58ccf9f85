//! Vectorized moving-average backtest.
//!
//! Per bar t the position is the strategy signal of bar t-1 (flat on the
//! first bar), the strategy return is position * pct_change(close), and the
//! equity compounds those returns from the initial capital. The first bar has
//! no return and is excluded from the return statistics.

use crate::domain::metrics::{drawdown_curve, Metrics};
use crate::domain::ohlcv::PriceBar;
use crate::domain::strategy::Strategy;
use chrono::NaiveDate;
use std::cmp::Ordering;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Bars dated before this are dropped from the working copy.
    pub start_date: Option<NaiveDate>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            start_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktestResult {
    pub strategy: Strategy,
    pub cagr: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub kelly_fraction: f64,
    pub total_return: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub drawdown_curve: Vec<EquityPoint>,
    /// Days with a defined strategy return.
    pub trade_count: usize,
    /// Number of times the signal flipped between long and flat.
    pub position_changes: usize,
    pub latest_price: f64,
}

impl BacktestResult {
    fn from_parts(
        strategy: Strategy,
        bars: &[PriceBar],
        equity: &[f64],
        metrics: Metrics,
        trade_count: usize,
        position_changes: usize,
    ) -> Self {
        let drawdown = drawdown_curve(equity);
        let stamp = |values: &[f64]| -> Vec<EquityPoint> {
            bars.iter()
                .zip(values)
                .map(|(bar, &value)| EquityPoint {
                    date: bar.date,
                    value,
                })
                .collect()
        };

        BacktestResult {
            strategy,
            cagr: metrics.cagr,
            sharpe_ratio: metrics.sharpe_ratio,
            max_drawdown: metrics.max_drawdown,
            win_rate: metrics.win_rate,
            profit_factor: metrics.profit_factor,
            kelly_fraction: metrics.kelly_fraction,
            total_return: metrics.total_return,
            equity_curve: stamp(equity),
            drawdown_curve: stamp(&drawdown),
            trade_count,
            position_changes,
            latest_price: bars.last().map(|b| b.close).unwrap_or(0.0),
        }
    }
}

/// The standard backtest: long while close is above its 20-day average.
pub fn run_backtest(daily: &[PriceBar], config: &BacktestConfig) -> Option<BacktestResult> {
    run_strategy_backtest(daily, Strategy::CANONICAL, config)
}

/// Backtest any catalog strategy. `None` when the series (after the start
/// date filter) is shorter than the strategy's warm-up plus one bar.
pub fn run_strategy_backtest(
    daily: &[PriceBar],
    strategy: Strategy,
    config: &BacktestConfig,
) -> Option<BacktestResult> {
    let bars: Vec<PriceBar> = match config.start_date {
        Some(start) => daily.iter().filter(|b| b.date >= start).cloned().collect(),
        None => daily.to_vec(),
    };

    if bars.len() < strategy.min_bars() {
        tracing::debug!(
            strategy = %strategy,
            bars = bars.len(),
            minimum = strategy.min_bars(),
            "not enough bars to backtest"
        );
        return None;
    }

    if bars.iter().any(|b| !b.close.is_finite() || b.close <= 0.0) {
        tracing::debug!(strategy = %strategy, "non-positive or non-finite close");
        return None;
    }

    let signals = strategy.signals(&bars);

    let mut returns = Vec::with_capacity(bars.len().saturating_sub(1));
    let mut equity = Vec::with_capacity(bars.len());
    let mut value = config.initial_capital;
    equity.push(value);

    for t in 1..bars.len() {
        let position = if signals[t - 1] { 1.0 } else { 0.0 };
        let ret = position * bars[t].pct_change(bars[t - 1].close);
        value *= 1.0 + ret;
        returns.push(ret);
        equity.push(value);
    }

    let position_changes = signals.windows(2).filter(|w| w[0] != w[1]).count();
    let metrics = Metrics::compute(&returns, &equity, config.initial_capital);

    tracing::debug!(
        strategy = %strategy,
        bars = bars.len(),
        total_return = metrics.total_return,
        "backtest complete"
    );

    Some(BacktestResult::from_parts(
        strategy,
        &bars,
        &equity,
        metrics,
        returns.len(),
        position_changes,
    ))
}

/// Tickers that stand for a cash holding rather than a priced instrument.
pub const CASH_SYMBOLS: [&str; 3] = ["CASH", "USD", "TWD"];

pub fn is_cash(symbol: &str) -> bool {
    CASH_SYMBOLS.iter().any(|c| c.eq_ignore_ascii_case(symbol.trim()))
}

/// Result for holding cash over `dates`: flat equity and all-zero metrics.
pub fn cash_baseline(dates: &[NaiveDate], config: &BacktestConfig) -> BacktestResult {
    let flat = |value: f64| -> Vec<EquityPoint> {
        dates
            .iter()
            .map(|&date| EquityPoint { date, value })
            .collect()
    };

    BacktestResult {
        strategy: Strategy::CANONICAL,
        cagr: 0.0,
        sharpe_ratio: 0.0,
        max_drawdown: 0.0,
        win_rate: 0.0,
        profit_factor: 0.0,
        kelly_fraction: 0.0,
        total_return: 0.0,
        equity_curve: flat(config.initial_capital),
        drawdown_curve: flat(0.0),
        trade_count: 0,
        position_changes: 0,
        latest_price: 1.0,
    }
}

/// Run every catalog strategy and order the results best first: CAGR
/// descending, then Sharpe descending. Strategies without enough history
/// are left out.
pub fn rank_strategies(daily: &[PriceBar], config: &BacktestConfig) -> Vec<BacktestResult> {
    let mut results: Vec<BacktestResult> = Strategy::catalog()
        .into_iter()
        .filter_map(|s| run_strategy_backtest(daily, s, config))
        .collect();

    results.sort_by(|a, b| {
        b.cagr
            .partial_cmp(&a.cagr)
            .unwrap_or(Ordering::Equal)
            .then(
                b.sharpe_ratio
                    .partial_cmp(&a.sharpe_ratio)
                    .unwrap_or(Ordering::Equal),
            )
    });
    results
}
