//! Property-based tests for numeric invariants.
//!
//! These tests verify that:
//! 1. Window angles stay within [-90, 90] and r-squared within [0, 1]
//! 2. The Kelly fraction is never negative
//! 3. Drawdowns are never positive
//! 4. The classifier always lands on a tier and the backtest is repeatable

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use titan::domain::backtest::{run_backtest, BacktestConfig};
use titan::domain::geometry::build_profile;
use titan::domain::metrics::{drawdown_curve, kelly};
use titan::domain::ohlcv::PriceBar;
use titan::domain::rating::{classify, Tier};
use titan::domain::resample::to_monthly;
use titan::domain::trend::analyze_window;

fn bars_from(closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::flat(start + Duration::days(i as i64), c))
        .collect()
}

/// Random walk of positive closes.
fn price_path(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.08..0.08f64, len).prop_map(|steps| {
        let mut price = 100.0;
        steps
            .into_iter()
            .map(|s| {
                price *= 1.0 + s;
                price
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn window_metrics_are_bounded(closes in price_path(3..200)) {
        let metric = analyze_window(&bars_from(&closes));
        prop_assert!(metric.valid);
        prop_assert!((-90.0..=90.0).contains(&metric.angle));
        prop_assert!((0.0..=1.0).contains(&metric.r_squared));
    }

    #[test]
    fn kelly_is_never_negative(win_rate in 0.0..=1.0f64, profit_factor in 0.0..100.0f64) {
        prop_assert!(kelly(win_rate, profit_factor) >= 0.0);
    }

    #[test]
    fn drawdown_is_never_positive(closes in price_path(1..300)) {
        for dd in drawdown_curve(&closes) {
            prop_assert!(dd <= 0.0);
            prop_assert!(dd > -1.0);
        }
    }

    #[test]
    fn classifier_always_returns_a_tier(closes in price_path(1..1000)) {
        let daily = bars_from(&closes);
        let profile = build_profile(&to_monthly(&daily));
        let rating = classify(profile.as_ref());
        prop_assert!(Tier::ALL.contains(&rating.level));
        prop_assert!(!rating.name.is_empty());
    }

    #[test]
    fn backtest_is_repeatable_and_sane(closes in price_path(21..400)) {
        let bars = bars_from(&closes);
        let config = BacktestConfig::default();
        let first = run_backtest(&bars, &config);
        let second = run_backtest(&bars, &config);
        prop_assert_eq!(&first, &second);

        let result = first.unwrap();
        prop_assert!(result.kelly_fraction >= 0.0);
        prop_assert!(result.max_drawdown <= 0.0);
        prop_assert!((0.0..=1.0).contains(&result.win_rate));
        prop_assert_eq!(result.trade_count, closes.len() - 1);
        prop_assert_eq!(result.equity_curve.len(), closes.len());
    }
}
